use crate::foundation::error::{GlyphError, GlyphResult};
use serde::{Deserialize, Serialize};

pub use kurbo::{Affine, Point, Vec2};

/// Pixel size of a drawing surface (viewport or raster).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> GlyphResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphError::validation("viewport width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Straight (non-premultiplied) RGBA8 color.
///
/// Serialized as `#RRGGBB`, `#RRGGBBAA`, or the keyword `transparent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA` (case-insensitive, `#` optional) or `transparent`.
    pub fn parse(s: &str) -> GlyphResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }
        let hex = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> GlyphResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| GlyphError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !hex.is_ascii() {
            return Err(GlyphError::validation(format!("invalid color \"{s}\"")));
        }
        match hex.len() {
            6 => Ok(Self::rgb(
                hex_byte(&hex[0..2])?,
                hex_byte(&hex[2..4])?,
                hex_byte(&hex[4..6])?,
            )),
            8 => Ok(Self::rgba(
                hex_byte(&hex[0..2])?,
                hex_byte(&hex[2..4])?,
                hex_byte(&hex[4..6])?,
                hex_byte(&hex[6..8])?,
            )),
            _ => Err(GlyphError::validation(
                "color must be #RRGGBB, #RRGGBBAA or \"transparent\"",
            )),
        }
    }

    /// Hex form used in config files and SVG markup.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_transparent() {
            f.write_str("transparent")
        } else {
            f.write_str(&self.to_hex())
        }
    }
}

impl std::str::FromStr for Color {
    type Err = GlyphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::parse(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

/// Decoded source pixels, straight RGBA8, row-major, tightly packed.
///
/// Immutable once built; a new upload or capture frame replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
}

impl SourceImage {
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> GlyphResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphError::validation("image width/height must be > 0"));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8.len() != expected {
            return Err(GlyphError::validation(format!(
                "image byte len mismatch: expected {expected}, got {}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }

    /// Uniformly filled image; handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, color: Color) -> GlyphResult<Self> {
        let n = (width as usize).saturating_mul(height as usize);
        let mut rgba8 = Vec::with_capacity(n.saturating_mul(4));
        for _ in 0..n {
            rgba8.extend_from_slice(&color.to_array());
        }
        Self::from_rgba8(width, height, rgba8)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
