use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{GlyphError, GlyphResult};

/// Environment variable that overrides monospace font discovery.
pub const FONT_ENV: &str = "GLYPHCAST_FONT";

/// Well-known install locations of fixed-width fonts, tried in order.
const CANDIDATE_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/ibm-plex/IBMPlexMono-Regular.ttf",
    "/usr/share/fonts/opentype/ibm-plex/IBMPlexMono-Regular.otf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/System/Library/Fonts/Monaco.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Raw bytes of the fixed-width font glyphs are painted with.
#[derive(Clone, Debug)]
pub struct GlyphFont {
    bytes: Arc<Vec<u8>>,
    origin: PathBuf,
}

impl GlyphFont {
    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<PathBuf>) -> GlyphResult<Self> {
        if bytes.is_empty() {
            return Err(GlyphError::font("font data is empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            origin: origin.into(),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> GlyphResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| GlyphError::font(format!("read font '{}': {e}", path.display())))?;
        Self::from_bytes(bytes, path)
    }

    /// Locate a monospace font: `$GLYPHCAST_FONT` first, then common system locations.
    pub fn discover() -> GlyphResult<Self> {
        if let Some(path) = std::env::var_os(FONT_ENV) {
            return Self::from_path(PathBuf::from(path));
        }
        for candidate in CANDIDATE_PATHS {
            let path = Path::new(candidate);
            if path.is_file() {
                tracing::debug!(font = %path.display(), "using system monospace font");
                return Self::from_path(path);
            }
        }
        Err(GlyphError::font(format!(
            "no monospace font found; pass --font or set {FONT_ENV}"
        )))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }
}

/// One shaped glyph, positioned relative to the top-left of its block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ShapedGlyph {
    pub(crate) id: u32,
    /// Pen position from the block's left edge.
    pub(crate) x: f32,
    /// Baseline position from the block top, run baseline included.
    pub(crate) y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GlyphBrush;

/// Shapes single characters with Parley and caches the result per `(char, size)`.
pub(crate) struct GlyphShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
    family_name: String,
    cache: HashMap<(char, u32), Arc<[ShapedGlyph]>>,
}

impl GlyphShaper {
    /// Register `font` with a fresh Parley context.
    pub(crate) fn new(font: &GlyphFont) -> GlyphResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| GlyphError::font("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GlyphError::font("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            cache: HashMap::new(),
        })
    }

    #[cfg(test)]
    pub(crate) fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Glyphs for `ch` at `size_px`, with `y` on the first line's baseline (text top at 0).
    pub(crate) fn shape(&mut self, ch: char, size_px: f32) -> GlyphResult<Arc<[ShapedGlyph]>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GlyphError::font("glyph size must be finite and > 0"));
        }
        let key = (ch, size_px.to_bits());
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Arc::clone(hit));
        }

        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(GlyphBrush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);

        let mut shaped = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                for g in run.positioned_glyphs() {
                    shaped.push(ShapedGlyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                }
            }
        }

        let shaped: Arc<[ShapedGlyph]> = shaped.into();
        self.cache.insert(key, Arc::clone(&shaped));
        Ok(shaped)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
