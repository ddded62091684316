use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::presets::{ColorPreset, Resolution};
use crate::foundation::core::Color;
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::glyph::ramp::CharacterSet;

/// Inclusive bound for brightness and contrast sliders.
pub const ADJUST_LIMIT: i32 = 100;

/// Everything that determines the glyph grid and rendered raster for a source image.
///
/// JSON-facing; unknown fields are rejected and omitted fields fall back to [`Default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Brightness ramp glyphs are picked from.
    pub character_set: CharacterSet,
    /// Source pixels per glyph block (both axes). Must be >= 1.
    pub block_size: u32,
    /// Swap the dark and light ends of the ramp.
    pub invert: bool,
    /// Additive brightness, -100..=100.
    pub brightness: i32,
    /// Contrast around mid-gray, -100..=100.
    pub contrast: i32,
    /// Fill behind the glyphs in rendered output.
    pub background: Color,
    /// Glyph color in rendered output.
    pub characters: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let (background, characters) = ColorPreset::default().colors();
        Self {
            character_set: CharacterSet::default(),
            block_size: Resolution::default().block_size(),
            invert: false,
            brightness: 0,
            contrast: 0,
            background,
            characters,
        }
    }
}

impl RenderConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> GlyphResult<Self> {
        let cfg: RenderConfig = serde_json::from_reader(r)
            .map_err(|e| GlyphError::validation(format!("parse render config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> GlyphResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GlyphError::validation(format!("open render config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> GlyphResult<()> {
        if self.block_size == 0 {
            return Err(GlyphError::validation("block_size must be >= 1"));
        }
        if self.character_set.as_str().is_empty() {
            return Err(GlyphError::validation("character ramp must be non-empty"));
        }
        if !(-ADJUST_LIMIT..=ADJUST_LIMIT).contains(&self.brightness) {
            return Err(GlyphError::validation(format!(
                "brightness must be within -{ADJUST_LIMIT}..={ADJUST_LIMIT}, got {}",
                self.brightness
            )));
        }
        if !(-ADJUST_LIMIT..=ADJUST_LIMIT).contains(&self.contrast) {
            return Err(GlyphError::validation(format!(
                "contrast must be within -{ADJUST_LIMIT}..={ADJUST_LIMIT}, got {}",
                self.contrast
            )));
        }
        Ok(())
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.block_size = resolution.block_size();
        self
    }

    pub fn with_preset(mut self, preset: ColorPreset) -> Self {
        let (background, characters) = preset.colors();
        self.background = background;
        self.characters = characters;
        self
    }

    pub fn ramp(&self) -> Vec<char> {
        self.character_set.ramp()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/render.rs"]
mod tests;
