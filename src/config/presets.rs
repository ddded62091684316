use serde::{Deserialize, Serialize};

use crate::foundation::core::Color;
use crate::foundation::error::{GlyphError, GlyphResult};

/// Block size tiers, in source pixels per glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Ultra,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::Tiny,
        Resolution::Small,
        Resolution::Medium,
        Resolution::Large,
        Resolution::Ultra,
    ];

    pub fn block_size(self) -> u32 {
        match self {
            Resolution::Tiny => 6,
            Resolution::Small => 8,
            Resolution::Medium => 12,
            Resolution::Large => 16,
            Resolution::Ultra => 24,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Resolution::Tiny => "tiny",
            Resolution::Small => "small",
            Resolution::Medium => "medium",
            Resolution::Large => "large",
            Resolution::Ultra => "ultra",
        }
    }
}

impl std::str::FromStr for Resolution {
    type Err = GlyphError;

    fn from_str(s: &str) -> GlyphResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.name() == key)
            .ok_or_else(|| GlyphError::validation(format!("unknown resolution \"{s}\"")))
    }
}

/// Named background/character color pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorPreset {
    #[default]
    ClassicBw,
    PaperInk,
    RisographBlue,
    RisographRed,
    NightPoster,
}

impl ColorPreset {
    pub const ALL: [ColorPreset; 5] = [
        ColorPreset::ClassicBw,
        ColorPreset::PaperInk,
        ColorPreset::RisographBlue,
        ColorPreset::RisographRed,
        ColorPreset::NightPoster,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ColorPreset::ClassicBw => "classic_bw",
            ColorPreset::PaperInk => "paper_ink",
            ColorPreset::RisographBlue => "risograph_blue",
            ColorPreset::RisographRed => "risograph_red",
            ColorPreset::NightPoster => "night_poster",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ColorPreset::ClassicBw => "Classic B/W",
            ColorPreset::PaperInk => "Paper & Ink",
            ColorPreset::RisographBlue => "Risograph Blue",
            ColorPreset::RisographRed => "Risograph Red",
            ColorPreset::NightPoster => "Night Poster",
        }
    }

    /// `(background, characters)`.
    pub fn colors(self) -> (Color, Color) {
        match self {
            ColorPreset::ClassicBw => (Color::rgb(0x00, 0x00, 0x00), Color::rgb(0xff, 0xff, 0xff)),
            ColorPreset::PaperInk => (Color::rgb(0xf4, 0xf1, 0xec), Color::rgb(0x1a, 0x1a, 0x1a)),
            ColorPreset::RisographBlue => {
                (Color::rgb(0xf7, 0xf6, 0xf3), Color::rgb(0x00, 0x47, 0xab))
            }
            ColorPreset::RisographRed => {
                (Color::rgb(0xf7, 0xf6, 0xf3), Color::rgb(0xc1, 0x12, 0x1f))
            }
            ColorPreset::NightPoster => {
                (Color::rgb(0x0b, 0x0e, 0x14), Color::rgb(0xe6, 0xe1, 0xcf))
            }
        }
    }
}

impl std::str::FromStr for ColorPreset {
    type Err = GlyphError;

    fn from_str(s: &str) -> GlyphResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|p| p.key() == key || p.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GlyphError::validation(format!("unknown color preset \"{s}\"")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/presets.rs"]
mod tests;
