use serde::{Deserialize, Serialize};

use crate::foundation::error::{GlyphError, GlyphResult};

const REFINED: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";
const BLOCKS_DENSE: &str = "█▉▊▋▌▍▎▏▐░▒▓ ";
const MINIMAL: &str = " .:-=+*#%@";
const TECH: &str = "01█▓▒░:.+=*#%&@";

/// Built-in glyph ramps. Each ramp is ordered so that index 0 is used for the darkest samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterSet {
    #[default]
    Refined,
    BlocksDense,
    Minimal,
    Tech,
}

impl CharacterSet {
    pub const ALL: [CharacterSet; 4] = [
        CharacterSet::Refined,
        CharacterSet::BlocksDense,
        CharacterSet::Minimal,
        CharacterSet::Tech,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharacterSet::Refined => "refined",
            CharacterSet::BlocksDense => "blocks_dense",
            CharacterSet::Minimal => "minimal",
            CharacterSet::Tech => "tech",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterSet::Refined => REFINED,
            CharacterSet::BlocksDense => BLOCKS_DENSE,
            CharacterSet::Minimal => MINIMAL,
            CharacterSet::Tech => TECH,
        }
    }

    pub fn ramp(self) -> Vec<char> {
        self.as_str().chars().collect()
    }
}

impl std::str::FromStr for CharacterSet {
    type Err = GlyphError;

    fn from_str(s: &str) -> GlyphResult<Self> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|set| set.name() == key)
            .ok_or_else(|| GlyphError::validation(format!("unknown character set \"{s}\"")))
    }
}

/// Quantize a normalized luminance (0 = darkest, 1 = brightest) to one glyph of `ramp`.
///
/// Returns `None` only when `ramp` is empty.
pub fn map(normalized: f64, ramp: &[char], invert: bool) -> Option<char> {
    let last = ramp.len().checked_sub(1)?;
    let mut n = if normalized.is_nan() {
        0.0
    } else {
        normalized.clamp(0.0, 1.0)
    };
    if invert {
        n = 1.0 - n;
    }
    let idx = ((n * last as f64).floor() as usize).min(last);
    Some(ramp[idx])
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/ramp.rs"]
mod tests;
