/// Convenience result type used across glyphcast.
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Top-level error taxonomy used by the conversion, view and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum GlyphError {
    /// Input encoding is not one of the accepted raster/vector formats.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Input bytes were recognized but failed to decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// A capture source could not be opened or refused access.
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// Invalid user-provided configuration or view data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font discovery, parsing or shaping failed.
    #[error("font error: {0}")]
    Font(String),

    /// Export serialization or encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlyphError {
    /// Build a [`GlyphError::UnsupportedFormat`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`GlyphError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GlyphError::CaptureUnavailable`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::CaptureUnavailable(msg.into())
    }

    /// Build a [`GlyphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlyphError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`GlyphError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
