/// Input format detection and decoding to straight RGBA8.
pub mod decode;
/// Monospace font discovery and glyph shaping.
pub mod font;
