/// Brightness/contrast remap.
pub mod adjust;
pub mod grid;
/// Built-in glyph ramps and luminance quantization.
pub mod ramp;
/// Block sampling of source images.
pub mod sampler;
