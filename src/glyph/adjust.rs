/// Remap a 0..=255 luminance sample by brightness and contrast (both in -100..=100).
///
/// Contrast scales around mid-gray first, then brightness is added, so the contrast pivot is
/// always 0.5 regardless of the brightness offset. The result is clamped to 0..=255.
pub fn adjust(luminance: f64, brightness: i32, contrast: i32) -> f64 {
    let b = f64::from(brightness) / 100.0;
    let c = f64::from(contrast) / 100.0 + 1.0;
    let v = ((luminance / 255.0 - 0.5) * c + 0.5 + b) * 255.0;
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 255.0)
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/adjust.rs"]
mod tests;
