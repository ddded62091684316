/// Resolution tiers and color presets.
pub mod presets;
/// JSON-facing render configuration.
pub mod render;
