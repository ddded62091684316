use super::*;

#[test]
fn resolution_tiers_map_to_block_sizes() {
    let sizes: Vec<u32> = Resolution::ALL.iter().map(|r| r.block_size()).collect();
    assert_eq!(sizes, vec![6, 8, 12, 16, 24]);
    assert_eq!(Resolution::default(), Resolution::Medium);
    assert_eq!("Ultra".parse::<Resolution>().unwrap(), Resolution::Ultra);
    assert!("huge".parse::<Resolution>().is_err());
}

#[test]
fn color_presets_parse_by_key_or_display_name() {
    assert_eq!(
        "paper_ink".parse::<ColorPreset>().unwrap(),
        ColorPreset::PaperInk
    );
    assert_eq!(
        "risograph-blue".parse::<ColorPreset>().unwrap(),
        ColorPreset::RisographBlue
    );
    assert_eq!(
        "Night Poster".parse::<ColorPreset>().unwrap(),
        ColorPreset::NightPoster
    );
    assert!("neon".parse::<ColorPreset>().is_err());
}

#[test]
fn classic_preset_is_white_on_black() {
    let (bg, fg) = ColorPreset::ClassicBw.colors();
    assert_eq!(bg, Color::BLACK);
    assert_eq!(fg, Color::WHITE);
    assert_eq!(ColorPreset::RisographRed.colors().1.to_hex(), "#c1121f");
}

#[test]
fn presets_serialize_as_snake_case() {
    let json = serde_json::to_string(&ColorPreset::RisographBlue).unwrap();
    assert_eq!(json, "\"risograph_blue\"");
    let r: Resolution = serde_json::from_str("\"tiny\"").unwrap();
    assert_eq!(r, Resolution::Tiny);
}
