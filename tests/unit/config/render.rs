use super::*;

#[test]
fn defaults_match_classic_medium_refined() {
    let cfg = RenderConfig::default();
    assert_eq!(cfg.character_set, CharacterSet::Refined);
    assert_eq!(cfg.block_size, 12);
    assert_eq!(cfg.background, Color::BLACK);
    assert_eq!(cfg.characters, Color::WHITE);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let json = r##"{ "character_set": "minimal", "block_size": 8, "background": "transparent" }"##;
    let cfg = RenderConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.character_set, CharacterSet::Minimal);
    assert_eq!(cfg.block_size, 8);
    assert!(cfg.background.is_transparent());
    assert_eq!(cfg.characters, Color::WHITE);
}

#[test]
fn rejects_unknown_fields_and_out_of_range_values() {
    assert!(RenderConfig::from_reader(r#"{ "hue": 10 }"#.as_bytes()).is_err());
    assert!(RenderConfig::from_reader(r#"{ "block_size": 0 }"#.as_bytes()).is_err());
    assert!(RenderConfig::from_reader(r#"{ "brightness": 101 }"#.as_bytes()).is_err());
    assert!(RenderConfig::from_reader(r#"{ "contrast": -101 }"#.as_bytes()).is_err());
}

#[test]
fn preset_and_resolution_builders() {
    let cfg = RenderConfig::default()
        .with_preset(ColorPreset::RisographRed)
        .with_resolution(Resolution::Ultra);
    assert_eq!(cfg.block_size, 24);
    assert_eq!(cfg.background, Color::rgb(0xf7, 0xf6, 0xf3));
    assert_eq!(cfg.characters, Color::rgb(0xc1, 0x12, 0x1f));
}

#[test]
fn preset_and_resolution_names_parse() {
    assert_eq!(
        "night-poster".parse::<ColorPreset>().unwrap(),
        ColorPreset::NightPoster
    );
    assert_eq!(
        "Paper & Ink".parse::<ColorPreset>().unwrap(),
        ColorPreset::PaperInk
    );
    assert_eq!("tiny".parse::<Resolution>().unwrap().block_size(), 6);
    assert!("huge".parse::<Resolution>().is_err());
}
