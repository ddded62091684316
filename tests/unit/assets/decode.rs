use super::*;
use crate::foundation::core::Color;

fn png_bytes(width: u32, height: u32, color: Color) -> Vec<u8> {
    encode_png(&SourceImage::solid(width, height, color).unwrap()).unwrap()
}

#[test]
fn kind_from_mime_and_extension() {
    assert_eq!(ImageKind::from_mime("image/png"), Some(ImageKind::Png));
    assert_eq!(
        ImageKind::from_mime("image/svg+xml; charset=utf-8"),
        Some(ImageKind::Svg)
    );
    assert_eq!(ImageKind::from_mime("image/gif"), None);
    assert_eq!(ImageKind::from_extension("JPEG"), Some(ImageKind::Jpeg));
    assert_eq!(ImageKind::from_extension("webp"), Some(ImageKind::WebP));
    assert_eq!(ImageKind::from_path(Path::new("a/b.bmp")), None);
}

#[test]
fn sniffing_recognizes_png_and_svg() {
    assert_eq!(ImageKind::sniff(&png_bytes(1, 1, Color::WHITE)), Some(ImageKind::Png));
    assert_eq!(
        ImageKind::sniff(br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"/>"#),
        Some(ImageKind::Svg)
    );
    assert_eq!(ImageKind::sniff(b"GIF89a......"), None);
}

#[test]
fn png_round_trips_pixels() {
    let color = Color::rgba(10, 200, 30, 255);
    let decoded = decode_source(&png_bytes(3, 2, color), FormatHint::None).unwrap();
    assert_eq!(decoded.kind, ImageKind::Png);
    assert_eq!((decoded.image.width(), decoded.image.height()), (3, 2));
    assert_eq!(decoded.image.pixel(2, 1), Some(color.to_array()));
    assert!(decoded.warnings.is_empty());
}

#[test]
fn unknown_encoding_is_unsupported() {
    let err = decode_source(b"GIF89a not really", FormatHint::Mime("image/gif")).unwrap_err();
    assert!(matches!(err, GlyphError::UnsupportedFormat(_)));
}

#[test]
fn garbage_with_accepted_hint_is_a_decode_error() {
    let err = decode_source(b"definitely not a png", FormatHint::Mime("image/png")).unwrap_err();
    assert!(matches!(err, GlyphError::Decode(_)));
    assert!(matches!(
        decode_source(&[], FormatHint::None),
        Err(GlyphError::Decode(_))
    ));
}

#[test]
fn svg_rasterizes_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#ff0000"/></svg>"##;
    let decoded = decode_source(svg, FormatHint::None).unwrap();
    assert_eq!(decoded.kind, ImageKind::Svg);
    assert_eq!((decoded.image.width(), decoded.image.height()), (20, 10));
    assert_eq!(decoded.image.pixel(5, 5), Some([255, 0, 0, 255]));
}

#[test]
fn malformed_svg_is_a_decode_error() {
    let err = decode_source(b"<svg", FormatHint::Mime("image/svg+xml")).unwrap_err();
    assert!(matches!(err, GlyphError::Decode(_)));
}

#[test]
fn oversized_input_warns_but_decodes() {
    // Pad an SVG with a comment so the byte count crosses the threshold.
    let mut svg = String::from(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="#00ff00"/><!--"##,
    );
    svg.push_str(&"x".repeat(OVERSIZED_BYTES));
    svg.push_str("--></svg>");
    let decoded = decode_source(svg.as_bytes(), FormatHint::None).unwrap();
    assert_eq!(
        decoded.warnings,
        vec![DecodeWarning::Oversized { bytes: svg.len() }]
    );
    assert_eq!(decoded.image.width(), 4);
}

#[test]
fn placeholder_is_dark_gray_600x400() {
    let img = placeholder_sample().unwrap();
    assert_eq!((img.width(), img.height()), (600, 400));
    assert_eq!(img.pixel(5, 5), Some([0x33, 0x33, 0x33, 255]));
}
