use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GlyphError::unsupported("x")
            .to_string()
            .contains("unsupported format:")
    );
    assert!(GlyphError::decode("x").to_string().contains("decode error:"));
    assert!(
        GlyphError::capture("x")
            .to_string()
            .contains("capture unavailable:")
    );
    assert!(
        GlyphError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GlyphError::font("x").to_string().contains("font error:"));
    assert!(GlyphError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GlyphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
