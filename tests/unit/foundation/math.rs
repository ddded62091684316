use super::*;

#[test]
fn premultiply_zero_alpha_clears_color() {
    let mut px = vec![200u8, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn premul_unpremul_opaque_is_identity() {
    let mut px = vec![12u8, 34, 56, 255, 255, 0, 128, 255];
    let orig = px.clone();
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, orig);
}

#[test]
fn unpremultiply_half_alpha_restores_approximately() {
    let mut px = vec![200u8, 100, 0, 128];
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i32::from(px[0]) - 200).abs() <= 2);
    assert!((i32::from(px[1]) - 100).abs() <= 2);
    assert_eq!(px[2], 0);
    assert_eq!(px[3], 128);
}
