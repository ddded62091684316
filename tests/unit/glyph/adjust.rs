use super::*;

#[test]
fn neutral_settings_are_identity_at_midpoint() {
    assert!((adjust(127.5, 0, 0) - 127.5).abs() < 1e-9);
    assert!((adjust(42.0, 0, 0) - 42.0).abs() < 1e-9);
}

#[test]
fn clamps_at_both_ends() {
    assert_eq!(adjust(255.0, 100, 0), 255.0);
    assert_eq!(adjust(0.0, -100, 0), 0.0);
    assert_eq!(adjust(255.0, 0, 100), 255.0);
}

#[test]
fn monotonic_in_brightness_for_fixed_contrast() {
    for contrast in [-100, -40, 0, 35, 100] {
        let mut prev = f64::NEG_INFINITY;
        for brightness in -100..=100 {
            let v = adjust(100.0, brightness, contrast);
            assert!(v >= prev, "b={brightness} c={contrast}");
            prev = v;
        }
    }
}

#[test]
fn contrast_pivots_on_gray_before_brightness() {
    // Full negative contrast collapses every input to mid-gray, then brightness shifts it.
    let v = adjust(10.0, 20, -100);
    assert!((v - (0.5 + 0.2) * 255.0).abs() < 1e-9);
    let w = adjust(240.0, 20, -100);
    assert!((v - w).abs() < 1e-9);
}
