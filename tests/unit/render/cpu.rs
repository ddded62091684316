use super::*;
use crate::foundation::core::Vec2;

fn backend_if_font_present() -> Option<CpuBackend> {
    let font = GlyphFont::discover().ok()?;
    CpuBackend::new(font).ok()
}

fn grid(rows: usize, cols: usize, ch: char) -> GlyphGrid {
    GlyphGrid::new(rows, cols, vec![ch; rows * cols]).unwrap()
}

fn style(background: Option<Color>) -> PaintStyle {
    PaintStyle {
        block_size: 16,
        background,
        characters: Color::WHITE,
    }
}

#[test]
fn paint_fills_background_and_draws_glyphs_if_font_present() {
    let Some(mut backend) = backend_if_font_present() else {
        return;
    };
    let raster = backend
        .paint(&grid(2, 2, '@'), 32, 32, &style(Some(Color::BLACK)))
        .unwrap();
    assert_eq!((raster.width, raster.height), (32, 32));
    assert_eq!(raster.data.len(), 32 * 32 * 4);
    assert!(raster.data.chunks_exact(4).all(|px| px[3] == 255));
    // '@' is dense enough that some pixel in the first block lights up.
    let lit = (0..16)
        .flat_map(|y| (0..16).map(move |x| (x, y)))
        .any(|(x, y)| raster.pixel(x, y).is_some_and(|px| px[0] > 128));
    assert!(lit);
}

#[test]
fn glyphs_stay_inside_their_own_block_row_if_font_present() {
    let Some(mut backend) = backend_if_font_present() else {
        return;
    };
    let grid = GlyphGrid::new(2, 1, vec![' ', '@']).unwrap();
    let raster = backend
        .paint(&grid, 16, 32, &style(Some(Color::BLACK)))
        .unwrap();
    let lit = |rows: std::ops::Range<u32>| {
        rows.flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| raster.pixel(x, y).is_some_and(|px| px[0] > 64))
            .count()
    };
    assert_eq!(lit(0..16), 0, "blank top block must stay background");
    assert!(lit(16..32) > 20, "'@' body must land in its own block");
}

#[test]
fn single_row_glyph_is_not_clipped_above_the_raster_if_font_present() {
    let Some(mut backend) = backend_if_font_present() else {
        return;
    };
    let raster = backend
        .paint(&grid(1, 1, '@'), 16, 16, &style(Some(Color::BLACK)))
        .unwrap();
    let lit = raster
        .data
        .chunks_exact(4)
        .filter(|px| px[0] > 64)
        .count();
    assert!(lit > 20);
}

#[test]
fn blank_grid_leaves_only_background_if_font_present() {
    let Some(mut backend) = backend_if_font_present() else {
        return;
    };
    let bg = Color::rgb(10, 20, 30);
    let raster = backend
        .paint(&grid(1, 2, ' '), 32, 16, &style(Some(bg)))
        .unwrap();
    assert!(raster.data.chunks_exact(4).all(|px| px == bg.to_array()));
}

#[test]
fn transparent_style_keeps_untouched_pixels_clear_if_font_present() {
    let Some(mut backend) = backend_if_font_present() else {
        return;
    };
    let raster = backend.paint(&grid(1, 1, '.'), 16, 16, &style(None)).unwrap();
    assert_eq!(raster.pixel(0, 0).map(|px| px[3]), Some(0));
    assert!(raster.data.chunks_exact(4).any(|px| px[3] == 0));
}

#[test]
fn present_maps_raster_through_transform_if_font_present() {
    let Some(mut backend) = backend_if_font_present() else {
        return;
    };
    let red = Color::rgb(255, 0, 0);
    let raster = RenderedRaster::filled(10, 10, red);
    let viewport = Viewport::new(40, 20).unwrap();
    let frame = backend
        .present(
            &raster,
            Affine::translate(Vec2::new(20.0, 5.0)),
            viewport,
            Color::BLACK,
        )
        .unwrap();
    assert_eq!((frame.width, frame.height), (40, 20));
    assert_eq!(frame.pixel(25, 10), Some(red.to_array()));
    assert_eq!(frame.pixel(2, 2), Some(Color::BLACK.to_array()));
}

#[test]
fn surface_dims_reject_zero_and_oversized() {
    assert!(surface_dims(0, 10).is_err());
    assert!(surface_dims(10, 70_000).is_err());
    assert_eq!(surface_dims(3, 4).unwrap(), (3, 4));
}
