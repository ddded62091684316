//! Font-free backend for unit tests.
//!
//! Fills each non-blank cell's block with the characters color so tests can see where glyphs
//! would land without needing a system font.

use crate::foundation::core::{Affine, Color, Viewport};
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::glyph::grid::GlyphGrid;
use crate::render::backend::{PaintStyle, RasterBackend, RenderedRaster, ViewportFrame};

#[derive(Default)]
pub(crate) struct StubBackend {
    pub(crate) paints: usize,
    pub(crate) presents: usize,
    pub(crate) fail_paint: bool,
    pub(crate) last_transform: Option<Affine>,
}

impl RasterBackend for StubBackend {
    fn paint(
        &mut self,
        grid: &GlyphGrid,
        width: u32,
        height: u32,
        style: &PaintStyle,
    ) -> GlyphResult<RenderedRaster> {
        if self.fail_paint {
            return Err(GlyphError::font("stub backend refuses to paint"));
        }
        self.paints += 1;
        let mut raster = RenderedRaster::filled(
            width,
            height,
            style.background.unwrap_or(Color::TRANSPARENT),
        );
        let block = style.block_size.max(1);
        for y in 0..height {
            for x in 0..width {
                let row = (y / block) as usize;
                let col = (x / block) as usize;
                if grid.get(row, col).is_some_and(|ch| !ch.is_whitespace()) {
                    let i = ((y as usize) * (width as usize) + x as usize) * 4;
                    raster.data[i..i + 4].copy_from_slice(&style.characters.to_array());
                }
            }
        }
        Ok(raster)
    }

    fn present(
        &mut self,
        raster: &RenderedRaster,
        transform: Affine,
        viewport: Viewport,
        clear: Color,
    ) -> GlyphResult<ViewportFrame> {
        raster.check_len()?;
        self.presents += 1;
        self.last_transform = Some(transform);
        Ok(RenderedRaster::filled(viewport.width, viewport.height, clear))
    }
}
