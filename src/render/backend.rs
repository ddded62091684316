use crate::assets::font::GlyphFont;
use crate::config::render::RenderConfig;
use crate::foundation::core::{Affine, Color, Viewport};
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::glyph::grid::GlyphGrid;

/// RGBA8 pixels produced by a backend.
///
/// Pixels are **straight** (not premultiplied) alpha so they can be handed to image encoders
/// directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedRaster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

/// A presented viewport is just another raster of the viewport's size.
pub type ViewportFrame = RenderedRaster;

impl RenderedRaster {
    /// Allocate a raster filled with `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let n = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            data.extend_from_slice(&color.to_array());
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub(crate) fn check_len(&self) -> GlyphResult<()> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.data.len() != expected {
            return Err(GlyphError::validation("raster byte len mismatch"));
        }
        Ok(())
    }
}

/// How glyphs are painted onto a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintStyle {
    /// Block edge in pixels; glyphs use a font of this nominal size.
    pub block_size: u32,
    /// Fill drawn before glyphs. `None` leaves the surface fully transparent.
    pub background: Option<Color>,
    /// Glyph color.
    pub characters: Color,
}

impl PaintStyle {
    /// Background painted with the configured color (a transparent color draws nothing).
    pub fn opaque(config: &RenderConfig) -> Self {
        Self {
            block_size: config.block_size,
            background: Some(config.background).filter(|c| !c.is_transparent()),
            characters: config.characters,
        }
    }

    /// Background never drawn, whatever the config says.
    pub fn transparent(config: &RenderConfig) -> Self {
        Self {
            block_size: config.block_size,
            background: None,
            characters: config.characters,
        }
    }
}

/// Raster surface operations the session depends on.
///
/// `paint` must place the glyph of cell `(r, c)` with its top-left at pixel
/// `(c * block_size, r * block_size)`.
pub trait RasterBackend {
    /// Paint `grid` onto a fresh `width x height` surface.
    fn paint(
        &mut self,
        grid: &GlyphGrid,
        width: u32,
        height: u32,
        style: &PaintStyle,
    ) -> GlyphResult<RenderedRaster>;

    /// Clear a viewport-sized surface to `clear` and draw `raster` through `transform`.
    ///
    /// `transform` maps raster pixel space into viewport pixel space.
    fn present(
        &mut self,
        raster: &RenderedRaster,
        transform: Affine,
        viewport: Viewport,
        clear: Color,
    ) -> GlyphResult<ViewportFrame>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    Cpu,
}

/// Create a rendering backend that paints with `font`.
pub fn create_backend(kind: BackendKind, font: GlyphFont) -> GlyphResult<Box<dyn RasterBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(font)?)),
    }
}
