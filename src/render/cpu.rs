use std::sync::Arc;

use crate::assets::font::{GlyphFont, GlyphShaper};
use crate::foundation::core::{Affine, Color, Viewport};
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::glyph::grid::GlyphGrid;
use crate::render::backend::{PaintStyle, RasterBackend, RenderedRaster, ViewportFrame};

/// CPU backend powered by `vello_cpu` for glyph and image rasterization.
pub struct CpuBackend {
    font: vello_cpu::peniko::FontData,
    shaper: GlyphShaper,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuBackend {
    pub fn new(font: GlyphFont) -> GlyphResult<Self> {
        let shaper = GlyphShaper::new(&font)?;
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes().to_vec()),
            0,
        );
        Ok(Self {
            font: data,
            shaper,
            ctx: None,
        })
    }

    fn take_ctx(&mut self, width: u16, height: u16) -> vello_cpu::RenderContext {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx
    }

    fn positioned_glyphs(
        &mut self,
        grid: &GlyphGrid,
        block: u32,
    ) -> GlyphResult<Vec<vello_cpu::Glyph>> {
        let size = block as f32;
        let mut out = Vec::new();
        for row in 0..grid.rows() {
            let oy = (row as u32 * block) as f32;
            for col in 0..grid.cols() {
                let Some(ch) = grid.get(row, col) else {
                    continue;
                };
                if ch.is_whitespace() {
                    continue;
                }
                let ox = (col as u32 * block) as f32;
                for g in self.shaper.shape(ch, size)?.iter() {
                    out.push(vello_cpu::Glyph {
                        id: g.id,
                        x: ox + g.x,
                        y: oy + g.y,
                    });
                }
            }
        }
        Ok(out)
    }
}

impl RasterBackend for CpuBackend {
    fn paint(
        &mut self,
        grid: &GlyphGrid,
        width: u32,
        height: u32,
        style: &PaintStyle,
    ) -> GlyphResult<RenderedRaster> {
        let (w, h) = surface_dims(width, height)?;
        let glyphs = self.positioned_glyphs(grid, style.block_size.max(1))?;

        let mut ctx = self.take_ctx(w, h);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if let Some(bg) = style.background {
            ctx.set_paint(to_cpu_color(bg));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }
        if !glyphs.is_empty() {
            ctx.set_paint(to_cpu_color(style.characters));
            ctx.glyph_run(&self.font)
                .font_size(style.block_size as f32)
                .fill_glyphs(glyphs.into_iter());
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(read_straight(&pixmap, width, height))
    }

    fn present(
        &mut self,
        raster: &RenderedRaster,
        transform: Affine,
        viewport: Viewport,
        clear: Color,
    ) -> GlyphResult<ViewportFrame> {
        raster.check_len()?;
        let (vw, vh) = surface_dims(viewport.width, viewport.height)?;
        let image = raster_to_image(raster)?;

        let mut ctx = self.take_ctx(vw, vh);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if !clear.is_transparent() {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(to_cpu_color(clear));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(viewport.width),
                f64::from(viewport.height),
            ));
        }
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(image);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(raster.width),
            f64::from(raster.height),
        ));

        let mut pixmap = vello_cpu::Pixmap::new(vw, vh);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(read_straight(&pixmap, viewport.width, viewport.height))
    }
}

fn surface_dims(width: u32, height: u32) -> GlyphResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| GlyphError::validation(format!("surface width exceeds u16: {width}")))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| GlyphError::validation(format!("surface height exceeds u16: {height}")))?;
    if w == 0 || h == 0 {
        return Err(GlyphError::validation("surface width/height must be > 0"));
    }
    Ok((w, h))
}

fn to_cpu_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn read_straight(pixmap: &vello_cpu::Pixmap, width: u32, height: u32) -> RenderedRaster {
    let mut data = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut data);
    RenderedRaster {
        width,
        height,
        data,
    }
}

fn raster_to_image(raster: &RenderedRaster) -> GlyphResult<vello_cpu::Image> {
    let (w, h) = surface_dims(raster.width, raster.height)?;
    let mut premul = raster.data.clone();
    premultiply_rgba8_in_place(&mut premul);
    let pixels = premul
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
