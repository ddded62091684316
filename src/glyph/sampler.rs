use crate::config::render::RenderConfig;
use crate::foundation::core::SourceImage;
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::glyph::adjust::adjust;
use crate::glyph::grid::GlyphGrid;
use crate::glyph::ramp;
use crate::render::backend::{PaintStyle, RasterBackend, RenderedRaster};

// Rec. 709 luma weights scaled by 10_000 so block sums stay exact integers.
const WEIGHT_R: u64 = 2126;
const WEIGHT_G: u64 = 7152;
const WEIGHT_B: u64 = 722;
const WEIGHT_SCALE: f64 = 10_000.0;

/// Glyph grid and rendered raster derived together from one source image and config.
#[derive(Clone, Debug)]
pub struct Rendition {
    /// One glyph per block of the source image.
    pub grid: GlyphGrid,
    /// The grid painted at `config.block_size` pixels per glyph.
    pub raster: RenderedRaster,
    /// Config the rendition was computed with; exports read sizes and colors from here.
    pub config: RenderConfig,
}

/// Per-pixel perceptual luminance on stored 0..=255 channel values (no gamma decode).
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (WEIGHT_R * u64::from(r) + WEIGHT_G * u64::from(g) + WEIGHT_B * u64::from(b)) as f64
        / WEIGHT_SCALE
}

/// `(rows, cols)` of the grid produced for an image of `width x height`.
pub fn grid_dims(width: u32, height: u32, block_size: u32) -> (usize, usize) {
    let b = block_size.max(1);
    (height.div_ceil(b) as usize, width.div_ceil(b) as usize)
}

/// Build the glyph grid only.
///
/// Walks the pixel buffer once, row by row, accumulating each pixel into the running sum of the
/// block column it falls in; a block band is resolved to glyphs when its last pixel row is read.
/// Partial blocks on the right/bottom edges average only their in-bounds pixels.
pub fn sample_grid(image: &SourceImage, config: &RenderConfig) -> GlyphResult<GlyphGrid> {
    config.validate()?;
    let ramp = config.ramp();
    let block = config.block_size;
    let (rows, cols) = grid_dims(image.width(), image.height(), block);
    let width = image.width() as usize;

    let mut sums = vec![0u64; cols];
    let mut counts = vec![0u64; cols];
    let mut cells = Vec::with_capacity(rows * cols);

    let data = image.rgba8();
    for (y, row) in data.chunks_exact(width * 4).enumerate() {
        for (x, px) in row.chunks_exact(4).enumerate() {
            let col = x / block as usize;
            sums[col] +=
                WEIGHT_R * u64::from(px[0]) + WEIGHT_G * u64::from(px[1]) + WEIGHT_B * u64::from(px[2]);
            counts[col] += 1;
        }

        let band_done = (y + 1) % block as usize == 0 || y + 1 == image.height() as usize;
        if !band_done {
            continue;
        }
        for col in 0..cols {
            let mean = block_mean(sums[col], counts[col]);
            let v = adjust(mean, config.brightness, config.contrast);
            let glyph = ramp::map(v / 255.0, &ramp, config.invert)
                .ok_or_else(|| GlyphError::validation("character ramp must be non-empty"))?;
            cells.push(glyph);
        }
        sums.fill(0);
        counts.fill(0);
    }

    GlyphGrid::new(rows, cols, cells)
}

/// Build the glyph grid and paint it through `backend` in one recomputation.
#[tracing::instrument(
    skip(image, config, backend),
    fields(w = image.width(), h = image.height(), block = config.block_size)
)]
pub fn sample(
    image: &SourceImage,
    config: &RenderConfig,
    backend: &mut dyn RasterBackend,
) -> GlyphResult<Rendition> {
    let grid = sample_grid(image, config)?;
    let style = PaintStyle::opaque(config);
    let raster = backend.paint(&grid, image.width(), image.height(), &style)?;
    tracing::debug!(rows = grid.rows(), cols = grid.cols(), "sampled glyph grid");
    Ok(Rendition {
        grid,
        raster,
        config: config.clone(),
    })
}

fn block_mean(sum: u64, count: u64) -> f64 {
    if count == 0 {
        // Cannot happen for ceil-sized grids; an empty block reads as black.
        return 0.0;
    }
    sum as f64 / (WEIGHT_SCALE * count as f64)
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/sampler.rs"]
mod tests;
