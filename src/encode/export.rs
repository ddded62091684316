use std::fmt::Write as _;
use std::io::Cursor;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::render::RenderConfig;
use crate::foundation::core::Color;
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::glyph::grid::GlyphGrid;
use crate::glyph::sampler::Rendition;
use crate::render::backend::{PaintStyle, RasterBackend, RenderedRaster};

/// Downloadable formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    PngTransparent,
    Jpg,
    Svg,
    Txt,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Png,
        ExportFormat::PngTransparent,
        ExportFormat::Jpg,
        ExportFormat::Svg,
        ExportFormat::Txt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::PngTransparent => "png-transparent",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Txt => "txt",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png | Self::PngTransparent => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Txt => "txt",
        }
    }

    /// Whether the format is produced from the glyph grid alone, without any raster.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Txt | Self::Svg)
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png | Self::PngTransparent => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Txt => "text/plain",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = GlyphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s || (s == "jpeg" && *f == Self::Jpg))
            .ok_or_else(|| {
                GlyphError::validation(format!(
                    "unknown export format '{s}' (expected png, png-transparent, jpg, svg or txt)"
                ))
            })
    }
}

/// Bytes ready to be written or downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name, extension included.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Encoded payload.
    pub bytes: Vec<u8>,
}

/// `ascii-<unix millis>.<ext>`
pub fn artifact_name(format: ExportFormat, unix_millis: u128) -> String {
    format!("ascii-{unix_millis}.{}", format.extension())
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn artifact(format: ExportFormat, bytes: Vec<u8>) -> ExportArtifact {
    let artifact = ExportArtifact {
        file_name: artifact_name(format, now_millis()),
        mime: format.mime(),
        bytes,
    };
    tracing::info!(file = %artifact.file_name, len = artifact.bytes.len(), "exported");
    artifact
}

/// Export a text format straight from a grid. Returns `None` for raster formats.
pub fn export_grid(
    grid: &GlyphGrid,
    config: &RenderConfig,
    format: ExportFormat,
) -> Option<ExportArtifact> {
    let bytes = match format {
        ExportFormat::Txt => grid.to_text().into_bytes(),
        ExportFormat::Svg => to_svg(grid, config).into_bytes(),
        _ => return None,
    };
    Some(artifact(format, bytes))
}

/// Serialize the current rendition. `backend` is only used to repaint for `png-transparent`.
#[tracing::instrument(skip(rendition, backend), fields(rows = rendition.grid.rows(), cols = rendition.grid.cols()))]
pub fn export(
    rendition: &Rendition,
    format: ExportFormat,
    backend: &mut dyn RasterBackend,
) -> GlyphResult<ExportArtifact> {
    if let Some(text) = export_grid(&rendition.grid, &rendition.config, format) {
        return Ok(text);
    }
    let bytes = match format {
        ExportFormat::Png => encode_png(&rendition.raster)?,
        ExportFormat::Jpg => encode_jpeg(&rendition.raster)?,
        ExportFormat::PngTransparent => {
            let style = PaintStyle::transparent(&rendition.config);
            let raster = backend.paint(
                &rendition.grid,
                rendition.raster.width,
                rendition.raster.height,
                &style,
            )?;
            encode_png(&raster)?
        }
        ExportFormat::Txt | ExportFormat::Svg => {
            return Err(GlyphError::encode(format!("{format} is not a raster format")));
        }
    };
    Ok(artifact(format, bytes))
}

/// Vector markup with one `<text>` element per non-blank row.
///
/// Blank rows are dropped and the rows after them move up, so the document height counts kept
/// rows only.
pub fn to_svg(grid: &GlyphGrid, config: &RenderConfig) -> String {
    let block = config.block_size;
    let lines: Vec<String> = grid
        .lines()
        .filter(|l| !l.trim().is_empty())
        .collect();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    let width = longest * block;
    let height = lines.len() as u32 * block;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let bg = config.background;
    if !bg.is_transparent() {
        let _ = write!(
            out,
            r#"<rect x="0" y="0" width="{width}" height="{height}"{}/>"#,
            svg_fill(bg)
        );
    }
    for (i, line) in lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<text x="0" y="{}" font-family="IBM Plex Mono, monospace" font-size="{block}"{} xml:space="preserve">{}</text>"#,
            (i as u32 + 1) * block,
            svg_fill(config.characters),
            xml_escape(line)
        );
    }
    out.push_str("</svg>");
    out
}

fn svg_fill(c: Color) -> String {
    let hex = format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b);
    if c.a == u8::MAX {
        format!(r#" fill="{hex}""#)
    } else {
        format!(
            r#" fill="{hex}" fill-opacity="{:.3}""#,
            f64::from(c.a) / 255.0
        )
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn to_rgba_image(raster: &RenderedRaster) -> GlyphResult<image::RgbaImage> {
    raster.check_len()?;
    image::RgbaImage::from_raw(raster.width, raster.height, raster.data.clone())
        .ok_or_else(|| GlyphError::encode("raster buffer size mismatch"))
}

fn encode_png(raster: &RenderedRaster) -> GlyphResult<Vec<u8>> {
    let img = to_rgba_image(raster)?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| GlyphError::encode(format!("png: {e}")))?;
    Ok(out)
}

fn encode_jpeg(raster: &RenderedRaster) -> GlyphResult<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(to_rgba_image(raster)?).to_rgb8();
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
        .map_err(|e| GlyphError::encode(format!("jpeg: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
