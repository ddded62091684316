use std::path::Path;

use anyhow::Context;

use crate::foundation::core::SourceImage;
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;

/// Inputs above this size still load, but the caller is warned.
pub const OVERSIZED_BYTES: usize = 4 * 1024 * 1024;

// Rasterizing an SVG beyond this edge is refused instead of allocating unbounded pixmaps.
const MAX_SVG_DIM: u32 = 16_384;

/// Accepted input encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    WebP,
    Svg,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            "image/svg+xml" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Identify the encoding from the leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Png) => return Some(Self::Png),
            Ok(image::ImageFormat::Jpeg) => return Some(Self::Jpeg),
            Ok(image::ImageFormat::WebP) => return Some(Self::WebP),
            _ => {}
        }
        let head = &bytes[..bytes.len().min(512)];
        let text = String::from_utf8_lossy(head);
        let text = text.trim_start_matches('\u{feff}').trim_start();
        if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
            return Some(Self::Svg);
        }
        None
    }

    fn image_format(self) -> Option<image::ImageFormat> {
        match self {
            Self::Png => Some(image::ImageFormat::Png),
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::WebP => Some(image::ImageFormat::WebP),
            Self::Svg => None,
        }
    }
}

/// What the caller knows about an input besides its bytes.
#[derive(Clone, Copy, Debug, Default)]
pub enum FormatHint<'a> {
    #[default]
    None,
    Mime(&'a str),
    Path(&'a Path),
}

/// Non-fatal findings attached to a successful decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeWarning {
    Oversized { bytes: usize },
}

impl std::fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oversized { bytes } => write!(
                f,
                "input is {:.1} MiB; conversion may be slow",
                *bytes as f64 / (1024.0 * 1024.0)
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Decoded {
    pub image: SourceImage,
    pub kind: ImageKind,
    pub warnings: Vec<DecodeWarning>,
}

/// Resolve the encoding of `bytes`: the hint wins when it names an accepted format, content
/// sniffing decides otherwise.
pub fn detect_kind(bytes: &[u8], hint: FormatHint<'_>) -> GlyphResult<ImageKind> {
    let hinted = match hint {
        FormatHint::None => None,
        FormatHint::Mime(m) => Some((ImageKind::from_mime(m), m.to_string())),
        FormatHint::Path(p) => Some((ImageKind::from_path(p), p.display().to_string())),
    };
    if let Some((Some(kind), _)) = hinted {
        return Ok(kind);
    }
    if let Some(kind) = ImageKind::sniff(bytes) {
        return Ok(kind);
    }
    let what = hinted.map(|(_, name)| name).unwrap_or_else(|| "input".to_string());
    Err(GlyphError::unsupported(format!(
        "{what}: expected PNG, JPEG, WebP or SVG"
    )))
}

#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_source(bytes: &[u8], hint: FormatHint<'_>) -> GlyphResult<Decoded> {
    if bytes.is_empty() {
        return Err(GlyphError::decode("input is empty"));
    }
    let kind = detect_kind(bytes, hint)?;

    let mut warnings = Vec::new();
    if bytes.len() > OVERSIZED_BYTES {
        let w = DecodeWarning::Oversized { bytes: bytes.len() };
        tracing::warn!(warning = %w, "large input");
        warnings.push(w);
    }

    let image = match kind.image_format() {
        Some(format) => decode_raster(bytes, format)?,
        None => decode_svg(bytes)?,
    };
    tracing::debug!(?kind, w = image.width(), h = image.height(), "decoded source image");
    Ok(Decoded {
        image,
        kind,
        warnings,
    })
}

/// Read and decode a file, using its extension as the format hint.
pub fn decode_path(path: impl AsRef<Path>) -> GlyphResult<Decoded> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))?;
    decode_source(&bytes, FormatHint::Path(path))
}

fn decode_raster(bytes: &[u8], format: image::ImageFormat) -> GlyphResult<SourceImage> {
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| GlyphError::decode(format!("{format:?}: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_rgba8(width, height, rgba.into_raw())
        .map_err(|e| GlyphError::decode(e.to_string()))
}

fn svg_options() -> usvg::Options<'static> {
    let mut opts = usvg::Options::default();
    opts.fontdb_mut().load_system_fonts();
    opts
}

fn decode_svg(bytes: &[u8]) -> GlyphResult<SourceImage> {
    let tree = usvg::Tree::from_data(bytes, &svg_options())
        .map_err(|e| GlyphError::decode(format!("svg: {e}")))?;
    rasterize_svg(&tree)
}

/// Rasterize `tree` at its intrinsic size into straight RGBA8.
fn rasterize_svg(tree: &usvg::Tree) -> GlyphResult<SourceImage> {
    fn to_px(v: f32) -> GlyphResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(GlyphError::decode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(GlyphError::decode(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| GlyphError::decode("failed to allocate svg pixmap"))?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    let mut data = pixmap.take();
    unpremultiply_rgba8_in_place(&mut data);
    SourceImage::from_rgba8(width, height, data)
}

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="400" viewBox="0 0 600 400">
  <rect width="600" height="400" fill="#333333"/>
  <text x="300" y="200" fill="#ffffff" font-family="sans-serif" font-size="32" text-anchor="middle" dominant-baseline="middle">Sample image</text>
</svg>"##;

/// Built-in 600x400 dark-gray sample used when no input image is available.
///
/// The caption needs a system font; without one the image is the plain gray card.
pub fn placeholder_sample() -> GlyphResult<SourceImage> {
    decode_svg(PLACEHOLDER_SVG.as_bytes())
}

/// Encode `image` as PNG bytes so test fixtures can be fed back through [`decode_source`].
#[cfg(test)]
pub(crate) fn encode_png(image: &SourceImage) -> GlyphResult<Vec<u8>> {
    let buf = image::RgbaImage::from_raw(image.width(), image.height(), image.rgba8().to_vec())
        .ok_or_else(|| GlyphError::encode("image buffer size mismatch"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(buf)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| GlyphError::encode(format!("png: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
