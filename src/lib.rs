//! glyphcast turns raster and vector images into character art.
//!
//! A [`Session`] owns the source image and a [`RenderConfig`]; every change goes through
//! [`Session::apply`], which resamples the image into a [`GlyphGrid`] and paints it into a
//! raster through a [`RasterBackend`]. The raster is presented into a viewport through an
//! affine [`ViewState`] transform and can be exported as text, SVG, PNG or JPEG.
#![forbid(unsafe_code)]

mod foundation;

/// Image decoding and glyph fonts.
pub mod assets;
/// Periodic frame capture.
pub mod capture;
/// Render settings and their named presets.
pub mod config;
/// Export formats.
pub mod encode;
/// Luminance sampling and glyph quantization.
pub mod glyph;
/// Raster backends and the viewport transform.
pub mod render;
/// Session state and its single update path.
pub mod session;

pub use crate::foundation::core::{Affine, Color, Point, SourceImage, Vec2, Viewport};
pub use crate::foundation::error::{GlyphError, GlyphResult};

pub use crate::assets::decode::{
    DecodeWarning, Decoded, FormatHint, ImageKind, decode_path, decode_source, placeholder_sample,
};
pub use crate::assets::font::GlyphFont;
pub use crate::capture::session::{CaptureEvent, CaptureSession, DEFAULT_CAPTURE_INTERVAL};
pub use crate::capture::source::{FrameSource, ImageSequenceSource};
pub use crate::config::presets::{ColorPreset, Resolution};
pub use crate::config::render::RenderConfig;
pub use crate::encode::export::{ExportArtifact, ExportFormat};
pub use crate::glyph::grid::GlyphGrid;
pub use crate::glyph::ramp::CharacterSet;
pub use crate::glyph::sampler::Rendition;
pub use crate::render::backend::{
    BackendKind, PaintStyle, RasterBackend, RenderedRaster, ViewportFrame, create_backend,
};
pub use crate::render::view::ViewState;
pub use crate::session::context::{CellHit, Session};
pub use crate::session::notify::{MemorySink, Notice, NoticeLevel, NotificationSink, TracingSink};
pub use crate::session::update::{ConfigEdit, SessionUpdate, ViewEvent};
