use std::time::Duration;

use crate::assets::decode::{FormatHint, decode_source, placeholder_sample};
use crate::capture::session::{CaptureEvent, CaptureSession};
use crate::capture::source::FrameSource;
use crate::config::render::RenderConfig;
use crate::encode::export::{ExportArtifact, ExportFormat, export};
use crate::foundation::core::{Point, SourceImage, Viewport};
use crate::foundation::error::{GlyphError, GlyphResult};
use crate::glyph::sampler::{Rendition, sample};
use crate::render::backend::{RasterBackend, ViewportFrame};
use crate::render::view::{self, ViewState};
use crate::session::notify::{Notice, NoticeLevel, NotificationSink};
use crate::session::update::SessionUpdate;

/// Grid cell under a viewport point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellHit {
    /// Grid row.
    pub row: usize,
    /// Grid column.
    pub col: usize,
    /// Glyph stored at that cell.
    pub glyph: char,
}

/// Owns the source image, settings, view and the rendition derived from them.
///
/// Every change funnels through [`Session::apply`]: the new state is computed on the side and
/// swapped in only when the recompute succeeds, so a failed update leaves the previous image,
/// config and rendition in place and reports the error to the notification sink.
pub struct Session {
    image: Option<SourceImage>,
    config: RenderConfig,
    view: ViewState,
    rendition: Option<Rendition>,
    viewport_dirty: bool,
    backend: Box<dyn RasterBackend>,
    sink: Box<dyn NotificationSink>,
    capture: Option<CaptureSession>,
}

impl Session {
    pub fn new(backend: Box<dyn RasterBackend>, sink: Box<dyn NotificationSink>) -> Self {
        Self::with_config(RenderConfig::default(), backend, sink)
    }

    pub fn with_config(
        config: RenderConfig,
        backend: Box<dyn RasterBackend>,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            image: None,
            config,
            view: ViewState::default(),
            rendition: None,
            viewport_dirty: false,
            backend,
            sink,
            capture: None,
        }
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn rendition(&self) -> Option<&Rendition> {
        self.rendition.as_ref()
    }

    /// Set when the view or rendition changed since the last [`Session::present`].
    pub fn is_viewport_dirty(&self) -> bool {
        self.viewport_dirty
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.sink.notify(Notice::new(level, message));
    }

    fn report<T>(&mut self, result: GlyphResult<T>) -> GlyphResult<T> {
        if let Err(e) = &result {
            self.notify(NoticeLevel::Error, e.to_string());
        }
        result
    }

    /// Apply one change and recompute whatever depends on it.
    pub fn apply(&mut self, update: SessionUpdate) -> GlyphResult<()> {
        let result = self.apply_inner(update);
        self.report(result)
    }

    fn apply_inner(&mut self, update: SessionUpdate) -> GlyphResult<()> {
        match update {
            SessionUpdate::View(event) => {
                event.apply_to(&mut self.view);
                self.viewport_dirty = true;
                Ok(())
            }
            SessionUpdate::LoadImage(image) => {
                self.replace_image(image)?;
                self.notify(NoticeLevel::Success, "Image loaded");
                Ok(())
            }
            SessionUpdate::CaptureFrame(image) => self.replace_image(image),
            SessionUpdate::SetConfig(config) => self.replace_config(config),
            SessionUpdate::Edit(edit) => {
                let mut config = self.config.clone();
                edit.apply_to(&mut config);
                self.replace_config(config)
            }
        }
    }

    fn replace_image(&mut self, image: SourceImage) -> GlyphResult<()> {
        let rendition = sample(&image, &self.config, self.backend.as_mut())?;
        self.image = Some(image);
        self.rendition = Some(rendition);
        self.viewport_dirty = true;
        Ok(())
    }

    fn replace_config(&mut self, config: RenderConfig) -> GlyphResult<()> {
        config.validate()?;
        if let Some(image) = &self.image {
            let rendition = sample(image, &config, self.backend.as_mut())?;
            self.rendition = Some(rendition);
            self.viewport_dirty = true;
        }
        self.config = config;
        Ok(())
    }

    /// Decode encoded image bytes and load them. Decode warnings are forwarded to the sink.
    pub fn load_bytes(&mut self, bytes: &[u8], hint: FormatHint<'_>) -> GlyphResult<()> {
        let decoded = decode_source(bytes, hint);
        let decoded = self.report(decoded)?;
        for warning in &decoded.warnings {
            self.notify(NoticeLevel::Warning, warning.to_string());
        }
        self.apply(SessionUpdate::LoadImage(decoded.image))
    }

    /// Load the built-in placeholder image.
    pub fn load_sample(&mut self) -> GlyphResult<()> {
        let sample = placeholder_sample();
        let image = self.report(sample)?;
        self.apply(SessionUpdate::LoadImage(image))
    }

    /// Draw the current raster into a viewport, cleared to the background color.
    pub fn present(&mut self, viewport: Viewport) -> GlyphResult<ViewportFrame> {
        let Some(rendition) = &self.rendition else {
            return Err(GlyphError::validation("no image loaded"));
        };
        let frame = view::present(
            &rendition.raster,
            &self.view,
            viewport,
            self.config.background,
            self.backend.as_mut(),
        )?;
        self.viewport_dirty = false;
        Ok(frame)
    }

    /// Export the current rendition.
    pub fn export(&mut self, format: ExportFormat) -> GlyphResult<ExportArtifact> {
        let result = match &self.rendition {
            Some(rendition) => export(rendition, format, self.backend.as_mut()),
            None => Err(GlyphError::validation("nothing to export: no image loaded")),
        };
        let artifact = self.report(result)?;
        self.notify(
            NoticeLevel::Success,
            format!("Exported {}", artifact.file_name),
        );
        Ok(artifact)
    }

    /// Glyph cell under `point` in a viewport of the given size.
    pub fn cell_at(&self, point: Point, viewport: Viewport) -> Option<CellHit> {
        let rendition = self.rendition.as_ref()?;
        let raster = &rendition.raster;
        let p = view::viewport_to_raster(point, raster.width, raster.height, &self.view, viewport)?;
        if p.x < 0.0 || p.y < 0.0 || p.x >= f64::from(raster.width) || p.y >= f64::from(raster.height)
        {
            return None;
        }
        let block = f64::from(rendition.config.block_size.max(1));
        let row = (p.y / block) as usize;
        let col = (p.x / block) as usize;
        let glyph = rendition.grid.get(row, col)?;
        Some(CellHit { row, col, glyph })
    }

    /// Begin periodic capture from `source`, replacing any capture already running.
    pub fn start_capture<S: FrameSource>(&mut self, source: S, interval: Duration) -> GlyphResult<()> {
        self.stop_capture();
        let started = CaptureSession::start(source, interval);
        let capture = self.report(started)?;
        self.notify(
            NoticeLevel::Info,
            format!("Capturing from {}", capture.source()),
        );
        self.capture = Some(capture);
        Ok(())
    }

    pub fn stop_capture(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            let discarded = capture.stop();
            tracing::debug!(discarded, "discarded pending capture events");
            self.notify(NoticeLevel::Info, "Capture stopped");
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    /// Apply the newest pending capture frame, then handle the end of capture if it was reached.
    ///
    /// Returns the sequence number of the applied frame, if any. A frame that arrived before a
    /// capture failure is still applied before the failure is returned.
    pub fn pump_capture(&mut self) -> GlyphResult<Option<u64>> {
        let mut latest = None;
        let mut end = None;
        while let Some(event) = self.capture.as_ref().and_then(|c| c.try_next()) {
            match event {
                CaptureEvent::Frame { seq, image } => latest = Some((seq, image)),
                other => {
                    end = Some(other);
                    break;
                }
            }
        }
        let applied = match latest {
            Some((seq, image)) => self
                .apply(SessionUpdate::CaptureFrame(image))
                .map(|()| Some(seq)),
            None => Ok(None),
        };
        if let Some(end) = end {
            self.finish_capture(end)?;
        }
        applied
    }

    /// Block up to `timeout` for the next capture event and apply it.
    ///
    /// `Ok(None)` means the timeout elapsed or capture has ended.
    pub fn wait_capture(&mut self, timeout: Duration) -> GlyphResult<Option<u64>> {
        let Some(event) = self.capture.as_ref().and_then(|c| c.next_timeout(timeout)) else {
            return Ok(None);
        };
        match event {
            CaptureEvent::Frame { seq, image } => {
                self.apply(SessionUpdate::CaptureFrame(image))?;
                Ok(Some(seq))
            }
            other => {
                self.finish_capture(other)?;
                Ok(None)
            }
        }
    }

    fn finish_capture(&mut self, event: CaptureEvent) -> GlyphResult<()> {
        self.stop_capture();
        match event {
            CaptureEvent::Failed(e) => {
                self.notify(NoticeLevel::Error, format!("Capture failed: {e}"));
                Err(e)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/context.rs"]
mod tests;
