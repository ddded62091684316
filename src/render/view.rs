use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Color, Point, Vec2, Viewport};
use crate::foundation::error::GlyphResult;
use crate::render::backend::{RasterBackend, RenderedRaster, ViewportFrame};

pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 4.0;
/// Rotation slider bound in degrees, both directions.
pub const ROTATION_LIMIT: f64 = 180.0;
/// Zoom change per wheel delta unit.
pub const WHEEL_ZOOM_STEP: f64 = 0.001;

/// Presentation-only transform state of the viewport. Never affects the grid or exports.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Scale factor, clamped to `ZOOM_MIN..=ZOOM_MAX`.
    pub zoom: f64,
    /// Degrees, clockwise in viewport space.
    pub rotation: f64,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
    /// Offset in viewport pixels.
    pub pan: Vec2,
    #[serde(skip)]
    drag: Option<Point>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
            pan: Vec2::ZERO,
            drag: None,
        }
    }
}

impl ViewState {
    /// Zoom, pan and rotation back to identity. Flips are left as they are.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
        self.rotation = 0.0;
        self.drag = None;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_or(zoom, ZOOM_MIN, ZOOM_MAX, self.zoom);
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = clamp_or(degrees, -ROTATION_LIMIT, ROTATION_LIMIT, self.rotation);
    }

    /// Wheel zoom: positive `delta_y` (scrolling down) zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        self.set_zoom(self.zoom - delta_y * WHEEL_ZOOM_STEP);
    }

    pub fn toggle_flip_x(&mut self) {
        self.flip_x = !self.flip_x;
    }

    pub fn toggle_flip_y(&mut self) {
        self.flip_y = !self.flip_y;
    }

    pub fn pointer_down(&mut self, at: Point) {
        self.drag = Some(at);
    }

    /// Pan by the pointer motion since the last event, only while a drag is active.
    pub fn pointer_move(&mut self, at: Point) {
        if let Some(last) = self.drag {
            self.pan += at - last;
            self.drag = Some(at);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

fn clamp_or(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.clamp(lo, hi) } else { fallback }
}

/// Raster-to-viewport transform.
///
/// Applied to a raster point right to left: center the raster on the origin, flip, rotate,
/// pan (pre-divided by zoom so the offset stays in viewport pixels), zoom, then move the
/// origin to the viewport center.
pub fn compose(raster_width: u32, raster_height: u32, view: &ViewState, viewport: Viewport) -> Affine {
    let half = Vec2::new(f64::from(raster_width) / 2.0, f64::from(raster_height) / 2.0);
    let flip = Affine::scale_non_uniform(
        if view.flip_x { -1.0 } else { 1.0 },
        if view.flip_y { -1.0 } else { 1.0 },
    );
    Affine::translate(viewport.center())
        * Affine::scale(view.zoom)
        * Affine::translate(view.pan / view.zoom)
        * Affine::rotate(view.rotation.to_radians())
        * flip
        * Affine::translate(-half)
}

/// Map a viewport point back into raster pixel space; `None` for a degenerate transform.
pub fn viewport_to_raster(
    point: Point,
    raster_width: u32,
    raster_height: u32,
    view: &ViewState,
    viewport: Viewport,
) -> Option<Point> {
    let t = compose(raster_width, raster_height, view, viewport);
    let det = t.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return None;
    }
    let p = t.inverse() * point;
    (p.x.is_finite() && p.y.is_finite()).then_some(p)
}

/// Clear a viewport to `clear` and draw `raster` through the composed view transform.
#[tracing::instrument(skip(raster, backend), fields(w = raster.width, h = raster.height))]
pub fn present(
    raster: &RenderedRaster,
    view: &ViewState,
    viewport: Viewport,
    clear: Color,
    backend: &mut dyn RasterBackend,
) -> GlyphResult<ViewportFrame> {
    let transform = compose(raster.width, raster.height, view, viewport);
    backend.present(raster, transform, viewport, clear)
}

#[cfg(test)]
#[path = "../../tests/unit/render/view.rs"]
mod tests;
