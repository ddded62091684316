use crate::config::presets::{ColorPreset, Resolution};
use crate::config::render::RenderConfig;
use crate::foundation::core::{Color, Point, SourceImage};
use crate::glyph::ramp::CharacterSet;
use crate::render::view::ViewState;

/// Every change a session accepts. All of them go through [`Session::apply`].
///
/// [`Session::apply`]: crate::session::context::Session::apply
#[derive(Clone, Debug)]
pub enum SessionUpdate {
    LoadImage(SourceImage),
    CaptureFrame(SourceImage),
    SetConfig(RenderConfig),
    Edit(ConfigEdit),
    View(ViewEvent),
}

/// One control-panel change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigEdit {
    CharacterSet(CharacterSet),
    Resolution(Resolution),
    BlockSize(u32),
    Invert(bool),
    Brightness(i32),
    Contrast(i32),
    Background(Color),
    Characters(Color),
    Preset(ColorPreset),
}

impl ConfigEdit {
    pub fn apply_to(self, config: &mut RenderConfig) {
        match self {
            ConfigEdit::CharacterSet(set) => config.character_set = set,
            ConfigEdit::Resolution(r) => config.block_size = r.block_size(),
            ConfigEdit::BlockSize(b) => config.block_size = b,
            ConfigEdit::Invert(v) => config.invert = v,
            ConfigEdit::Brightness(v) => config.brightness = v,
            ConfigEdit::Contrast(v) => config.contrast = v,
            ConfigEdit::Background(c) => config.background = c,
            ConfigEdit::Characters(c) => config.characters = c,
            ConfigEdit::Preset(p) => {
                let (bg, fg) = p.colors();
                config.background = bg;
                config.characters = fg;
            }
        }
    }
}

/// Pointer, wheel and button input on the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Wheel { delta_y: f64 },
    /// Double-click.
    Reset,
    SetZoom(f64),
    SetRotation(f64),
    ToggleFlipX,
    ToggleFlipY,
}

impl ViewEvent {
    pub fn apply_to(self, view: &mut ViewState) {
        match self {
            ViewEvent::PointerDown(p) => view.pointer_down(p),
            ViewEvent::PointerMove(p) => view.pointer_move(p),
            ViewEvent::PointerUp => view.pointer_up(),
            ViewEvent::Wheel { delta_y } => view.wheel(delta_y),
            ViewEvent::Reset => view.reset(),
            ViewEvent::SetZoom(z) => view.set_zoom(z),
            ViewEvent::SetRotation(r) => view.set_rotation(r),
            ViewEvent::ToggleFlipX => view.toggle_flip_x(),
            ViewEvent::ToggleFlipY => view.toggle_flip_y(),
        }
    }
}
