use crate::gizmos::CursorIcon;
use crate::input::{Key, KeyEvent, Modifiers, PointerButton, PointerEvent, WheelEvent};
use annota_core::state::Document;
use annota_core::viewport::ViewportMapper;
use ultraviolet::Vec2;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum ManipulationType {
    Pan,
    Scrub,
}
impl ManipulationType {
    fn cursor(self, holding: bool) -> CursorIcon {
        match (self, holding) {
            (Self::Pan, true) => CursorIcon::Grabbing,
            (Self::Pan, false) => CursorIcon::Grab,
            (Self::Scrub, true) => CursorIcon::NeswResize,
            (Self::Scrub, false) => CursorIcon::ZoomIn,
        }
    }
}

/// A drag in progress, relative to the view at the time it started.
#[derive(Copy, Clone, Debug)]
struct Gesture {
    kind: ManipulationType,
    start: Vec2,
    original: ViewportMapper,
}
impl Gesture {
    fn begin(kind: ManipulationType, doc: &Document, event: &PointerEvent) -> Self {
        Self {
            kind,
            start: event.pos,
            original: doc.viewport,
        }
    }
    fn update(&self, doc: &mut Document, pos: Vec2, scrub_speed: f32) {
        let delta = pos - self.start;
        let mut view = self.original;
        match self.kind {
            ManipulationType::Pan => view.pan(delta),
            ManipulationType::Scrub => {
                // Up or right zooms in, about where the drag started.
                view.zoom(scrub_speed.powf(delta.x - delta.y), self.start);
            }
        }
        doc.viewport = view;
    }
}

/// View gestures available from every tool: space-drag or middle-drag to pan, shift+alt drag to
/// scrub zoom, and the wheel to zoom at the pointer. These pre-empt whatever the tool would do.
pub struct Navigation {
    gesture: Option<Gesture>,
    space_held: bool,
    scrub_speed: f32,
    wheel_step: f32,
}
impl Navigation {
    pub fn new(settings: &crate::settings::ViewSettings) -> Self {
        Self {
            gesture: None,
            space_held: false,
            scrub_speed: settings.scrub_speed,
            wheel_step: settings.wheel_step,
        }
    }
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }
    /// Returns true if this press starts a view gesture.
    pub fn pointer_down(&mut self, doc: &Document, event: &PointerEvent) -> bool {
        let kind = if self.space_held || event.button == PointerButton::Middle {
            ManipulationType::Pan
        } else if event.modifiers.contains(Modifiers::SHIFT | Modifiers::ALT) {
            ManipulationType::Scrub
        } else {
            return false;
        };
        log::trace!("navigation {kind:?} from {:?}", event.pos);
        self.gesture = Some(Gesture::begin(kind, doc, event));
        true
    }
    pub fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        match &self.gesture {
            Some(gesture) => {
                gesture.update(doc, event.pos, self.scrub_speed);
                true
            }
            None => false,
        }
    }
    pub fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                gesture.update(doc, event.pos, self.scrub_speed);
                true
            }
            None => false,
        }
    }
    pub fn key_down(&mut self, event: &KeyEvent) -> bool {
        if event.key == Key::Space {
            self.space_held = true;
            true
        } else {
            false
        }
    }
    pub fn key_up(&mut self, event: &KeyEvent) -> bool {
        if event.key == Key::Space {
            self.space_held = false;
            true
        } else {
            false
        }
    }
    /// Zoom in or out about the pointer.
    pub fn wheel(&mut self, doc: &mut Document, event: &WheelEvent) {
        let factor = (1.0 + self.wheel_step).powf(event.delta);
        doc.viewport.zoom(factor, event.pos);
    }
    #[must_use]
    pub fn cursor_hint(&self) -> Option<CursorIcon> {
        match (&self.gesture, self.space_held) {
            (Some(gesture), _) => Some(gesture.kind.cursor(true)),
            (None, true) => Some(ManipulationType::Pan.cursor(false)),
            (None, false) => None,
        }
    }
    pub fn exit(&mut self) {
        self.gesture = None;
        self.space_held = false;
    }
}

/// The hand tool. Primary drag pans.
pub struct Navigate {
    gesture: Option<Gesture>,
}
impl Navigate {
    pub fn new() -> Self {
        Self { gesture: None }
    }
}
impl super::PenTool for Navigate {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        self.gesture = Some(Gesture::begin(ManipulationType::Pan, doc, event));
    }
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        if let Some(gesture) = &self.gesture {
            gesture.update(doc, event.pos, 1.0);
        }
    }
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        if let Some(gesture) = self.gesture.take() {
            gesture.update(doc, event.pos, 1.0);
        }
        // View changes aren't document edits.
        false
    }
    fn cursor_hint(&self) -> CursorIcon {
        ManipulationType::Pan.cursor(self.gesture.is_some())
    }
    fn exit(&mut self, _: &mut Document) -> bool {
        self.gesture = None;
        false
    }
}
