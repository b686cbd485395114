use crate::gizmos::{CursorIcon, Gizmo, OverlaySurface};
use crate::input::PointerEvent;
use annota_core::geom::Rect;
use annota_core::state::image::Arrangement;
use annota_core::state::Document;
use ultraviolet::Vec2;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}
impl Edge {
    /// Which edge of `rect` is within `tolerance` of `pos`, if any.
    fn find(rect: &Rect, pos: Vec2, tolerance: f32) -> Option<Self> {
        let within_x = pos.x >= rect.min.x - tolerance && pos.x <= rect.max.x + tolerance;
        let within_y = pos.y >= rect.min.y - tolerance && pos.y <= rect.max.y + tolerance;
        let near = |a: f32, b: f32| (a - b).abs() <= tolerance;
        if within_y && near(pos.x, rect.min.x) {
            Some(Self::Left)
        } else if within_y && near(pos.x, rect.max.x) {
            Some(Self::Right)
        } else if within_x && near(pos.y, rect.min.y) {
            Some(Self::Top)
        } else if within_x && near(pos.y, rect.max.y) {
            Some(Self::Bottom)
        } else {
            None
        }
    }
    /// Move this edge of `wipe` to `to`, in the same space.
    fn drag(self, wipe: &Rect, to: Vec2) -> Rect {
        let mut wipe = *wipe;
        match self {
            Self::Left => wipe.min.x = to.x,
            Self::Right => wipe.max.x = to.x,
            Self::Top => wipe.min.y = to.y,
            Self::Bottom => wipe.max.y = to.y,
        }
        wipe
    }
    fn cursor(self) -> CursorIcon {
        match self {
            Self::Left | Self::Right => CursorIcon::EwResize,
            Self::Top | Self::Bottom => CursorIcon::NsResize,
        }
    }
}

struct Drag {
    image: usize,
    edge: Edge,
    placement: Rect,
    original: Rect,
}

/// Drag the edges of stacked reference images to crop them, revealing the ones beneath.
pub struct Wipes {
    /// Grab distance in viewport pixels.
    tolerance: f32,
    drag: Option<Drag>,
    changed: bool,
}
impl Wipes {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            drag: None,
            changed: false,
        }
    }
}
impl super::PenTool for Wipes {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        if doc.arrangement() != Arrangement::Stacked || !doc.can_edit() {
            return;
        }
        let layout = doc.image_layout();
        // Topmost first.
        self.drag = doc
            .images()
            .iter()
            .zip(&layout)
            .enumerate()
            .rev()
            .find_map(|(image, (reference, placement))| {
                let visible = doc.viewport.to_viewport_rect(&reference.visible_rect(placement));
                let edge = Edge::find(&visible, event.pos, self.tolerance)?;
                Some(Drag {
                    image,
                    edge,
                    placement: *placement,
                    original: reference.wipe,
                })
            });
        if let Some(drag) = &self.drag {
            log::trace!("wiping image {} from {:?}", drag.image, drag.edge);
        }
    }
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        let Some(drag) = &self.drag else {
            return;
        };
        let local = super::units(doc, event) - drag.placement.min;
        match doc.set_wipe(drag.image, drag.edge.drag(&drag.original, local)) {
            // Clamping can land it right back where the press found it.
            Ok(()) => {
                self.changed = doc
                    .images()
                    .get(drag.image)
                    .is_some_and(|image| image.wipe != drag.original);
            }
            Err(err) => {
                log::debug!("wipe failed: {err}");
                self.drag = None;
            }
        }
    }
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        self.pointer_move(doc, event);
        self.drag = None;
        std::mem::take(&mut self.changed)
    }
    fn draw_overlay(&self, doc: &Document, surface: &mut dyn OverlaySurface) {
        if doc.arrangement() != Arrangement::Stacked {
            return;
        }
        for (reference, placement) in doc.images().iter().zip(doc.image_layout()) {
            let visible = reference.visible_rect(&placement);
            surface.push(Gizmo::Outline(doc.viewport.to_viewport_rect(&visible)));
        }
    }
    fn cursor_hint(&self) -> CursorIcon {
        self.drag
            .as_ref()
            .map_or(CursorIcon::Default, |drag| drag.edge.cursor())
    }
    fn is_dirty(&self) -> bool {
        self.changed
    }
    fn exit(&mut self, _: &mut Document) -> bool {
        self.drag = None;
        std::mem::take(&mut self.changed)
    }
}
