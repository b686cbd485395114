use crate::gizmos::{CursorIcon, Gizmo, OverlaySurface};
use crate::input::{Modifiers, PointerEvent};
use annota_core::geom::Rect;
use annota_core::state::selection::{Combine, Member};
use annota_core::state::Document;
use ultraviolet::Vec2;

/// Marquee selection of control points on the current layer.
///
/// Shift adds to the selection, ctrl removes from it, and both together toggle. Selecting doesn't
/// edit anything, so it works on locked documents too.
pub struct Select {
    /// Press and current position, in document units.
    marquee: Option<(Vec2, Vec2)>,
}
impl Select {
    pub fn new() -> Self {
        Self { marquee: None }
    }
    fn combine_for(modifiers: Modifiers) -> Combine {
        let shift = modifiers.contains(Modifiers::SHIFT);
        let ctrl = modifiers.contains(Modifiers::CTRL);
        match (shift, ctrl) {
            (true, true) => Combine::Invert,
            (true, false) => Combine::Add,
            (false, true) => Combine::Remove,
            (false, false) => Combine::Replace,
        }
    }
    /// Every point of the current layer inside `rect`.
    fn points_within(doc: &Document, rect: &Rect) -> Vec<Member> {
        let Some(layer) = doc.layers().current() else {
            return Vec::new();
        };
        layer
            .shapes
            .iter()
            .flat_map(|shape| {
                shape
                    .points()
                    .enumerate()
                    .filter(|(_, point)| rect.contains(*point))
                    .map(|(index, _)| Member::Point {
                        shape: shape.id(),
                        index,
                    })
            })
            .collect()
    }
}
impl super::PenTool for Select {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        let pos = super::units(doc, event);
        self.marquee = Some((pos, pos));
    }
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        let pos = super::units(doc, event);
        if let Some((_, end)) = &mut self.marquee {
            *end = pos;
        }
    }
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        self.pointer_move(doc, event);
        let Some((start, end)) = self.marquee.take() else {
            return false;
        };
        let rect = Rect::from_corners(start, end);
        let members = Self::points_within(doc, &rect);
        doc.selection.combine = Self::combine_for(event.modifiers);
        doc.selection
            .set((!members.is_empty()).then_some(members.as_slice()));
        log::trace!("marquee picked {}, {} selected", members.len(), doc.selection.len());
        // Selection isn't part of history.
        false
    }
    fn draw_overlay(&self, doc: &Document, surface: &mut dyn OverlaySurface) {
        if let Some((start, end)) = self.marquee {
            let rect = Rect::from_corners(start, end);
            surface.push(Gizmo::Marquee(doc.viewport.to_viewport_rect(&rect)));
        }
    }
    fn cursor_hint(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }
    fn exit(&mut self, _: &mut Document) -> bool {
        self.marquee = None;
        false
    }
}
