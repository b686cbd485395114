use crate::gizmos::{CursorIcon, Gizmo, OverlaySurface};
use crate::input::PointerEvent;
use annota_core::shape::HitPart;
use annota_core::state::selection::Member;
use annota_core::state::Document;
use ultraviolet::Vec2;

/// Click to pick an element, drag to move the selection.
///
/// Pressing inside the current selection drags all of it. Pressing elsewhere replaces the
/// selection with whatever is under the pointer, a single point if a control point was hit.
pub struct Mover {
    /// Hit distance in viewport pixels.
    tolerance: f32,
    /// Last pointer position during a drag, in document units.
    dragging: Option<Vec2>,
    moved: bool,
}
impl Mover {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            dragging: None,
            moved: false,
        }
    }
    /// Replace the selection with whatever is at `pos`. Returns false if nothing is there.
    fn pick(&self, doc: &mut Document, pos: Vec2) -> bool {
        let tolerance = doc.viewport.to_units(self.tolerance);
        let member = match doc.layers().find_element_at(pos, tolerance) {
            Some(hit) => match hit.part {
                HitPart::Point(index) => Member::Point {
                    shape: hit.shape,
                    index,
                },
                HitPart::Body => Member::Shape(hit.shape),
            },
            None => {
                doc.selection.clear();
                return false;
            }
        };
        log::trace!("picked {member:?}");
        doc.selection.clear();
        doc.selection.add(&[member]);
        true
    }
}
impl super::PenTool for Mover {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        let pos = super::units(doc, event);
        let slop = doc.viewport.to_units(self.tolerance);
        let on_selection = doc
            .selection_bounds()
            .is_some_and(|bounds| bounds.expand(slop).contains(pos));
        if on_selection || self.pick(doc, pos) {
            self.dragging = doc.can_edit().then_some(pos);
        }
    }
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        let Some(last) = self.dragging else {
            return;
        };
        let pos = super::units(doc, event);
        let delta = pos - last;
        if delta == Vec2::zero() {
            return;
        }
        match doc.translate_selection(delta) {
            Ok(count) => {
                self.dragging = Some(pos);
                self.moved |= count > 0;
            }
            Err(err) => {
                log::debug!("not moving: {err}");
                self.dragging = None;
            }
        }
    }
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        self.pointer_move(doc, event);
        self.dragging = None;
        std::mem::take(&mut self.moved)
    }
    fn draw_overlay(&self, doc: &Document, surface: &mut dyn OverlaySurface) {
        if let Some(bounds) = doc.selection_bounds() {
            surface.push(Gizmo::Outline(doc.viewport.to_viewport_rect(&bounds)));
        }
    }
    fn cursor_hint(&self) -> CursorIcon {
        CursorIcon::Move
    }
    fn is_dirty(&self) -> bool {
        self.moved
    }
    fn exit(&mut self, _: &mut Document) -> bool {
        self.dragging = None;
        std::mem::take(&mut self.moved)
    }
}

#[cfg(test)]
mod test {
    use super::super::PenTool;
    use super::*;
    use annota_core::color::Color;
    use annota_core::shape::{Line, Shape, ShapeData};

    fn doc_with_line() -> Document {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let mut line = Line::new(Vec2::zero(), Color::BLACK, 1.0);
        line.end = Some(Vec2::new(100.0, 0.0));
        doc.add_shape(Shape::new(ShapeData::Line(line)), true)
            .unwrap();
        doc
    }
    fn drag(mover: &mut Mover, doc: &mut Document, from: Vec2, to: Vec2) -> bool {
        mover.pointer_down(doc, &PointerEvent::new(from));
        mover.pointer_move(doc, &PointerEvent::new(to));
        mover.pointer_up(doc, &PointerEvent::new(to))
    }
    fn points(doc: &Document) -> Vec<Vec2> {
        doc.layers().current().unwrap().shapes[0].points().collect()
    }

    #[test]
    fn body_drag_moves_whole_shape() {
        let mut doc = doc_with_line();
        let mut mover = Mover::new(3.0);
        assert!(drag(&mut mover, &mut doc, Vec2::new(50.0, 1.0), Vec2::new(60.0, 11.0)));
        assert_eq!(points(&doc), [Vec2::new(10.0, 10.0), Vec2::new(110.0, 10.0)]);
        let id = doc.layers().current().unwrap().shapes[0].id();
        assert_eq!(doc.selection.members(), [Member::Shape(id)]);
    }
    #[test]
    fn endpoint_drag_moves_one_point() {
        let mut doc = doc_with_line();
        let mut mover = Mover::new(3.0);
        assert!(drag(&mut mover, &mut doc, Vec2::new(100.0, 0.0), Vec2::new(100.0, 20.0)));
        assert_eq!(points(&doc), [Vec2::zero(), Vec2::new(100.0, 20.0)]);
    }
    #[test]
    fn empty_click_deselects() {
        let mut doc = doc_with_line();
        let mut mover = Mover::new(3.0);
        drag(&mut mover, &mut doc, Vec2::new(50.0, 0.0), Vec2::new(50.0, 0.0));
        assert!(!doc.selection.is_empty());
        assert!(!drag(&mut mover, &mut doc, Vec2::new(50.0, 80.0), Vec2::new(60.0, 90.0)));
        assert!(doc.selection.is_empty());
        assert_eq!(points(&doc), [Vec2::zero(), Vec2::new(100.0, 0.0)]);
    }
    #[test]
    fn locked_picks_but_doesnt_move() {
        let mut doc = doc_with_line();
        doc.set_locked(true);
        let mut mover = Mover::new(3.0);
        assert!(!drag(&mut mover, &mut doc, Vec2::new(50.0, 0.0), Vec2::new(60.0, 10.0)));
        assert_eq!(doc.selection.len(), 1);
        assert_eq!(points(&doc), [Vec2::zero(), Vec2::new(100.0, 0.0)]);
    }
    #[test]
    fn locked_layer_records_nothing() {
        let mut doc = doc_with_line();
        let mut mover = Mover::new(3.0);
        // Select it first, then lock its layer.
        drag(&mut mover, &mut doc, Vec2::new(50.0, 0.0), Vec2::new(50.0, 0.0));
        doc.set_layer_locked(0, true).unwrap();
        let depth = doc.undo_depth();
        assert!(!drag(&mut mover, &mut doc, Vec2::new(50.0, 0.0), Vec2::new(60.0, 10.0)));
        assert!(!mover.is_dirty());
        assert_eq!(doc.undo_depth(), depth);
        assert_eq!(points(&doc), [Vec2::zero(), Vec2::new(100.0, 0.0)]);
    }
}
