use crate::gizmos::{CursorIcon, Gizmo, OverlaySurface};
use crate::input::PointerEvent;
use annota_core::geom::{remap_point, Rect};
use annota_core::shape::ShapeID;
use annota_core::state::Document;
use ultraviolet::Vec2;

/// Side length of a corner handle, in viewport pixels.
const HANDLE_SIZE: f32 = 8.0;

/// Which corner of [`Rect::corners`] is held.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}
impl Corner {
    const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];
    /// `original` with this corner dragged to `to`. Crossing over the opposite corner flips the
    /// rect rather than normalizing it, so the contents mirror.
    fn drag(self, original: &Rect, to: Vec2) -> Rect {
        let mut rect = *original;
        match self {
            Self::TopLeft => rect.min = to,
            Self::BottomRight => rect.max = to,
            Self::TopRight => {
                rect.max.x = to.x;
                rect.min.y = to.y;
            }
            Self::BottomLeft => {
                rect.min.x = to.x;
                rect.max.y = to.y;
            }
        }
        rect
    }
}

struct Drag {
    corner: Corner,
    bounds: Rect,
    /// Every selected point as it was at the press.
    original: Vec<(ShapeID, usize, Vec2)>,
}

/// Resize the selection by dragging a corner of its bounding box. Every selected point is remapped
/// linearly from the old box onto the new one.
pub struct Transform {
    /// Grab distance in viewport pixels.
    tolerance: f32,
    drag: Option<Drag>,
    changed: bool,
}
impl Transform {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            drag: None,
            changed: false,
        }
    }
    /// Corner of `bounds` within reach of `pos`, both in viewport pixels.
    fn corner_at(&self, bounds: &Rect, pos: Vec2) -> Option<Corner> {
        Corner::ALL
            .into_iter()
            .zip(bounds.corners())
            .find(|(_, corner)| (*corner - pos).mag() <= self.tolerance)
            .map(|(kind, _)| kind)
    }
}
impl super::PenTool for Transform {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        if !doc.can_edit() {
            return;
        }
        let Some(bounds) = doc.selection_bounds() else {
            return;
        };
        let Some(corner) = self.corner_at(&doc.viewport.to_viewport_rect(&bounds), event.pos) else {
            return;
        };
        let original = doc
            .selected_points()
            .into_iter()
            .filter_map(|(id, index)| Some((id, index, doc.shape(id)?.point(index)?)))
            .collect();
        log::trace!("resizing from {corner:?}");
        self.drag = Some(Drag {
            corner,
            bounds,
            original,
        });
    }
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        let Some(drag) = &self.drag else {
            return;
        };
        let target = drag.corner.drag(&drag.bounds, super::units(doc, event));
        for &(id, index, point) in &drag.original {
            match doc.shape_mut(id) {
                Ok(shape) => {
                    let to = remap_point(point, &drag.bounds, &target);
                    self.changed |= shape.set_point(index, to);
                }
                Err(err) => log::trace!("not resizing {id}: {err}"),
            }
        }
    }
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        if self.drag.is_some() {
            self.pointer_move(doc, event);
        }
        self.drag = None;
        std::mem::take(&mut self.changed)
    }
    fn draw_overlay(&self, doc: &Document, surface: &mut dyn OverlaySurface) {
        let Some(bounds) = doc.selection_bounds() else {
            return;
        };
        let bounds = doc.viewport.to_viewport_rect(&bounds);
        surface.push(Gizmo::Outline(bounds));
        for center in bounds.corners() {
            surface.push(Gizmo::Handle {
                center,
                size: HANDLE_SIZE,
            });
        }
    }
    fn cursor_hint(&self) -> CursorIcon {
        match self.drag.as_ref().map(|drag| drag.corner) {
            Some(Corner::TopRight | Corner::BottomLeft) => CursorIcon::NeswResize,
            _ => CursorIcon::NwseResize,
        }
    }
    fn is_dirty(&self) -> bool {
        self.changed
    }
    fn exit(&mut self, _: &mut Document) -> bool {
        self.drag = None;
        std::mem::take(&mut self.changed)
    }
}

#[cfg(test)]
mod test {
    use super::super::PenTool;
    use super::*;
    use annota_core::color::Color;
    use annota_core::shape::{Frame, Line, Shape, ShapeData};
    use annota_core::state::selection::Member;

    fn add(doc: &mut Document, data: ShapeData) -> ShapeID {
        let id = doc.add_shape(Shape::new(data), true).unwrap();
        doc.selection.add(&[Member::Shape(id)]);
        id
    }
    fn drag(tool: &mut Transform, doc: &mut Document, from: Vec2, to: Vec2) -> bool {
        tool.pointer_down(doc, &PointerEvent::new(from));
        tool.pointer_move(doc, &PointerEvent::new(to));
        tool.pointer_up(doc, &PointerEvent::new(to))
    }

    #[test]
    fn corners_land_on_new_box() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let mut frame = Frame::new(Vec2::new(10.0, 10.0), Color::BLACK, 1.0);
        frame.end = Some(Vec2::new(20.0, 30.0));
        let rect = add(&mut doc, ShapeData::Rectangle(frame));
        let mut line = Line::new(Vec2::new(15.0, 20.0), Color::BLACK, 1.0);
        line.end = Some(Vec2::new(20.0, 10.0));
        let line = add(&mut doc, ShapeData::Line(line));

        let mut tool = Transform::new(4.0);
        // Bottom-right from (20, 30) to (40, 50): the box doubles about (10, 10).
        assert!(drag(&mut tool, &mut doc, Vec2::new(21.0, 31.0), Vec2::new(40.0, 50.0)));
        let points = |id| doc.shape(id).unwrap().points().collect::<Vec<_>>();
        assert_eq!(points(rect), [Vec2::new(10.0, 10.0), Vec2::new(40.0, 50.0)]);
        assert_eq!(points(line), [Vec2::new(25.0, 30.0), Vec2::new(40.0, 10.0)]);
        assert_eq!(doc.selection_bounds(), Some(Rect::from_corners(Vec2::new(10.0, 10.0), Vec2::new(40.0, 50.0))));
    }
    #[test]
    fn crossing_over_mirrors() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let mut line = Line::new(Vec2::zero(), Color::BLACK, 1.0);
        line.end = Some(Vec2::new(10.0, 10.0));
        let line = add(&mut doc, ShapeData::Line(line));
        let mut tool = Transform::new(4.0);
        drag(&mut tool, &mut doc, Vec2::new(10.0, 10.0), Vec2::new(-10.0, 10.0));
        let points: Vec<_> = doc.shape(line).unwrap().points().collect();
        assert_eq!(points, [Vec2::zero(), Vec2::new(-10.0, 10.0)]);
    }
    #[test]
    fn press_off_handle_does_nothing() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let mut line = Line::new(Vec2::zero(), Color::BLACK, 1.0);
        line.end = Some(Vec2::new(10.0, 10.0));
        add(&mut doc, ShapeData::Line(line));
        let mut tool = Transform::new(4.0);
        assert!(!drag(&mut tool, &mut doc, Vec2::new(5.0, 5.0), Vec2::new(50.0, 50.0)));
        assert!(!tool.is_dirty());
    }
    #[test]
    fn locked_layer_records_nothing() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let mut line = Line::new(Vec2::zero(), Color::BLACK, 1.0);
        line.end = Some(Vec2::new(10.0, 10.0));
        add(&mut doc, ShapeData::Line(line));
        doc.set_layer_locked(0, true).unwrap();
        let mut tool = Transform::new(4.0);
        assert!(!drag(&mut tool, &mut doc, Vec2::new(10.0, 10.0), Vec2::new(30.0, 30.0)));
        assert!(!tool.is_dirty());
    }
}
