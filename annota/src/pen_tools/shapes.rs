use crate::gizmos::{CursorIcon, Gizmo, OverlaySurface};
use super::Response;
use crate::input::{Key, KeyEvent, PointerEvent};
use annota_core::shape::{Arrow, Frame, Line, Shape, ShapeData, ShapeID, Text};
use annota_core::state::selection::Member;
use annota_core::state::Document;
use ultraviolet::Vec2;

/// Which shape a [`ShapeTool`] places.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Primitive {
    Line,
    Rectangle,
    Circle,
    Arrow,
    Text,
}
impl Primitive {
    /// A fresh, still invalid shape anchored at `start`, styled from the draw context.
    fn instantiate(self, doc: &Document, start: Vec2) -> ShapeData {
        let draw = &doc.draw;
        let frame = || {
            let frame = Frame::new(start, draw.color, draw.line_size);
            if draw.fill {
                frame.with_fill(draw.background, draw.background_opacity)
            } else {
                frame
            }
        };
        match self {
            Self::Line => ShapeData::Line(Line::new(start, draw.color, draw.line_size)),
            Self::Arrow => ShapeData::Arrow(Arrow::new(start, draw.color, draw.line_size)),
            Self::Rectangle => ShapeData::Rectangle(frame()),
            Self::Circle => ShapeData::Circle(frame()),
            Self::Text => {
                let mut text = Text::new(start, draw.color, draw.text_size);
                text.fill = draw.fill.then(|| draw.fill_color());
                ShapeData::Text(text)
            }
        }
    }
}

/// Drag out lines, arrows, rectangles, circles, and text boxes. Text boxes are selected once
/// placed and then take typed characters until Enter or Escape.
pub struct ShapeTool {
    primitive: Primitive,
    /// Box for text placed by a click.
    text_box: Vec2,
    in_progress: Option<ShapeID>,
    /// Text box receiving keystrokes.
    editing: Option<ShapeID>,
    typed: bool,
}
impl ShapeTool {
    pub fn new(primitive: Primitive, text_box: Vec2) -> Self {
        Self {
            primitive,
            text_box,
            in_progress: None,
            editing: None,
            typed: false,
        }
    }
    /// Finish the in-progress shape, removing it if invalid. Returns whether it was kept.
    fn finish(&mut self, doc: &mut Document) -> bool {
        let Some(id) = self.in_progress.take() else {
            return false;
        };
        if self.primitive == Primitive::Text && doc.shape(id).is_some_and(|shape| !shape.is_valid())
        {
            // Clicked rather than dragged, give it the default box.
            if let Ok(shape) = doc.shape_mut(id) {
                if let Some(start) = shape.point(0) {
                    shape.handle(start + self.text_box);
                }
            }
        }
        if doc.shape(id).is_some_and(Shape::is_valid) {
            return true;
        }
        if let Err(err) = doc.remove_shape(id) {
            log::debug!("couldn't discard {id}: {err}");
        }
        false
    }
    /// Stop taking keystrokes. Returns whether any were typed.
    fn stop_editing(&mut self) -> bool {
        self.editing = None;
        std::mem::take(&mut self.typed)
    }
    fn type_into(&mut self, doc: &mut Document, event: &KeyEvent) -> Response {
        let Some(id) = self.editing else {
            return Response::Ignored;
        };
        if doc.shape(id).is_none() {
            // Removed out from under us, which recorded its own step.
            self.stop_editing();
            return Response::Ignored;
        }
        // Only while it's still the thing selected. Losing the selection ends the edit.
        if !doc.selection.contains(&Member::Shape(id)) {
            return if self.stop_editing() {
                Response::Commit
            } else {
                Response::Ignored
            };
        }
        match event.key {
            Key::Enter | Key::Escape => {
                if self.stop_editing() {
                    Response::Commit
                } else {
                    Response::Ignored
                }
            }
            Key::Char(c) if !c.is_control() => self.edit_text(doc, id, |text| {
                text.content.push(c);
                true
            }),
            Key::Space => self.edit_text(doc, id, |text| {
                text.push_str(" ");
                true
            }),
            Key::Backspace => self.edit_text(doc, id, Text::pop_grapheme),
            // Typing always happens at the end, so there's nothing after the caret.
            Key::Delete => Response::Handled,
            _ => Response::Ignored,
        }
    }
    fn edit_text(
        &mut self,
        doc: &mut Document,
        id: ShapeID,
        edit: impl FnOnce(&mut Text) -> bool,
    ) -> Response {
        match doc.shape_mut(id).map(Shape::text_mut) {
            Ok(Some(text)) => {
                self.typed |= edit(text);
                Response::Handled
            }
            Ok(None) => Response::Ignored,
            Err(err) => {
                log::debug!("can't type into {id}: {err}");
                self.stop_editing();
                Response::Ignored
            }
        }
    }
}

impl super::PenTool for ShapeTool {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        if !doc.can_edit() {
            return;
        }
        if self.stop_editing() {
            // Clicking away finishes the text. Record it before starting anew.
            doc.checkpoint();
        }
        self.finish(doc);
        let start = super::units(doc, event);
        let shape = Shape::new(self.primitive.instantiate(doc, start));
        match doc.add_shape(shape, false) {
            Ok(id) => self.in_progress = Some(id),
            Err(err) => log::debug!("not placing {:?}: {err}", self.primitive),
        }
    }
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        let Some(id) = self.in_progress else {
            return;
        };
        let pos = super::units(doc, event);
        match doc.shape_mut(id) {
            Ok(shape) => shape.handle(pos),
            Err(err) => {
                log::debug!("lost {id}: {err}");
                self.in_progress = None;
            }
        }
    }
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        let Some(id) = self.in_progress else {
            return false;
        };
        // A click without a drag leaves the end unset.
        let start = doc.shape(id).and_then(|shape| shape.point(0));
        if start != Some(super::units(doc, event)) {
            self.pointer_move(doc, event);
        }
        let kept = self.finish(doc);
        if kept && self.primitive == Primitive::Text {
            doc.selection.clear();
            doc.selection.add(&[Member::Shape(id)]);
            self.editing = Some(id);
        }
        kept
    }
    fn key_down(&mut self, doc: &mut Document, event: &KeyEvent) -> Response {
        if self.primitive == Primitive::Text {
            self.type_into(doc, event)
        } else {
            Response::Ignored
        }
    }
    fn captures_keys(&self) -> bool {
        self.editing.is_some()
    }
    fn draw_overlay(&self, doc: &Document, surface: &mut dyn OverlaySurface) {
        let bounds = self
            .in_progress
            .or(self.editing)
            .and_then(|id| doc.shape(id)?.bounds());
        if let Some(bounds) = bounds {
            surface.push(Gizmo::Outline(doc.viewport.to_viewport_rect(&bounds)));
        }
    }
    fn cursor_hint(&self) -> CursorIcon {
        if self.primitive == Primitive::Text {
            CursorIcon::Text
        } else {
            CursorIcon::Crosshair
        }
    }
    fn is_dirty(&self) -> bool {
        self.in_progress.is_some() || self.typed
    }
    fn exit(&mut self, doc: &mut Document) -> bool {
        let typed = self.stop_editing();
        self.finish(doc) || typed
    }
}
