//! # Pen Tools
//!
//! Pen tools are how pointer and keyboard input turns into edits of the document and its view.
//! Drawing, erasing, selecting, moving, and placing shapes are all pen tools.
//!
//! Exactly one tool is active at a time, chosen by the UI. On top of whichever tool is active sits
//! [`navigation::Navigation`], which gets first look at every event so view gestures (space-drag,
//! middle-drag, shift+alt scrub, wheel) work the same from any tool. The one exception is a tool
//! that is capturing keys, such as a text box being typed into, which sees keys first.
//!
//! Tools edit the document live while an interaction is in progress. They report when an
//! interaction finished with something worth keeping, and the controller records an undo step.

mod brush;
mod eraser;
mod mover;
mod navigation;
mod select;
mod shapes;
mod transform;
mod wipes;

use crate::gizmos::{CursorIcon, Gizmo, OverlaySurface};
use crate::input::{KeyEvent, PointerEvent, TabletEvent, WheelEvent};
use annota_core::state::Document;
use ultraviolet::Vec2;

/// How a tool responded to a key press.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Response {
    /// Not for this tool. The controller may apply its own handling.
    Ignored,
    Handled,
    /// Handled, and an undo step should be recorded now.
    Commit,
}

trait PenTool {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent);
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent);
    /// Returns true if the interaction produced something to commit to history.
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool;
    fn key_down(&mut self, _doc: &mut Document, _event: &KeyEvent) -> Response {
        Response::Ignored
    }
    fn key_up(&mut self, _doc: &mut Document, _event: &KeyEvent) {}
    /// While true, keys reach this tool before navigation sees them.
    fn captures_keys(&self) -> bool {
        false
    }
    fn tablet_move(&mut self, _doc: &mut Document, _event: &TabletEvent) {}
    /// Visual feedback, in viewport coordinates.
    fn draw_overlay(&self, _doc: &Document, _surface: &mut dyn OverlaySurface) {}
    fn cursor_hint(&self) -> CursorIcon {
        CursorIcon::Default
    }
    /// Is an uncommitted edit in progress?
    fn is_dirty(&self) -> bool {
        false
    }
    /// Called when the controller is switching away from this tool. Drop any in-progress state,
    /// discarding what isn't valid. Returns true if what's left should be committed.
    fn exit(&mut self, doc: &mut Document) -> bool;
}

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ToolKind {
    Navigate,
    Move,
    Select,
    Draw,
    SmoothDraw,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Arrow,
    Text,
    Transform,
    Wipes,
}

/// Pointer position in document units.
fn units(doc: &Document, event: &PointerEvent) -> Vec2 {
    doc.viewport.to_units_coords(event.pos)
}

pub struct ToolState {
    active: ToolKind,
    navigation: navigation::Navigation,
    /// Most recent tablet pressure, while a pen is in range.
    pressure: Option<f32>,
    clock: crate::clock::RedrawClock,

    navigate: Box<dyn PenTool>,
    mover: Box<dyn PenTool>,
    select: Box<dyn PenTool>,
    draw: Box<dyn PenTool>,
    smooth_draw: Box<dyn PenTool>,
    eraser: Box<dyn PenTool>,
    line: Box<dyn PenTool>,
    rectangle: Box<dyn PenTool>,
    circle: Box<dyn PenTool>,
    arrow: Box<dyn PenTool>,
    text: Box<dyn PenTool>,
    transform: Box<dyn PenTool>,
    wipes: Box<dyn PenTool>,
}
impl Default for ToolState {
    fn default() -> Self {
        Self::new(&crate::settings::Settings::default())
    }
}
impl ToolState {
    #[must_use]
    pub fn new(settings: &crate::settings::Settings) -> Self {
        let tools = &settings.tools;
        let text_box = Vec2::new(tools.text_box[0], tools.text_box[1]);
        Self {
            active: ToolKind::Draw,
            navigation: navigation::Navigation::new(&settings.view),
            pressure: None,
            clock: crate::clock::RedrawClock::from_settings(&settings.clock),
            navigate: Box::new(navigation::Navigate::new()),
            mover: Box::new(mover::Mover::new(tools.hit_tolerance)),
            select: Box::new(select::Select::new()),
            draw: Box::new(brush::Brush::new(None)),
            smooth_draw: Box::new(brush::Brush::new(Some(tools.smoothing))),
            eraser: Box::new(eraser::Eraser::new(tools.eraser_multiplier)),
            line: Box::new(shapes::ShapeTool::new(shapes::Primitive::Line, text_box)),
            rectangle: Box::new(shapes::ShapeTool::new(shapes::Primitive::Rectangle, text_box)),
            circle: Box::new(shapes::ShapeTool::new(shapes::Primitive::Circle, text_box)),
            arrow: Box::new(shapes::ShapeTool::new(shapes::Primitive::Arrow, text_box)),
            text: Box::new(shapes::ShapeTool::new(shapes::Primitive::Text, text_box)),
            transform: Box::new(transform::Transform::new(tools.hit_tolerance)),
            wipes: Box::new(wipes::Wipes::new(tools.hit_tolerance)),
        }
    }
    fn tool_for(&mut self, kind: ToolKind) -> &mut dyn PenTool {
        match kind {
            ToolKind::Navigate => self.navigate.as_mut(),
            ToolKind::Move => self.mover.as_mut(),
            ToolKind::Select => self.select.as_mut(),
            ToolKind::Draw => self.draw.as_mut(),
            ToolKind::SmoothDraw => self.smooth_draw.as_mut(),
            ToolKind::Eraser => self.eraser.as_mut(),
            ToolKind::Line => self.line.as_mut(),
            ToolKind::Rectangle => self.rectangle.as_mut(),
            ToolKind::Circle => self.circle.as_mut(),
            ToolKind::Arrow => self.arrow.as_mut(),
            ToolKind::Text => self.text.as_mut(),
            ToolKind::Transform => self.transform.as_mut(),
            ToolKind::Wipes => self.wipes.as_mut(),
        }
    }
    fn active_tool(&self) -> &dyn PenTool {
        match self.active {
            ToolKind::Navigate => self.navigate.as_ref(),
            ToolKind::Move => self.mover.as_ref(),
            ToolKind::Select => self.select.as_ref(),
            ToolKind::Draw => self.draw.as_ref(),
            ToolKind::SmoothDraw => self.smooth_draw.as_ref(),
            ToolKind::Eraser => self.eraser.as_ref(),
            ToolKind::Line => self.line.as_ref(),
            ToolKind::Rectangle => self.rectangle.as_ref(),
            ToolKind::Circle => self.circle.as_ref(),
            ToolKind::Arrow => self.arrow.as_ref(),
            ToolKind::Text => self.text.as_ref(),
            ToolKind::Transform => self.transform.as_ref(),
            ToolKind::Wipes => self.wipes.as_ref(),
        }
    }
    #[must_use]
    pub fn active(&self) -> ToolKind {
        self.active
    }
    /// Is the active tool holding an uncommitted edit?
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.active_tool().is_dirty()
    }
    /// Is a pressure-sensitive pen currently in use?
    #[must_use]
    pub fn pressure_active(&self) -> bool {
        self.pressure.is_some()
    }
    /// Redraw pacing, quicker while a pen is in use.
    #[must_use]
    pub fn clock(&self) -> &crate::clock::RedrawClock {
        &self.clock
    }
    /// Collect the overlay for a redraw at `now` and restart the redraw clock.
    pub fn redraw(
        &mut self,
        doc: &Document,
        now: std::time::Instant,
    ) -> smallvec::SmallVec<[Gizmo; 4]> {
        self.clock.mark_redrawn(now);
        self.overlay(doc)
    }
    /// Switch tools. Whatever the outgoing tool was in the middle of is committed if valid,
    /// discarded otherwise.
    pub fn set_tool(&mut self, doc: &mut Document, kind: ToolKind) {
        if kind == self.active {
            return;
        }
        let outgoing = self.active;
        let tool = self.tool_for(outgoing);
        let dirty = tool.is_dirty();
        if tool.exit(doc) && dirty {
            log::debug!("flushing {} edit on tool change", outgoing.as_ref());
            doc.checkpoint();
        }
        self.navigation.exit();
        log::trace!("tool {} -> {}", outgoing.as_ref(), kind.as_ref());
        self.active = kind;
    }
    pub fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        if self.navigation.pointer_down(doc, event) {
            return;
        }
        let event = self.with_pressure(event);
        self.tool_for(self.active).pointer_down(doc, &event);
    }
    pub fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        if self.navigation.pointer_move(doc, event) {
            return;
        }
        let event = self.with_pressure(event);
        self.tool_for(self.active).pointer_move(doc, &event);
    }
    /// Returns true if an undo step was recorded.
    pub fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        if self.navigation.pointer_up(doc, event) {
            return false;
        }
        let event = self.with_pressure(event);
        let commit = self.tool_for(self.active).pointer_up(doc, &event);
        if commit {
            log::trace!("{} committed", self.active.as_ref());
            doc.checkpoint();
        }
        commit
    }
    /// Returns true if an undo step was recorded.
    pub fn key_down(&mut self, doc: &mut Document, event: &KeyEvent) -> bool {
        use crate::input::Key;
        let captured = self.active_tool().captures_keys();
        if !captured && self.navigation.key_down(event) {
            return false;
        }
        match self.tool_for(self.active).key_down(doc, event) {
            Response::Commit => {
                doc.checkpoint();
                return true;
            }
            Response::Handled => return false,
            Response::Ignored => (),
        }
        if captured && self.navigation.key_down(event) {
            return false;
        }
        match event.key {
            Key::Delete | Key::Backspace => match doc.remove_selected() {
                Ok(count) => {
                    log::debug!("deleted {count} selected shapes");
                    true
                }
                Err(err) => {
                    log::debug!("nothing deleted: {err}");
                    false
                }
            },
            Key::Escape => {
                doc.selection.clear();
                false
            }
            _ => false,
        }
    }
    pub fn key_up(&mut self, doc: &mut Document, event: &KeyEvent) {
        if self.navigation.key_up(event) {
            return;
        }
        self.tool_for(self.active).key_up(doc, event);
    }
    pub fn wheel(&mut self, doc: &mut Document, event: &WheelEvent) {
        self.navigation.wheel(doc, event);
    }
    /// Pressure samples arriving between pointer events. A pressure of zero means the pen left.
    pub fn tablet_move(&mut self, doc: &mut Document, event: &TabletEvent) {
        self.pressure = (event.pressure > 0.0).then_some(event.pressure.min(1.0));
        self.clock.set_tablet_active(self.pressure_active());
        self.tool_for(self.active).tablet_move(doc, event);
    }
    fn with_pressure(&self, event: &PointerEvent) -> PointerEvent {
        PointerEvent {
            pressure: event.pressure.or(self.pressure),
            ..*event
        }
    }
    pub fn draw_overlay(&self, doc: &Document, surface: &mut dyn OverlaySurface) {
        if self.navigation.is_active() {
            return;
        }
        self.active_tool().draw_overlay(doc, surface);
    }
    /// Overlay gizmos collected into a small vec.
    #[must_use]
    pub fn overlay(&self, doc: &Document) -> smallvec::SmallVec<[Gizmo; 4]> {
        let mut gizmos = smallvec::SmallVec::new();
        self.draw_overlay(doc, &mut gizmos);
        gizmos
    }
    #[must_use]
    pub fn cursor_hint(&self, doc: &Document) -> CursorIcon {
        if let Some(cursor) = self.navigation.cursor_hint() {
            return cursor;
        }
        if !doc.can_edit() && !matches!(self.active, ToolKind::Navigate | ToolKind::Select) {
            return CursorIcon::NotAllowed;
        }
        self.active_tool().cursor_hint()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::input::{Key, Modifiers, PointerButton};
    use annota_core::shape::{ShapeData, ShapeKind};
    use annota_core::state::selection::Member;

    fn doc_with_layer() -> Document {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        doc
    }
    fn at(x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(Vec2::new(x, y))
    }
    fn drag(tools: &mut ToolState, doc: &mut Document, path: &[(f32, f32)]) -> bool {
        let (first, rest) = path.split_first().unwrap();
        tools.pointer_down(doc, &at(first.0, first.1));
        for &(x, y) in rest {
            tools.pointer_move(doc, &at(x, y));
        }
        let last = path.last().unwrap();
        tools.pointer_up(doc, &at(last.0, last.1))
    }
    fn shapes(doc: &Document) -> &[annota_core::Shape] {
        &doc.layers().current().unwrap().shapes
    }

    #[test]
    fn draw_then_undo() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        assert!(drag(&mut tools, &mut doc, &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]));
        assert_eq!(shapes(&doc).len(), 1);
        assert_eq!(shapes(&doc)[0].stroke().map(|s| s.len()), Some(3));
        doc.undo().unwrap();
        assert!(shapes(&doc).is_empty());
    }
    #[test]
    fn click_without_drag_leaves_nothing() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        assert!(!drag(&mut tools, &mut doc, &[(5.0, 5.0), (5.5, 5.0)]));
        assert!(shapes(&doc).is_empty());
        assert_eq!(doc.undo_depth(), 1);
    }
    #[test]
    fn space_pans_instead_of_drawing() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        tools.key_down(&mut doc, &Key::Space.into());
        assert_eq!(tools.cursor_hint(&doc), CursorIcon::Grab);
        drag(&mut tools, &mut doc, &[(0.0, 0.0), (10.0, 5.0)]);
        tools.key_up(&mut doc, &Key::Space.into());
        assert!(shapes(&doc).is_empty());
        assert_eq!(doc.viewport.origin, Vec2::new(-10.0, -5.0));
    }
    #[test]
    fn middle_button_pans() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        let middle = |x, y| at(x, y).with_button(PointerButton::Middle);
        tools.pointer_down(&mut doc, &middle(0.0, 0.0));
        tools.pointer_move(&mut doc, &middle(4.0, 4.0));
        assert!(!tools.pointer_up(&mut doc, &middle(4.0, 4.0)));
        assert!(shapes(&doc).is_empty());
        assert_eq!(doc.viewport.origin, Vec2::new(-4.0, -4.0));
    }
    #[test]
    fn scrub_zoom_anchored_at_press() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        let scrub = |x, y| at(x, y).with_modifiers(Modifiers::SHIFT | Modifiers::ALT);
        let start = Vec2::new(100.0, 100.0);
        let under = doc.viewport.to_units_coords(start);
        tools.pointer_down(&mut doc, &scrub(100.0, 100.0));
        tools.pointer_move(&mut doc, &scrub(150.0, 80.0));
        tools.pointer_up(&mut doc, &scrub(150.0, 80.0));
        assert!(doc.viewport.zoom_factor() > 1.0);
        assert!((doc.viewport.to_viewport_coords(under) - start).mag() < 1e-3);
        assert!(shapes(&doc).is_empty());
    }
    #[test]
    fn wheel_zooms_at_pointer() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        let pos = Vec2::new(30.0, 70.0);
        let under = doc.viewport.to_units_coords(pos);
        tools.wheel(
            &mut doc,
            &WheelEvent {
                pos,
                delta: 2.0,
                modifiers: Modifiers::empty(),
            },
        );
        assert!((doc.viewport.zoom_factor() - 1.21).abs() < 1e-4);
        assert!((doc.viewport.to_viewport_coords(under) - pos).mag() < 1e-3);
    }
    #[test]
    fn switching_tools_flushes_valid_shape() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        tools.set_tool(&mut doc, ToolKind::Line);
        tools.pointer_down(&mut doc, &at(0.0, 0.0));
        tools.pointer_move(&mut doc, &at(10.0, 10.0));
        assert!(tools.is_dirty());
        tools.set_tool(&mut doc, ToolKind::Rectangle);
        assert_eq!(shapes(&doc).len(), 1);
        assert_eq!(doc.undo_depth(), 2);
        // The next press belongs to the new tool.
        assert!(drag(&mut tools, &mut doc, &[(0.0, 0.0), (5.0, 5.0)]));
        assert_eq!(shapes(&doc)[1].kind(), ShapeKind::Rectangle);
    }
    #[test]
    fn switching_tools_discards_invalid_shape() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        tools.set_tool(&mut doc, ToolKind::Arrow);
        tools.pointer_down(&mut doc, &at(0.0, 0.0));
        assert_eq!(shapes(&doc).len(), 1);
        tools.set_tool(&mut doc, ToolKind::Select);
        assert!(shapes(&doc).is_empty());
        assert_eq!(doc.undo_depth(), 1);
    }
    #[test]
    fn locked_document_draws_nothing() {
        let mut doc = doc_with_layer();
        doc.set_locked(true);
        let mut tools = ToolState::default();
        assert!(!drag(&mut tools, &mut doc, &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]));
        assert!(shapes(&doc).is_empty());
        assert_eq!(tools.cursor_hint(&doc), CursorIcon::NotAllowed);
    }
    #[test]
    fn delete_key_removes_selection() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        drag(&mut tools, &mut doc, &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let id = shapes(&doc)[0].id();
        doc.selection.add(&[Member::Shape(id)]);
        assert!(tools.key_down(&mut doc, &Key::Delete.into()));
        assert!(shapes(&doc).is_empty());
        // Nothing left to delete.
        assert!(!tools.key_down(&mut doc, &Key::Delete.into()));
        doc.undo().unwrap();
        assert_eq!(shapes(&doc).len(), 1);
    }
    #[test]
    fn escape_clears_selection() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        drag(&mut tools, &mut doc, &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        doc.selection.add(&[Member::Shape(shapes(&doc)[0].id())]);
        tools.key_down(&mut doc, &Key::Escape.into());
        assert!(doc.selection.is_empty());
    }
    #[test]
    fn text_placed_selected_and_typed() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        tools.set_tool(&mut doc, ToolKind::Text);
        // A click gets the default box.
        assert!(drag(&mut tools, &mut doc, &[(10.0, 10.0)]));
        let id = shapes(&doc)[0].id();
        assert!(doc.selection.contains(&Member::Shape(id)));
        for key in ['h', 'i', '!'] {
            assert!(!tools.key_down(&mut doc, &Key::Char(key).into()));
        }
        assert!(!tools.key_down(&mut doc, &Key::Backspace.into()));
        assert!(tools.key_down(&mut doc, &Key::Enter.into()));
        let ShapeData::Text(text) = &shapes(&doc)[0].data else {
            panic!("not text");
        };
        assert_eq!(text.content, "hi");
        assert_eq!(text.end, Some(Vec2::new(210.0, 60.0)));
    }
    #[test]
    fn text_being_typed_gets_space_and_delete() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        tools.set_tool(&mut doc, ToolKind::Text);
        assert!(drag(&mut tools, &mut doc, &[(10.0, 10.0)]));
        let depth = doc.undo_depth();
        let origin = doc.viewport.origin;
        assert!(!tools.key_down(&mut doc, &Key::Char('a').into()));
        assert!(!tools.key_down(&mut doc, &Key::Space.into()));
        assert_eq!(tools.cursor_hint(&doc), CursorIcon::Text);
        tools.key_up(&mut doc, &Key::Space.into());
        assert!(!tools.key_down(&mut doc, &Key::Char('b').into()));
        // No character after the end to delete, and the box stays.
        assert!(!tools.key_down(&mut doc, &Key::Delete.into()));
        assert_eq!(shapes(&doc).len(), 1);
        assert!(tools.key_down(&mut doc, &Key::Enter.into()));
        assert_eq!(doc.undo_depth(), depth + 1);
        let ShapeData::Text(text) = &shapes(&doc)[0].data else {
            panic!("not text");
        };
        assert_eq!(text.content, "a b");
        assert_eq!(doc.viewport.origin, origin);

        // Done typing: space is navigation's again, and Delete removes the selected box.
        tools.key_down(&mut doc, &Key::Space.into());
        assert_eq!(tools.cursor_hint(&doc), CursorIcon::Grab);
        tools.key_up(&mut doc, &Key::Space.into());
        assert!(tools.key_down(&mut doc, &Key::Delete.into()));
        assert!(shapes(&doc).is_empty());
        assert!(!tools.key_down(&mut doc, &Key::Char('c').into()));
        assert_eq!(doc.undo_depth(), depth + 2);
    }
    #[test]
    fn tablet_pressure_sets_width() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        tools.tablet_move(
            &mut doc,
            &TabletEvent {
                pos: Vec2::zero(),
                pressure: 0.5,
            },
        );
        assert!(tools.pressure_active());
        drag(&mut tools, &mut doc, &[(0.0, 0.0), (10.0, 0.0)]);
        let stroke = shapes(&doc)[0].stroke().unwrap();
        assert!((stroke.points()[0].width - doc.draw.line_size * 0.5).abs() < 1e-5);
    }
    #[test]
    fn pen_in_range_speeds_up_redraws() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        let idle = tools.clock().interval();
        let pen = |pressure| TabletEvent {
            pos: Vec2::zero(),
            pressure,
        };
        tools.tablet_move(&mut doc, &pen(0.3));
        assert!(tools.clock().interval() < idle);
        let now = std::time::Instant::now();
        tools.redraw(&doc, now);
        assert!(!tools.clock().is_due(now));
        // Leaving range drops back to idle pacing.
        tools.tablet_move(&mut doc, &pen(0.0));
        assert!(!tools.pressure_active());
        assert_eq!(tools.clock().interval(), idle);
    }
    #[test]
    fn overlay_shows_brush_ring() {
        let mut doc = doc_with_layer();
        let mut tools = ToolState::default();
        tools.pointer_move(&mut doc, &at(3.0, 4.0));
        let overlay = tools.overlay(&doc);
        assert!(matches!(
            overlay.as_slice(),
            [Gizmo::Ring { center, .. }] if *center == Vec2::new(3.0, 4.0)
        ));
    }
}
