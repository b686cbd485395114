use crate::gizmos::{CursorIcon, Gizmo, OverlaySurface};
use crate::input::{PointerEvent, TabletEvent};
use annota_core::shape::{Shape, ShapeData, ShapeID, Stroke, StrokePoint};
use annota_core::state::Document;
use ultraviolet::Vec2;

/// Running average over the last few raw samples.
struct Smoother {
    window: std::collections::VecDeque<StrokePoint>,
    capacity: usize,
}
impl Smoother {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: std::collections::VecDeque::with_capacity(capacity),
            capacity,
        }
    }
    fn clear(&mut self) {
        self.window.clear();
    }
    /// Add a raw sample, returning the average of the window including it.
    fn push(&mut self, point: StrokePoint) -> StrokePoint {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(point);
        let (pos, width) = self
            .window
            .iter()
            .fold((Vec2::zero(), 0.0), |(pos, width), sample| {
                (pos + sample.pos, width + sample.width)
            });
        #[allow(clippy::cast_precision_loss)]
        let count = self.window.len() as f32;
        StrokePoint::new(pos / count, width / count)
    }
}

/// Freehand drawing. With a smoother, each sample is the average of the last few.
pub struct Brush {
    smoother: Option<Smoother>,
    in_progress_stroke: Option<ShapeID>,
    /// Last accepted raw position, in document units.
    last_sample: Vec2,
    /// Hover position for the brush ring, in document units.
    cursor: Option<Vec2>,
}
impl Brush {
    pub fn new(smoothing: Option<usize>) -> Self {
        Self {
            smoother: smoothing.map(Smoother::new),
            in_progress_stroke: None,
            last_sample: Vec2::zero(),
            cursor: None,
        }
    }
    fn sample(&mut self, doc: &Document, event: &PointerEvent) -> StrokePoint {
        let pos = super::units(doc, event);
        let width = event.pressure.unwrap_or(1.0).clamp(0.0, 1.0) * doc.draw.line_size;
        let raw = StrokePoint::new(pos, width);
        match &mut self.smoother {
            Some(smoother) => smoother.push(raw),
            None => raw,
        }
    }
    /// Append a sample if the pointer has moved far enough since the last one.
    fn extend(&mut self, doc: &mut Document, event: &PointerEvent) {
        let Some(id) = self.in_progress_stroke else {
            return;
        };
        let pos = super::units(doc, event);
        if (pos - self.last_sample).mag() < doc.draw.line_size / 2.0 {
            return;
        }
        self.last_sample = pos;
        let point = self.sample(doc, event);
        match doc.shape_mut(id).map(Shape::stroke_mut) {
            Ok(Some(stroke)) => stroke.push(point),
            Ok(None) => log::warn!("brush target {id} isn't a stroke"),
            Err(err) => {
                log::debug!("stroke {id} went away: {err}");
                self.in_progress_stroke = None;
            }
        }
    }
    /// End the stroke, removing it if it never became drawable. Returns whether it was kept.
    fn finish(&mut self, doc: &mut Document) -> bool {
        let Some(id) = self.in_progress_stroke.take() else {
            return false;
        };
        if let Some(smoother) = &mut self.smoother {
            smoother.clear();
        }
        if doc.shape(id).is_some_and(Shape::is_valid) {
            true
        } else {
            if let Err(err) = doc.remove_shape(id) {
                log::debug!("couldn't discard stroke {id}: {err}");
            }
            false
        }
    }
}
impl super::PenTool for Brush {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        if !doc.can_edit() {
            return;
        }
        // Any leftover from a press we never saw released.
        self.finish(doc);
        let first = self.sample(doc, event);
        self.last_sample = super::units(doc, event);
        let mut stroke = Stroke::new(doc.draw.color);
        stroke.push(first);
        match doc.add_shape(Shape::new(ShapeData::Stroke(stroke)), false) {
            Ok(id) => self.in_progress_stroke = Some(id),
            Err(err) => log::debug!("not drawing: {err}"),
        }
    }
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        self.cursor = Some(super::units(doc, event));
        self.extend(doc, event);
    }
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        self.extend(doc, event);
        self.finish(doc)
    }
    fn tablet_move(&mut self, doc: &mut Document, event: &TabletEvent) {
        self.cursor = Some(doc.viewport.to_units_coords(event.pos));
    }
    fn draw_overlay(&self, doc: &Document, surface: &mut dyn OverlaySurface) {
        if let Some(cursor) = self.cursor {
            surface.push(Gizmo::Ring {
                center: doc.viewport.to_viewport_coords(cursor),
                radius: doc.viewport.to_viewport(doc.draw.line_size / 2.0),
            });
        }
    }
    fn cursor_hint(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }
    fn is_dirty(&self) -> bool {
        self.in_progress_stroke.is_some()
    }
    fn exit(&mut self, doc: &mut Document) -> bool {
        self.cursor = None;
        self.finish(doc)
    }
}
