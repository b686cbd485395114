use crate::gizmos::{CursorIcon, Gizmo, OverlaySurface};
use crate::input::PointerEvent;
use annota_core::state::layer::EraseOutcome;
use annota_core::state::Document;
use ultraviolet::Vec2;

/// Erases stroke samples swept by the pointer, splitting strokes around the gaps.
pub struct Eraser {
    multiplier: f32,
    /// Previous pointer sample while erasing, in document units.
    last: Option<Vec2>,
    cursor: Option<Vec2>,
    changed: bool,
}
impl Eraser {
    pub fn new(multiplier: f32) -> Self {
        Self {
            multiplier,
            last: None,
            cursor: None,
            changed: false,
        }
    }
    fn half_width(&self, doc: &Document) -> f32 {
        doc.draw.line_size * self.multiplier
    }
    /// Erase along the segment from the last sample to `to`.
    fn sweep(&mut self, doc: &mut Document, to: Vec2) {
        let Some(from) = self.last.replace(to) else {
            return;
        };
        let half_width = self.half_width(doc);
        let layer = match doc.current_layer_mut() {
            Ok(layer) => layer,
            Err(err) => {
                log::debug!("not erasing: {err}");
                return;
            }
        };
        let mut touched = false;
        // Back to front, so splits inserted after `idx` don't shift what's left to visit.
        for idx in (0..layer.shapes.len()).rev() {
            let Some(stroke) = layer.shapes[idx].stroke() else {
                continue;
            };
            let marks = stroke.samples_near_segment(from, to, half_width);
            if marks.not_any() {
                continue;
            }
            let outcome = layer.erase_from_stroke(idx, &marks);
            log::trace!("erased from stroke {idx}: {outcome:?}");
            touched |= outcome != EraseOutcome::Unchanged;
        }
        if touched {
            self.changed = true;
            doc.prune_selection();
        }
    }
}
impl super::PenTool for Eraser {
    fn pointer_down(&mut self, doc: &mut Document, event: &PointerEvent) {
        if !doc.can_edit() {
            return;
        }
        let pos = super::units(doc, event);
        self.last = Some(pos);
        self.sweep(doc, pos);
    }
    fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) {
        let pos = super::units(doc, event);
        self.cursor = Some(pos);
        if self.last.is_some() {
            self.sweep(doc, pos);
        }
    }
    fn pointer_up(&mut self, doc: &mut Document, event: &PointerEvent) -> bool {
        if self.last.is_some() {
            self.sweep(doc, super::units(doc, event));
        }
        self.last = None;
        std::mem::take(&mut self.changed)
    }
    fn draw_overlay(&self, doc: &Document, surface: &mut dyn OverlaySurface) {
        if let Some(cursor) = self.cursor {
            surface.push(Gizmo::Ring {
                center: doc.viewport.to_viewport_coords(cursor),
                radius: doc.viewport.to_viewport(self.half_width(doc)),
            });
        }
    }
    fn cursor_hint(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }
    fn is_dirty(&self) -> bool {
        self.changed
    }
    fn exit(&mut self, _: &mut Document) -> bool {
        self.last = None;
        self.cursor = None;
        std::mem::take(&mut self.changed)
    }
}
