//! # Document
//!
//! One open canvas: its layers, selection, view, reference images, and the settings new shapes
//! are drawn with. The document owns the undo history, which snapshots everything the layer stack
//! does plus the reference images.
//!
//! Structural operations checkpoint themselves. Shape edits made by tools don't; the tool
//! controller calls [`Document::checkpoint`] once the interaction is over.

use super::history::{Restore, SnapshotHistory};
use super::image::{Arrangement, ReferenceImage};
use super::layer::Layer;
use super::layer_stack::{LayerSnapshot, LayerStack, Wash};
use super::selection::{Member, Selection};
use super::EditError;
use crate::blend::BlendMode;
use crate::color::Color;
use crate::geom::{Rect, Vec2};
use crate::shape::{Shape, ShapeID};
use crate::viewport::ViewportMapper;

/// Style applied to newly created shapes.
#[derive(Clone, PartialEq, Debug)]
pub struct DrawContext {
    pub color: Color,
    /// Used for shape fills and text backgrounds.
    pub background: Color,
    pub background_opacity: u8,
    pub fill: bool,
    /// Line and brush width, in document units.
    pub line_size: f32,
    pub text_size: f32,
}
impl Default for DrawContext {
    fn default() -> Self {
        Self {
            color: Color::RED,
            background: Color::WHITE,
            background_opacity: crate::blend::OPAQUE,
            fill: false,
            line_size: 4.0,
            text_size: 24.0,
        }
    }
}
impl DrawContext {
    /// Background color with its opacity applied.
    #[must_use]
    pub fn fill_color(&self) -> Color {
        self.background.with_alpha(self.background_opacity)
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct DocumentSnapshot {
    pub layers: LayerSnapshot,
    pub images: Vec<ReferenceImage>,
    pub arrangement: Arrangement,
}

#[derive(Clone, Debug)]
pub struct Document {
    pub viewport: ViewportMapper,
    pub selection: Selection,
    pub draw: DrawContext,
    layers: LayerStack,
    images: Vec<ReferenceImage>,
    arrangement: Arrangement,
    /// View-only mode.
    locked: bool,
    history: SnapshotHistory<DocumentSnapshot>,
}
impl Default for Document {
    fn default() -> Self {
        Self::new(super::history::DEFAULT_LIMIT)
    }
}
impl Document {
    #[must_use]
    pub fn new(undo_limit: usize) -> Self {
        Self {
            viewport: ViewportMapper::default(),
            selection: Selection::default(),
            draw: DrawContext::default(),
            // History is kept here instead.
            layers: LayerStack::with_undo_limit(0),
            images: Vec::new(),
            arrangement: Arrangement::default(),
            locked: false,
            history: SnapshotHistory::new(undo_limit),
        }
    }
    #[must_use]
    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }
    #[must_use]
    pub fn images(&self) -> &[ReferenceImage] {
        &self.images
    }
    #[must_use]
    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }
    #[must_use]
    pub fn wash(&self) -> Wash {
        self.layers.wash
    }
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
    /// May anything be changed at all?
    #[must_use]
    pub fn can_edit(&self) -> bool {
        !self.locked
    }
    fn guard(&self) -> Result<(), EditError> {
        if self.locked {
            Err(EditError::Locked)
        } else {
            Ok(())
        }
    }
    /// The current layer, if both it and the document may be edited.
    pub fn current_layer_mut(&mut self) -> Result<&mut Layer, EditError> {
        self.guard()?;
        self.layers.current_editable()
    }

    // ====== Layers ======
    pub fn add_layer(&mut self, name: Option<&str>) -> Result<usize, EditError> {
        self.guard()?;
        let index = self.layers.add(name, false);
        self.checkpoint();
        Ok(index)
    }
    pub fn delete_layer(&mut self, index: usize) -> Result<(), EditError> {
        self.guard()?;
        self.layers.delete(index)?;
        self.prune_selection();
        self.checkpoint();
        Ok(())
    }
    pub fn move_layer(&mut self, old: usize, new: usize) -> Result<(), EditError> {
        self.guard()?;
        self.layers.move_layer(old, new)?;
        self.checkpoint();
        Ok(())
    }
    pub fn duplicate_layer(&mut self) -> Result<usize, EditError> {
        self.guard()?;
        let index = self.layers.duplicate_current()?;
        self.checkpoint();
        Ok(index)
    }
    pub fn clear_layer(&mut self) -> Result<(), EditError> {
        self.guard()?;
        self.layers.clear_current()?;
        self.prune_selection();
        self.checkpoint();
        Ok(())
    }
    /// Switching layers isn't an edit, and isn't recorded.
    pub fn set_current_layer(&mut self, index: usize) -> Result<(), EditError> {
        self.layers.set_current(index)
    }
    pub fn set_solo(&mut self, solo: Option<usize>) -> Result<(), EditError> {
        self.layers.set_solo(solo)
    }
    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<(), EditError> {
        self.guard()?;
        self.layers.set_visible(index, visible)?;
        self.checkpoint();
        Ok(())
    }
    pub fn set_layer_locked(&mut self, index: usize, locked: bool) -> Result<(), EditError> {
        self.guard()?;
        self.layers.set_locked(index, locked)?;
        self.checkpoint();
        Ok(())
    }
    pub fn set_layer_opacity(&mut self, index: usize, opacity: u8) -> Result<(), EditError> {
        self.guard()?;
        self.layers.set_opacity(index, opacity)?;
        self.checkpoint();
        Ok(())
    }
    pub fn set_layer_blend(&mut self, index: usize, blend: BlendMode) -> Result<(), EditError> {
        self.guard()?;
        self.layers.set_blend_mode(index, blend)?;
        self.checkpoint();
        Ok(())
    }
    pub fn rename_layer(&mut self, index: usize, name: &str) -> Result<(), EditError> {
        self.guard()?;
        self.layers.rename(index, name)?;
        self.checkpoint();
        Ok(())
    }
    pub fn set_wash(&mut self, color: Color, opacity: u8) -> Result<(), EditError> {
        self.guard()?;
        let wash = Wash { color, opacity };
        if self.layers.wash == wash {
            return Err(EditError::NoOp);
        }
        self.layers.wash = wash;
        self.checkpoint();
        Ok(())
    }

    // ====== Shapes ======
    /// Append a shape to the current layer.
    pub fn add_shape(&mut self, shape: Shape, checkpoint: bool) -> Result<ShapeID, EditError> {
        let id = self.current_layer_mut()?.push(shape);
        if checkpoint {
            self.checkpoint();
        }
        Ok(id)
    }
    #[must_use]
    pub fn shape(&self, id: ShapeID) -> Option<&Shape> {
        self.layers.layers().iter().find_map(|layer| layer.get(id))
    }
    /// A shape, provided neither its layer nor the document are locked.
    pub fn shape_mut(&mut self, id: ShapeID) -> Result<&mut Shape, EditError> {
        self.guard()?;
        let index = self.layers.layer_of(id).ok_or(EditError::UnknownShape)?;
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(EditError::UnknownShape)?;
        if layer.locked {
            return Err(EditError::Locked);
        }
        layer.get_mut(id).ok_or(EditError::UnknownShape)
    }
    /// Remove a shape from whichever layer holds it, dropping it from the selection too.
    pub fn remove_shape(&mut self, id: ShapeID) -> Result<Shape, EditError> {
        self.guard()?;
        let index = self.layers.layer_of(id).ok_or(EditError::UnknownShape)?;
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(EditError::UnknownShape)?;
        if layer.locked {
            return Err(EditError::Locked);
        }
        let shape = layer.remove(id).ok_or(EditError::UnknownShape)?;
        self.selection.purge_shape(id);
        Ok(shape)
    }
    /// Delete every selected shape that can be deleted, and checkpoint. Returns how many went.
    pub fn remove_selected(&mut self) -> Result<usize, EditError> {
        self.guard()?;
        let removed = self
            .selection
            .shapes()
            .into_iter()
            .filter(|&id| match self.remove_shape(id) {
                Ok(_) => true,
                Err(err) => {
                    log::debug!("not deleting {id}: {err}");
                    false
                }
            })
            .count();
        if removed == 0 {
            return Err(EditError::NoOp);
        }
        self.checkpoint();
        Ok(removed)
    }
    /// Drop selection members whose shapes or points no longer exist.
    pub fn prune_selection(&mut self) {
        self.selection.retain_existing(&self.layers);
    }
    /// Every `(shape, point index)` the selection covers. Whole shapes expand to all their points.
    #[must_use]
    pub fn selected_points(&self) -> Vec<(ShapeID, usize)> {
        let mut seen = hashbrown::HashSet::new();
        let mut points = Vec::new();
        for member in self.selection.members() {
            let Some(shape) = self.shape(member.shape()) else {
                continue;
            };
            let indices = match *member {
                Member::Shape(_) => 0..shape.point_count(),
                Member::Point { index, .. } => index..index + 1,
            };
            for index in indices {
                if seen.insert((shape.id(), index)) {
                    points.push((shape.id(), index));
                }
            }
        }
        points
    }
    /// Bounding rect of everything selected, in document units.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Rect> {
        crate::geom::bounding_rect(
            self.selected_points()
                .into_iter()
                .filter_map(|(id, index)| self.shape(id)?.point(index)),
        )
    }
    /// Move every selected point by `delta`, in document units. Returns how many moved.
    pub fn translate_selection(&mut self, delta: Vec2) -> Result<usize, EditError> {
        self.map_selection(|point| point + delta)
    }
    /// Replace every selected point with `map(point)`. Points on locked layers stay put.
    ///
    /// Returns how many points were replaced, or [`EditError::Locked`] if there were some to
    /// replace but every one of them was on a locked layer.
    pub fn map_selection(&mut self, map: impl Fn(Vec2) -> Vec2) -> Result<usize, EditError> {
        self.guard()?;
        let points = self.selected_points();
        let mut moved = 0;
        for &(id, index) in &points {
            let shape = match self.shape_mut(id) {
                Ok(shape) => shape,
                Err(err) => {
                    log::trace!("skipping {id}: {err}");
                    continue;
                }
            };
            if let Some(point) = shape.point(index) {
                if shape.set_point(index, map(point)) {
                    moved += 1;
                }
            }
        }
        if moved == 0 && !points.is_empty() {
            return Err(EditError::Locked);
        }
        Ok(moved)
    }

    // ====== Reference images ======
    pub fn append_image(&mut self, image: ReferenceImage) -> Result<usize, EditError> {
        self.guard()?;
        self.images.push(image);
        self.checkpoint();
        Ok(self.images.len() - 1)
    }
    /// Crop an image, in image-local units. Not checkpointed, as it's dragged continuously.
    pub fn set_wipe(&mut self, index: usize, wipe: Rect) -> Result<(), EditError> {
        self.guard()?;
        self.images
            .get_mut(index)
            .ok_or(EditError::IndexMismatch)?
            .set_wipe(wipe);
        Ok(())
    }
    pub fn set_arrangement(&mut self, arrangement: Arrangement) -> Result<(), EditError> {
        self.guard()?;
        if self.arrangement == arrangement {
            return Err(EditError::NoOp);
        }
        self.arrangement = arrangement;
        self.checkpoint();
        Ok(())
    }
    /// Where each image is placed, in document units.
    #[must_use]
    pub fn image_layout(&self) -> Vec<Rect> {
        self.arrangement.layout(&self.images)
    }
    #[must_use]
    pub fn images_bounds(&self) -> Option<Rect> {
        self.image_layout()
            .into_iter()
            .reduce(|all, rect| all.union(&rect))
    }
    /// Fit the selection in view, or every image if nothing is selected.
    pub fn focus(&mut self) -> bool {
        match self.selection_bounds().or_else(|| self.images_bounds()) {
            Some(rect) => self.viewport.focus(&rect),
            None => false,
        }
    }

    // ====== History ======
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            layers: self.layers.snapshot(),
            images: self.images.clone(),
            arrangement: self.arrangement,
        }
    }
    fn restore(&mut self, snapshot: DocumentSnapshot) {
        let DocumentSnapshot {
            layers,
            images,
            arrangement,
        } = snapshot;
        self.layers.restore(layers);
        self.images = images;
        self.arrangement = arrangement;
        self.prune_selection();
    }
    /// Record the present state as an undo step.
    pub fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }
    pub fn undo(&mut self) -> Result<(), EditError> {
        self.guard()?;
        match self.history.undo().ok_or(EditError::NoOp)? {
            Restore::State(snapshot) => self.restore(snapshot),
            Restore::Empty => self.restore(DocumentSnapshot::default()),
        }
        Ok(())
    }
    pub fn redo(&mut self) -> Result<(), EditError> {
        self.guard()?;
        match self.history.redo().ok_or(EditError::NoOp)? {
            Restore::State(snapshot) => self.restore(snapshot),
            Restore::Empty => self.restore(DocumentSnapshot::default()),
        }
        Ok(())
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shape::{Line, ShapeData};

    fn line(from: Vec2, to: Vec2) -> Shape {
        let mut line = Line::new(from, Color::BLACK, 1.0);
        line.end = Some(to);
        Shape::new(ShapeData::Line(line))
    }

    #[test]
    fn undo_covers_images() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        doc.append_image(ReferenceImage::new("ref", 10, 10)).unwrap();
        doc.set_arrangement(Arrangement::Stacked).unwrap();
        doc.undo().unwrap();
        assert_eq!(doc.arrangement(), Arrangement::Grid);
        doc.undo().unwrap();
        assert!(doc.images().is_empty());
        assert_eq!(doc.layers().len(), 1);
        doc.undo().unwrap();
        assert!(doc.layers().is_empty());
        assert_eq!(doc.undo(), Err(EditError::NoOp));
        doc.redo().unwrap();
        doc.redo().unwrap();
        assert_eq!(doc.images().len(), 1);
    }
    #[test]
    fn locked_document_refuses_edits() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        doc.set_locked(true);
        assert!(!doc.can_edit());
        assert_eq!(doc.add_layer(None), Err(EditError::Locked));
        assert_eq!(
            doc.add_shape(line(Vec2::zero(), Vec2::one()), true),
            Err(EditError::Locked)
        );
        assert_eq!(doc.undo(), Err(EditError::Locked));
    }
    #[test]
    fn locked_layer_refuses_shapes() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        doc.set_layer_locked(0, true).unwrap();
        assert_eq!(
            doc.add_shape(line(Vec2::zero(), Vec2::one()), true),
            Err(EditError::Locked)
        );
        assert_eq!(doc.undo_depth(), 2);
    }
    #[test]
    fn removal_purges_selection() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let a = doc.add_shape(line(Vec2::zero(), Vec2::one()), false).unwrap();
        let b = doc.add_shape(line(Vec2::one(), Vec2::zero()), true).unwrap();
        doc.selection.add(&[Member::Shape(a), Member::Point { shape: b, index: 1 }]);
        assert_eq!(doc.remove_selected(), Ok(2));
        assert!(doc.selection.is_empty());
        assert!(doc.layers().current().unwrap().shapes.is_empty());
        // Undo brings the shapes back, but not the selection.
        doc.undo().unwrap();
        assert_eq!(doc.layers().current().unwrap().shapes.len(), 2);
        assert!(doc.selection.is_empty());
    }
    #[test]
    fn undo_drops_vanished_selection() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let id = doc.add_shape(line(Vec2::zero(), Vec2::one()), true).unwrap();
        doc.selection.add(&[Member::Shape(id)]);
        doc.undo().unwrap();
        assert!(doc.selection.is_empty());
        doc.redo().unwrap();
        // Same ID after redo, so it can be selected again.
        assert!(doc.shape(id).is_some());
    }
    #[test]
    fn selection_moves_and_bounds() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let id = doc
            .add_shape(line(Vec2::zero(), Vec2::new(4.0, 2.0)), true)
            .unwrap();
        doc.selection.add(&[Member::Point { shape: id, index: 1 }]);
        assert_eq!(doc.translate_selection(Vec2::new(1.0, 1.0)), Ok(1));
        let shape = doc.shape(id).unwrap();
        assert_eq!(shape.point(0), Some(Vec2::zero()));
        assert_eq!(shape.point(1), Some(Vec2::new(5.0, 3.0)));
        doc.selection.add(&[Member::Shape(id)]);
        let bounds = doc.selection_bounds().unwrap();
        assert_eq!(bounds.max, Vec2::new(5.0, 3.0));
        assert_eq!(doc.selected_points().len(), 2);
    }
    #[test]
    fn locked_layer_points_stay_put() {
        let mut doc = Document::default();
        doc.add_layer(None).unwrap();
        let id = doc
            .add_shape(line(Vec2::zero(), Vec2::new(4.0, 2.0)), true)
            .unwrap();
        doc.selection.add(&[Member::Shape(id)]);
        doc.set_layer_locked(0, true).unwrap();
        let depth = doc.undo_depth();
        assert_eq!(doc.translate_selection(Vec2::one()), Err(EditError::Locked));
        assert_eq!(doc.shape(id).unwrap().point(0), Some(Vec2::zero()));
        assert_eq!(doc.undo_depth(), depth);
        // Nothing selected is nothing to move, not an error.
        doc.selection.clear();
        assert_eq!(doc.translate_selection(Vec2::one()), Ok(0));
    }
    #[test]
    fn images_bounds_span_layout() {
        let mut doc = Document::default();
        assert!(doc.images_bounds().is_none());
        doc.append_image(ReferenceImage::new("a", 10, 10)).unwrap();
        doc.append_image(ReferenceImage::new("b", 20, 5)).unwrap();
        doc.set_arrangement(Arrangement::Horizontal).unwrap();
        let bounds = doc.images_bounds().unwrap();
        assert_eq!(bounds.max, Vec2::new(30.0, 10.0));
    }
}
