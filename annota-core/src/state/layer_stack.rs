//! # Layer stack
//!
//! Layers in paint order (index 0 is the bottom), which one is being edited, and the wash tinting
//! everything. Structural edits snapshot themselves into the stack's own history.

use super::history::{Restore, SnapshotHistory};
use super::layer::Layer;
use super::EditError;
use crate::blend::BlendMode;
use crate::color::Color;
use crate::geom::Vec2;
use crate::shape::{HitPart, ShapeID};

/// A flat color laid over the whole canvas, under the layers.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Wash {
    pub color: Color,
    pub opacity: u8,
}
impl Default for Wash {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 0,
        }
    }
}

/// Everything the stack's undo restores.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct LayerSnapshot {
    pub layers: Vec<Layer>,
    pub current: Option<usize>,
    pub wash: Wash,
}

/// A hit found by [`LayerStack::find_element_at`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ElementHit {
    pub layer: usize,
    pub shape: ShapeID,
    pub part: HitPart,
}

#[derive(Clone, Debug)]
pub struct LayerStack {
    layers: Vec<Layer>,
    current: Option<usize>,
    pub wash: Wash,
    /// Render exactly this layer, if set. Not part of history.
    solo: Option<usize>,
    history: SnapshotHistory<LayerSnapshot>,
}
impl Default for LayerStack {
    fn default() -> Self {
        Self::with_undo_limit(super::history::DEFAULT_LIMIT)
    }
}
impl LayerStack {
    /// An empty stack, remembering at most `limit` undo steps. Zero disables the stack's own
    /// history, for when an owner snapshots it instead.
    #[must_use]
    pub fn with_undo_limit(limit: usize) -> Self {
        Self {
            layers: Vec::new(),
            current: None,
            wash: Wash::default(),
            solo: None,
            history: SnapshotHistory::new(limit),
        }
    }
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }
    #[must_use]
    pub fn current(&self) -> Option<&Layer> {
        self.layers.get(self.current?)
    }
    pub fn current_mut(&mut self) -> Option<&mut Layer> {
        self.layers.get_mut(self.current?)
    }
    /// The current layer, if it may be edited.
    pub fn current_editable(&mut self) -> Result<&mut Layer, EditError> {
        let layer = self.current_mut().ok_or(EditError::NoLayer)?;
        if layer.locked {
            Err(EditError::Locked)
        } else {
            Ok(layer)
        }
    }
    /// Find the layer holding a shape.
    #[must_use]
    pub fn layer_of(&self, id: ShapeID) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.index_of(id).is_some())
    }

    /// `name`, or `name (n)` for the smallest `n` not already taken.
    fn unique_name(&self, name: &str) -> String {
        let taken = |candidate: &str| self.layers.iter().any(|layer| layer.name == candidate);
        if !taken(name) {
            return name.to_owned();
        }
        (1usize..)
            .map(|n| format!("{name} ({n})"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| name.to_owned())
    }
    /// Append an empty layer on top and make it current. Returns its index.
    pub fn add(&mut self, name: Option<&str>, checkpoint: bool) -> usize {
        let name = match name {
            Some(name) => self.unique_name(name),
            None => self.unique_name(&format!("Layer {}", self.layers.len() + 1)),
        };
        self.layers.push(Layer::new(name));
        let index = self.layers.len() - 1;
        self.current = Some(index);
        if checkpoint {
            self.add_undo_state();
        }
        index
    }
    /// Delete the current layer. `index` must name it, so a stale caller can't delete
    /// the wrong one.
    pub fn delete(&mut self, index: usize) -> Result<(), EditError> {
        if self.current != Some(index) || index >= self.layers.len() {
            return Err(EditError::IndexMismatch);
        }
        self.layers.remove(index);
        self.current = if self.layers.is_empty() {
            None
        } else {
            Some(index.saturating_sub(1))
        };
        self.fix_solo();
        self.add_undo_state();
        Ok(())
    }
    /// Relocate a layer. The current layer stays current wherever it ends up.
    pub fn move_layer(&mut self, old: usize, new: usize) -> Result<(), EditError> {
        let len = self.layers.len();
        if old >= len || new >= len {
            return Err(EditError::IndexMismatch);
        }
        if old == new {
            return Err(EditError::NoOp);
        }
        let layer = self.layers.remove(old);
        self.layers.insert(new, layer);
        let follow = |idx: usize| {
            if idx == old {
                new
            } else if old < idx && idx <= new {
                idx - 1
            } else if new <= idx && idx < old {
                idx + 1
            } else {
                idx
            }
        };
        self.current = self.current.map(follow);
        self.solo = self.solo.map(follow);
        self.add_undo_state();
        Ok(())
    }
    /// Copy the current layer (shapes get new identities) just above it, and make the copy current.
    pub fn duplicate_current(&mut self) -> Result<usize, EditError> {
        let current = self.current.ok_or(EditError::NoLayer)?;
        let source = self.layers.get(current).ok_or(EditError::NoLayer)?;
        let mut copy = source.copy();
        copy.name = self.unique_name(&source.name);
        let index = current + 1;
        self.layers.insert(index, copy);
        self.current = Some(index);
        if self.solo.is_some_and(|solo| solo >= index) {
            self.solo = self.solo.map(|solo| solo + 1);
        }
        self.add_undo_state();
        Ok(index)
    }
    /// Remove every shape from the current layer.
    pub fn clear_current(&mut self) -> Result<(), EditError> {
        let layer = self.current_editable()?;
        if layer.shapes.is_empty() {
            return Err(EditError::NoOp);
        }
        layer.shapes.clear();
        self.add_undo_state();
        Ok(())
    }
    pub fn set_current(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.layers.len() {
            return Err(EditError::IndexMismatch);
        }
        self.current = Some(index);
        Ok(())
    }
    fn layer_mut(&mut self, index: usize) -> Result<&mut Layer, EditError> {
        self.layers.get_mut(index).ok_or(EditError::IndexMismatch)
    }
    pub fn set_visible(&mut self, index: usize, visible: bool) -> Result<(), EditError> {
        self.layer_mut(index)?.visible = visible;
        Ok(())
    }
    pub fn set_locked(&mut self, index: usize, locked: bool) -> Result<(), EditError> {
        self.layer_mut(index)?.locked = locked;
        Ok(())
    }
    pub fn set_opacity(&mut self, index: usize, opacity: u8) -> Result<(), EditError> {
        self.layer_mut(index)?.opacity = opacity;
        Ok(())
    }
    pub fn set_blend_mode(&mut self, index: usize, blend: BlendMode) -> Result<(), EditError> {
        self.layer_mut(index)?.blend = blend;
        Ok(())
    }
    /// Rename, unique-ified against the other layers.
    pub fn rename(&mut self, index: usize, name: &str) -> Result<(), EditError> {
        if self.layers.get(index).ok_or(EditError::IndexMismatch)?.name == name {
            return Err(EditError::NoOp);
        }
        let name = self.unique_name(name);
        self.layer_mut(index)?.name = name;
        Ok(())
    }
    #[must_use]
    pub fn solo(&self) -> Option<usize> {
        self.solo
    }
    pub fn set_solo(&mut self, solo: Option<usize>) -> Result<(), EditError> {
        if solo.is_some_and(|index| index >= self.layers.len()) {
            return Err(EditError::IndexMismatch);
        }
        self.solo = solo;
        Ok(())
    }
    fn fix_solo(&mut self) {
        if self.solo.is_some_and(|index| index >= self.layers.len()) {
            self.solo = None;
        }
    }
    /// Layers to composite, bottom to top. In solo mode that's exactly the soloed layer,
    /// regardless of its visibility.
    pub fn visible_layers(&self) -> impl Iterator<Item = (usize, &Layer)> + '_ {
        let solo = self.solo;
        self.layers
            .iter()
            .enumerate()
            .filter(move |(idx, layer)| match solo {
                Some(solo) => *idx == solo,
                None => layer.visible,
            })
    }
    /// Topmost element under `point`. Hidden layers can't be hit.
    #[must_use]
    pub fn find_element_at(&self, point: Vec2, tolerance: f32) -> Option<ElementHit> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, layer)| layer.visible)
            .find_map(|(idx, layer)| {
                let (shape, part) = layer.hit_test(point, tolerance)?;
                Some(ElementHit {
                    layer: idx,
                    shape,
                    part,
                })
            })
    }

    #[must_use]
    pub fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            layers: self.layers.clone(),
            current: self.current,
            wash: self.wash,
        }
    }
    pub fn restore(&mut self, snapshot: LayerSnapshot) {
        let LayerSnapshot {
            layers,
            current,
            wash,
        } = snapshot;
        self.layers = layers;
        self.current = current.filter(|&idx| idx < self.layers.len());
        self.wash = wash;
        self.fix_solo();
    }
    /// Record the present state as an undo step.
    pub fn add_undo_state(&mut self) {
        if self.history.limit() == 0 {
            return;
        }
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }
    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(Restore::State(snapshot)) => self.restore(snapshot),
            Some(Restore::Empty) => self.restore(LayerSnapshot::default()),
            None => return false,
        }
        true
    }
    /// Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(Restore::State(snapshot)) => self.restore(snapshot),
            Some(Restore::Empty) => self.restore(LayerSnapshot::default()),
            None => return false,
        }
        true
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shape::{Frame, Line, Shape, ShapeData};

    #[test]
    fn layer_lifecycle() {
        let mut stack = LayerStack::default();
        assert_eq!(stack.current_index(), None);
        stack.add(Some("Layer 1"), true);
        assert_eq!(stack.current_index(), Some(0));
        assert_eq!(stack.layers()[0].name, "Layer 1");
        stack.add(Some("Layer 1"), true);
        assert_eq!(stack.layers()[1].name, "Layer 1 (1)");
        assert_eq!(stack.current_index(), Some(1));

        assert_eq!(stack.delete(0), Err(EditError::IndexMismatch));
        assert_eq!(stack.len(), 2);

        assert_eq!(stack.delete(1), Ok(()));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current_index(), Some(0));

        assert_eq!(stack.delete(0), Ok(()));
        assert!(stack.is_empty());
        assert_eq!(stack.current_index(), None);
    }
    #[test]
    fn default_names_count_up() {
        let mut stack = LayerStack::default();
        stack.add(None, false);
        stack.add(None, false);
        stack.add(Some("Layer 2"), false);
        let names: Vec<_> = stack.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Layer 1", "Layer 2", "Layer 2 (1)"]);
    }
    #[test]
    fn undo_redo_inverse() {
        let mut stack = LayerStack::default();
        stack.add(Some("A"), true);
        stack.add(Some("B"), true);
        stack.duplicate_current().unwrap();
        stack.move_layer(2, 0).unwrap();
        let finished = stack.snapshot();

        for _ in 0..4 {
            assert!(stack.undo());
        }
        assert!(!stack.undo());
        assert_eq!(stack.snapshot(), LayerSnapshot::default());

        for _ in 0..4 {
            assert!(stack.redo());
        }
        assert!(!stack.redo());
        assert_eq!(stack.snapshot(), finished);
    }
    #[test]
    fn undo_past_cap_is_safe() {
        let mut stack = LayerStack::default();
        for _ in 0..60 {
            stack.add(None, true);
        }
        for _ in 0..51 {
            stack.undo();
        }
        assert!(!stack.can_undo());
        assert!(stack.current_index().map_or(true, |idx| idx < stack.len()));
        // Redo still walks back up through what was kept.
        assert!(stack.redo());
        assert_eq!(stack.len(), 11);
    }
    #[test]
    fn new_edit_clears_redo() {
        let mut stack = LayerStack::default();
        stack.add(None, true);
        stack.add(None, true);
        stack.undo();
        assert!(stack.can_redo());
        stack.add(None, true);
        assert!(!stack.can_redo());
    }
    #[test]
    fn snapshots_are_independent() {
        let mut stack = LayerStack::default();
        stack.add(None, true);
        let mut line = Line::new(Vec2::zero(), Color::BLACK, 1.0);
        line.end = Some(Vec2::one());
        stack
            .current_mut()
            .unwrap()
            .push(Shape::new(ShapeData::Line(line)));
        stack.add_undo_state();
        // Mutate live geometry, then undo + redo to get the recorded version back.
        stack.current_mut().unwrap().shapes[0].translate(Vec2::new(5.0, 5.0));
        stack.undo();
        stack.redo();
        assert_eq!(stack.current().unwrap().shapes[0].point(0), Some(Vec2::zero()));
    }
    #[test]
    fn move_keeps_current_layer() {
        let mut stack = LayerStack::default();
        for name in ["A", "B", "C"] {
            stack.add(Some(name), false);
        }
        stack.set_current(0).unwrap();
        stack.move_layer(0, 2).unwrap();
        assert_eq!(stack.current().unwrap().name, "A");
        assert_eq!(stack.current_index(), Some(2));
        stack.move_layer(1, 0).unwrap();
        assert_eq!(stack.current().unwrap().name, "A");
        assert_eq!(stack.move_layer(0, 5), Err(EditError::IndexMismatch));
    }
    #[test]
    fn duplicate_goes_above() {
        let mut stack = LayerStack::default();
        stack.add(Some("A"), false);
        stack.add(Some("B"), false);
        stack.set_current(0).unwrap();
        assert_eq!(stack.duplicate_current(), Ok(1));
        let names: Vec<_> = stack.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["A", "A (1)", "B"]);
    }
    #[test]
    fn hit_topmost_first() {
        let mut stack = LayerStack::default();
        let mut frame = Frame::new(Vec2::zero(), Color::BLACK, 1.0);
        frame.end = Some(Vec2::new(10.0, 10.0));
        let frame = frame.with_fill(Color::RED, 255);
        stack.add(None, false);
        stack
            .current_mut()
            .unwrap()
            .push(Shape::new(ShapeData::Rectangle(frame.clone())));
        stack.add(None, false);
        let top = stack
            .current_mut()
            .unwrap()
            .push(Shape::new(ShapeData::Rectangle(frame)));
        let hit = stack.find_element_at(Vec2::new(5.0, 5.0), 0.5).unwrap();
        assert_eq!((hit.layer, hit.shape), (1, top));
        stack.set_visible(1, false).unwrap();
        assert_eq!(stack.find_element_at(Vec2::new(5.0, 5.0), 0.5).map(|h| h.layer), Some(0));
        assert!(stack.find_element_at(Vec2::new(50.0, 50.0), 0.5).is_none());
    }
    #[test]
    fn solo_overrides_visibility() {
        let mut stack = LayerStack::default();
        stack.add(None, false);
        stack.add(None, false);
        stack.add(None, false);
        stack.set_visible(1, false).unwrap();
        let shown: Vec<_> = stack.visible_layers().map(|(idx, _)| idx).collect();
        assert_eq!(shown, [0, 2]);
        stack.set_solo(Some(1)).unwrap();
        let shown: Vec<_> = stack.visible_layers().map(|(idx, _)| idx).collect();
        assert_eq!(shown, [1]);
        assert_eq!(stack.set_solo(Some(3)), Err(EditError::IndexMismatch));
    }
    #[test]
    fn locked_layer_refuses_clear() {
        let mut stack = LayerStack::default();
        stack.add(None, false);
        stack.set_locked(0, true).unwrap();
        assert_eq!(stack.clear_current(), Err(EditError::Locked));
    }
}
