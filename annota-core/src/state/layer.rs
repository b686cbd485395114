use crate::blend::BlendMode;
use crate::geom::Vec2;
use crate::shape::{HitPart, Shape, ShapeID};

/// An ordered collection of shapes, painted first to last, plus how the layer as a whole
/// composites onto the ones beneath it.
#[derive(Clone, PartialEq, Debug)]
pub struct Layer {
    pub name: String,
    pub shapes: Vec<Shape>,
    pub locked: bool,
    pub visible: bool,
    pub opacity: u8,
    pub blend: BlendMode,
}
impl Layer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shapes: Vec::new(),
            locked: false,
            visible: true,
            opacity: crate::blend::OPAQUE,
            blend: BlendMode::default(),
        }
    }
    /// Deep copy with a fresh ID for every shape.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            shapes: self.shapes.iter().map(Shape::copy).collect(),
            ..self.clone()
        }
    }
    #[must_use]
    pub fn opacity_f32(&self) -> f32 {
        crate::blend::opacity_to_f32(self.opacity)
    }
    pub fn push(&mut self, shape: Shape) -> ShapeID {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }
    #[must_use]
    pub fn index_of(&self, id: ShapeID) -> Option<usize> {
        self.shapes.iter().position(|shape| shape.id() == id)
    }
    #[must_use]
    pub fn get(&self, id: ShapeID) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }
    pub fn get_mut(&mut self, id: ShapeID) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id() == id)
    }
    pub fn remove(&mut self, id: ShapeID) -> Option<Shape> {
        let idx = self.index_of(id)?;
        Some(self.shapes.remove(idx))
    }
    /// Topmost shape under `point`, and which part of it.
    #[must_use]
    pub fn hit_test(&self, point: Vec2, tolerance: f32) -> Option<(ShapeID, HitPart)> {
        self.shapes
            .iter()
            .rev()
            .find_map(|shape| Some((shape.id(), shape.hit_test(point, tolerance)?)))
    }
    /// Erase the marked samples from the stroke at `index`, splitting whatever survives.
    ///
    /// The first surviving run stays in place under the original ID. Further runs are inserted
    /// directly after it, in original point order, as new shapes. If nothing survives, the
    /// stroke is removed.
    pub fn erase_from_stroke(
        &mut self,
        index: usize,
        removed: &bitvec::slice::BitSlice,
    ) -> EraseOutcome {
        let Some(stroke) = self.shapes.get(index).and_then(Shape::stroke) else {
            return EraseOutcome::Unchanged;
        };
        if removed.not_any() {
            return EraseOutcome::Unchanged;
        }
        let runs = stroke.surviving_runs(removed);
        let mut pieces = runs.iter().map(|run| stroke.slice(run.clone()));
        let Some(first) = pieces.next() else {
            self.shapes.remove(index);
            return EraseOutcome::Deleted;
        };
        let rest: smallvec::SmallVec<[Shape; 2]> = pieces
            .map(|piece| Shape::new(crate::shape::ShapeData::Stroke(piece)))
            .collect();
        if let Some(original) = self.shapes.get_mut(index).and_then(Shape::stroke_mut) {
            *original = first;
        }
        let added = rest.len();
        // Inserting each right after the original, last first, leaves them in point order.
        for piece in rest.into_iter().rev() {
            self.shapes.insert(index + 1, piece);
        }
        EraseOutcome::Split(added)
    }
}

/// What erasing did to a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EraseOutcome {
    /// Nothing was marked, or the target wasn't a stroke.
    Unchanged,
    /// No run long enough survived.
    Deleted,
    /// The stroke was trimmed in place, with this many additional strokes split off after it.
    Split(usize),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Color;
    use crate::shape::{ShapeData, Stroke, StrokePoint};
    use bitvec::prelude::*;

    fn layer_with_stroke(len: usize) -> (Layer, ShapeID) {
        let stroke = Stroke::with_points(
            Color::RED,
            (0..len)
                .map(|i| StrokePoint::new(Vec2::new(i as f32, 0.0), 1.0))
                .collect(),
        );
        let mut layer = Layer::new("Layer");
        let id = layer.push(Shape::new(ShapeData::Stroke(stroke)));
        (layer, id)
    }
    fn lengths(layer: &Layer) -> Vec<usize> {
        layer
            .shapes
            .iter()
            .filter_map(|shape| shape.stroke().map(Stroke::len))
            .collect()
    }

    #[test]
    fn erase_middle_splits_in_two() {
        let (mut layer, id) = layer_with_stroke(10);
        let mut removed = bitvec![0; 10];
        removed.set(5, true);
        assert_eq!(layer.erase_from_stroke(0, &removed), EraseOutcome::Split(1));
        assert_eq!(lengths(&layer), [5, 4]);
        // Original keeps its identity, the tail is new.
        assert_eq!(layer.shapes[0].id(), id);
        assert_ne!(layer.shapes[1].id(), id);
        assert_eq!(layer.shapes[1].point(0), Some(Vec2::new(6.0, 0.0)));
        assert_eq!(layer.shapes[1].stroke().map(|s| s.color), Some(Color::RED));
    }
    #[test]
    fn erase_endpoint_trims() {
        for end in [0, 9] {
            let (mut layer, _) = layer_with_stroke(10);
            let mut removed = bitvec![0; 10];
            removed.set(end, true);
            assert_eq!(layer.erase_from_stroke(0, &removed), EraseOutcome::Split(0));
            assert_eq!(lengths(&layer), [9]);
        }
    }
    #[test]
    fn erase_alternate_leaves_nothing_short() {
        let (mut layer, _) = layer_with_stroke(10);
        let removed: BitVec = (0..10).map(|i| i % 2 == 1).collect();
        assert_eq!(layer.erase_from_stroke(0, &removed), EraseOutcome::Deleted);
        assert!(layer.shapes.is_empty());
    }
    #[test]
    fn erase_every_third_keeps_the_rest_in_order() {
        let (mut layer, _) = layer_with_stroke(11);
        let removed: BitVec = (0..11).map(|i| i % 3 == 2).collect();
        layer.erase_from_stroke(0, &removed);
        assert!(lengths(&layer).iter().all(|&len| len >= 2));
        let survivors: Vec<f32> = layer
            .shapes
            .iter()
            .flat_map(|shape| shape.points().map(|p| p.x).collect::<Vec<_>>())
            .collect();
        let expected: Vec<f32> = (0..11)
            .filter(|i| i % 3 != 2)
            .map(|i| i as f32)
            .collect();
        assert_eq!(survivors, expected);
    }
    #[test]
    fn erase_is_idempotent() {
        let (mut layer, _) = layer_with_stroke(10);
        let mut removed = bitvec![0; 10];
        removed.set(5, true);
        layer.erase_from_stroke(0, &removed);
        let once = lengths(&layer);
        // Same sample positions erased again hit nothing that remains.
        let again = layer.shapes[0]
            .stroke()
            .unwrap()
            .samples_near_segment(Vec2::new(5.0, 0.0), Vec2::new(5.0, 0.0), 0.1);
        assert_eq!(layer.erase_from_stroke(0, &again), EraseOutcome::Unchanged);
        assert_eq!(lengths(&layer), once);
    }
    #[test]
    fn copy_renews_ids() {
        let (layer, id) = layer_with_stroke(3);
        let copy = layer.copy();
        assert_eq!(copy.shapes.len(), 1);
        assert_ne!(copy.shapes[0].id(), id);
        assert_eq!(copy.shapes[0].data, layer.shapes[0].data);
    }
}
