//! # Strokes
//!
//! Freehand strokes, as an ordered run of position + width samples.

use crate::color::Color;
use crate::geom::{Rect, Vec2};

/// A single sample of a stroke. Width is the full diameter in document units.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StrokePoint {
    pub pos: Vec2,
    pub width: f32,
}
impl StrokePoint {
    #[must_use]
    pub fn new(pos: Vec2, width: f32) -> Self {
        Self { pos, width }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Stroke {
    pub color: Color,
    points: Vec<StrokePoint>,
}
impl Stroke {
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            points: Vec::new(),
        }
    }
    #[must_use]
    pub fn with_points(color: Color, points: Vec<StrokePoint>) -> Self {
        Self { color, points }
    }
    pub fn push(&mut self, point: StrokePoint) {
        self.points.push(point);
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// A stroke needs at least one segment to be drawable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 2
    }
    #[must_use]
    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &StrokePoint> + '_ {
        self.points.iter()
    }
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StrokePoint> {
        self.points.get(index)
    }
    #[must_use]
    pub fn last(&self) -> Option<&StrokePoint> {
        self.points.last()
    }
    /// Replace the sample at `index`, returning false if out of bounds.
    pub fn replace(&mut self, index: usize, point: StrokePoint) -> bool {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = point;
            true
        } else {
            false
        }
    }
    /// Move a single sample, keeping its width.
    pub fn set_position(&mut self, index: usize, pos: Vec2) -> bool {
        match self.points.get(index) {
            Some(old) => {
                let width = old.width;
                self.replace(index, StrokePoint { pos, width })
            }
            None => false,
        }
    }
    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            point.pos += delta;
        }
    }
    /// Multiply every sample's width.
    pub fn scale_widths(&mut self, factor: f32) {
        let factor = factor.max(0.0);
        for point in &mut self.points {
            point.width *= factor;
        }
    }
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        crate::geom::bounding_rect(self.points.iter().map(|point| point.pos))
    }
    /// Is `point` on the stroke body? Each segment counts with the wider of its two samples.
    #[must_use]
    pub fn hit(&self, point: Vec2, tolerance: f32) -> bool {
        match self.points.as_slice() {
            [] => false,
            [only] => (only.pos - point).mag() <= only.width / 2.0 + tolerance,
            points => points.windows(2).any(|pair| {
                let reach = pair[0].width.max(pair[1].width) / 2.0 + tolerance;
                crate::geom::point_segment_distance(point, pair[0].pos, pair[1].pos) <= reach
            }),
        }
    }
    /// Indices of every sample within `half_width` of the segment `a..b`.
    #[must_use]
    pub fn samples_near_segment(&self, a: Vec2, b: Vec2, half_width: f32) -> bitvec::vec::BitVec {
        self.points
            .iter()
            .map(|sample| crate::geom::point_segment_distance(sample.pos, a, b) <= half_width)
            .collect()
    }
    /// Given samples marked for removal, find the maximal runs of consecutive surviving samples
    /// long enough to form a stroke on their own. Runs are in original order.
    #[must_use]
    pub fn surviving_runs(
        &self,
        removed: &bitvec::slice::BitSlice,
    ) -> smallvec::SmallVec<[std::ops::Range<usize>; 2]> {
        let mut runs = smallvec::SmallVec::new();
        let mut start = None;
        for idx in 0..self.points.len() {
            // Indices past the end of the mask are kept.
            let is_removed = removed.get(idx).is_some_and(|bit| *bit);
            match (start, is_removed) {
                (None, false) => start = Some(idx),
                (Some(run_start), true) => {
                    runs.push(run_start..idx);
                    start = None;
                }
                _ => (),
            }
        }
        if let Some(run_start) = start {
            runs.push(run_start..self.points.len());
        }
        // A single survivor can't be drawn.
        runs.retain(|run: &mut std::ops::Range<usize>| run.len() >= 2);
        runs
    }
    /// A new stroke from a sub-range of this one's samples.
    #[must_use]
    pub fn slice(&self, range: std::ops::Range<usize>) -> Self {
        Self {
            color: self.color,
            points: self.points.get(range).map(<[_]>::to_vec).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bitvec::prelude::*;

    fn straight(len: usize) -> Stroke {
        Stroke::with_points(
            Color::BLACK,
            (0..len)
                .map(|i| StrokePoint::new(Vec2::new(i as f32, 0.0), 1.0))
                .collect(),
        )
    }
    #[test]
    fn validity() {
        let mut stroke = Stroke::new(Color::BLACK);
        assert!(!stroke.is_valid());
        stroke.push(StrokePoint::new(Vec2::zero(), 1.0));
        assert!(!stroke.is_valid());
        stroke.push(StrokePoint::new(Vec2::one(), 1.0));
        assert!(stroke.is_valid());
    }
    #[test]
    fn runs_around_middle() {
        let stroke = straight(10);
        let mut removed = bitvec![0; 10];
        removed.set(5, true);
        let runs = stroke.surviving_runs(&removed);
        assert_eq!(runs.as_slice(), &[0..5, 6..10]);
    }
    #[test]
    fn runs_drop_singletons() {
        let stroke = straight(5);
        // Keep 0, 2..4 -> the lone 0 is dropped.
        let removed = bitvec![0, 1, 0, 0, 0];
        assert_eq!(stroke.surviving_runs(&removed).as_slice(), &[2..5]);
        // Everything isolated.
        let removed = bitvec![0, 1, 0, 1, 0];
        assert!(stroke.surviving_runs(&removed).is_empty());
    }
    #[test]
    fn scale_and_replace() {
        let mut stroke = straight(3);
        stroke.scale_widths(2.0);
        assert!(stroke.iter().all(|p| (p.width - 2.0).abs() < f32::EPSILON));
        assert!(stroke.replace(1, StrokePoint::new(Vec2::new(1.0, 5.0), 4.0)));
        assert!(!stroke.replace(3, StrokePoint::new(Vec2::zero(), 1.0)));
        assert_eq!(stroke.get(1).map(|p| p.pos.y), Some(5.0));
    }
    #[test]
    fn body_hit() {
        let stroke = straight(4);
        assert!(stroke.hit(Vec2::new(1.5, 0.4), 0.0));
        assert!(!stroke.hit(Vec2::new(1.5, 2.0), 0.5));
    }
}
