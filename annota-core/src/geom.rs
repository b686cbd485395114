//! # Geometry
//!
//! Small 2D helpers shared by hit-testing, erasing, and the resize gizmo.
//! Points are [`ultraviolet::Vec2`] throughout, in whatever space the caller is working in.

pub use ultraviolet::Vec2;

/// Smallest span treated as non-degenerate when dividing by a length or an extent.
pub const EPSILON: f32 = 1e-6;

/// An axis-aligned rectangle. `min` is top-left (+X right, +Y down) when normalized.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}
impl Rect {
    /// Create a rect spanning two arbitrary corners, normalizing so that `min <= max`.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min_by_component(b),
            max: a.max_by_component(b),
        }
    }
    #[must_use]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::from_corners(origin, origin + size)
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
    /// Inclusive containment.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
    /// Grow (or shrink, if negative) on every side.
    #[must_use]
    pub fn expand(&self, by: f32) -> Self {
        Self::from_corners(self.min - Vec2::broadcast(by), self.max + Vec2::broadcast(by))
    }
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min_by_component(other.min),
            max: self.max.max_by_component(other.max),
        }
    }
    #[must_use]
    pub fn translate(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
    /// Corners, clockwise from top-left.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
    /// Is either extent too small to divide by?
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width().abs() < EPSILON || self.height().abs() < EPSILON
    }
}

/// Shortest distance from `point` to the closed segment `a..b`.
/// A zero-length segment degrades to point distance.
#[must_use]
pub fn point_segment_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let segment = b - a;
    let len_sq = segment.mag_sq();
    if len_sq < EPSILON * EPSILON {
        return (point - a).mag();
    }
    // Project point onto the line, clamped to the segment.
    let t = ((point - a).dot(segment) / len_sq).clamp(0.0, 1.0);
    (point - (a + segment * t)).mag()
}

/// Bounding rect of a set of points, or `None` if there are none.
pub fn bounding_rect(points: impl IntoIterator<Item = Vec2>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = points.next()?;
    Some(points.fold(Rect { min: first, max: first }, |rect, point| Rect {
        min: rect.min.min_by_component(point),
        max: rect.max.max_by_component(point),
    }))
}

/// Linearly map `value` from the span `in_min..in_max` onto `out_min..out_max`.
/// A collapsed input span maps everything onto `out_min`.
#[must_use]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span.abs() < EPSILON {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// Map a point from one rect onto another, each axis independently.
/// Preserves the point's relative position, so `from`'s corners land exactly on `to`'s.
#[must_use]
pub fn remap_point(point: Vec2, from: &Rect, to: &Rect) -> Vec2 {
    Vec2::new(
        remap(point.x, from.min.x, from.max.x, to.min.x, to.max.x),
        remap(point.y, from.min.y, from.max.y, to.min.y, to.max.y),
    )
}

/// Is `point` within `tolerance` of the outline of `rect`?
#[must_use]
pub fn near_rect_outline(point: Vec2, rect: &Rect, tolerance: f32) -> bool {
    let [tl, tr, br, bl] = rect.corners();
    [(tl, tr), (tr, br), (br, bl), (bl, tl)]
        .into_iter()
        .any(|(a, b)| point_segment_distance(point, a, b) <= tolerance)
}

/// Distance from `point` to the outline of the ellipse inscribed in `rect`.
/// Approximated radially, which is exact for circles and close enough for picking otherwise.
#[must_use]
pub fn ellipse_outline_distance(point: Vec2, rect: &Rect) -> f32 {
    let center = rect.center();
    let radii = rect.size() * 0.5;
    let local = point - center;
    if radii.x.abs() < EPSILON || radii.y.abs() < EPSILON {
        // Collapsed into a segment.
        let [tl, _, br, _] = rect.corners();
        return point_segment_distance(point, tl, br);
    }
    let dist = local.mag();
    if dist < EPSILON {
        return radii.x.min(radii.y);
    }
    // Radius of the ellipse in the direction of the point.
    let dir = local / dist;
    let radius = 1.0 / ((dir.x / radii.x).powi(2) + (dir.y / radii.y).powi(2)).sqrt();
    (dist - radius).abs()
}

/// Is `point` inside the ellipse inscribed in `rect`?
#[must_use]
pub fn ellipse_contains(point: Vec2, rect: &Rect) -> bool {
    let radii = rect.size() * 0.5;
    if radii.x.abs() < EPSILON || radii.y.abs() < EPSILON {
        return false;
    }
    let local = point - rect.center();
    (local.x / radii.x).powi(2) + (local.y / radii.y).powi(2) <= 1.0
}
