//! # Shapes
//!
//! Everything a layer can hold. Shapes are a closed set, so consumers (renderers, hit testing,
//! transforms) match on [`ShapeData`] exhaustively instead of asking a shape what it is.
//!
//! Every shape also carries a [`ShapeID`]. Cloning a shape keeps its ID (that's what a snapshot
//! does), while [`Shape::copy`] makes a new, independent shape with a fresh one.

pub mod primitive;
pub mod stroke;

pub use primitive::{Alignment, Arrow, Bitmap, Frame, Line, Text};
pub use stroke::{Stroke, StrokePoint};

use crate::color::Color;
use crate::geom::{Rect, Vec2};

pub type ShapeID = crate::id::StableID<Shape>;

#[derive(Clone, PartialEq, Debug, strum::EnumDiscriminants)]
#[strum_discriminants(
    name(ShapeKind),
    derive(Hash, strum::AsRefStr, strum::EnumIter)
)]
pub enum ShapeData {
    Stroke(Stroke),
    Line(Line),
    Arrow(Arrow),
    Rectangle(Frame),
    Circle(Frame),
    Text(Text),
    Bitmap(Bitmap),
}

/// What part of a shape a hit test landed on.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HitPart {
    /// One of the shape's control points, by index.
    Point(usize),
    /// Anywhere else on the shape.
    Body,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Shape {
    id: ShapeID,
    pub data: ShapeData,
}
impl From<ShapeData> for Shape {
    fn from(data: ShapeData) -> Self {
        Self::new(data)
    }
}
impl Shape {
    #[must_use]
    pub fn new(data: ShapeData) -> Self {
        Self {
            id: ShapeID::default(),
            data,
        }
    }
    #[must_use]
    pub fn id(&self) -> ShapeID {
        self.id
    }
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        ShapeKind::from(&self.data)
    }
    /// Deep copy as a brand new shape, with its own ID.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self::new(self.data.clone())
    }
    #[must_use]
    pub fn stroke(&self) -> Option<&Stroke> {
        match &self.data {
            ShapeData::Stroke(stroke) => Some(stroke),
            _ => None,
        }
    }
    pub fn stroke_mut(&mut self) -> Option<&mut Stroke> {
        match &mut self.data {
            ShapeData::Stroke(stroke) => Some(stroke),
            _ => None,
        }
    }
    #[must_use]
    pub fn text(&self) -> Option<&Text> {
        match &self.data {
            ShapeData::Text(text) => Some(text),
            _ => None,
        }
    }
    pub fn text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.data {
            ShapeData::Text(text) => Some(text),
            _ => None,
        }
    }
    /// Set the free end while the shape is being dragged out.
    /// Strokes grow a new sample instead, at the width of the last one.
    pub fn handle(&mut self, point: Vec2) {
        match &mut self.data {
            ShapeData::Stroke(stroke) => {
                let width = stroke.last().map_or(1.0, |last| last.width);
                stroke.push(StrokePoint::new(point, width));
            }
            ShapeData::Line(Line { end, .. })
            | ShapeData::Arrow(Arrow { end, .. })
            | ShapeData::Rectangle(Frame { end, .. })
            | ShapeData::Circle(Frame { end, .. })
            | ShapeData::Text(Text { end, .. }) => *end = Some(point),
            ShapeData::Bitmap(bitmap) => bitmap.rect.max = point,
        }
    }
    /// Does the shape have enough geometry to keep?
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match &self.data {
            ShapeData::Stroke(stroke) => stroke.is_valid(),
            ShapeData::Line(Line { end, .. })
            | ShapeData::Arrow(Arrow { end, .. })
            | ShapeData::Rectangle(Frame { end, .. })
            | ShapeData::Circle(Frame { end, .. })
            | ShapeData::Text(Text { end, .. }) => end.is_some(),
            ShapeData::Bitmap(bitmap) => !bitmap.rect.is_degenerate(),
        }
    }
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match &self.data {
            ShapeData::Stroke(Stroke { color, .. })
            | ShapeData::Line(Line { color, .. })
            | ShapeData::Arrow(Arrow { color, .. })
            | ShapeData::Rectangle(Frame { color, .. })
            | ShapeData::Circle(Frame { color, .. })
            | ShapeData::Text(Text { color, .. }) => Some(*color),
            ShapeData::Bitmap(_) => None,
        }
    }
    /// Number of addressable control points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        match &self.data {
            ShapeData::Stroke(stroke) => stroke.len(),
            ShapeData::Line(Line { end, .. })
            | ShapeData::Arrow(Arrow { end, .. })
            | ShapeData::Rectangle(Frame { end, .. })
            | ShapeData::Circle(Frame { end, .. })
            | ShapeData::Text(Text { end, .. }) => 1 + usize::from(end.is_some()),
            ShapeData::Bitmap(_) => 2,
        }
    }
    /// Control point by index: stroke samples in order, otherwise `[start, end]`
    /// (`[min, max]` for bitmaps).
    #[must_use]
    pub fn point(&self, index: usize) -> Option<Vec2> {
        match &self.data {
            ShapeData::Stroke(stroke) => stroke.get(index).map(|point| point.pos),
            ShapeData::Line(Line { start, end, .. })
            | ShapeData::Arrow(Arrow { start, end, .. })
            | ShapeData::Rectangle(Frame { start, end, .. })
            | ShapeData::Circle(Frame { start, end, .. })
            | ShapeData::Text(Text { start, end, .. }) => match index {
                0 => Some(*start),
                1 => *end,
                _ => None,
            },
            ShapeData::Bitmap(bitmap) => match index {
                0 => Some(bitmap.rect.min),
                1 => Some(bitmap.rect.max),
                _ => None,
            },
        }
    }
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.point_count()).filter_map(|index| self.point(index))
    }
    /// Move a single control point. Returns false if there's no such point.
    pub fn set_point(&mut self, index: usize, pos: Vec2) -> bool {
        match &mut self.data {
            ShapeData::Stroke(stroke) => stroke.set_position(index, pos),
            ShapeData::Line(Line { start, end, .. })
            | ShapeData::Arrow(Arrow { start, end, .. })
            | ShapeData::Rectangle(Frame { start, end, .. })
            | ShapeData::Circle(Frame { start, end, .. })
            | ShapeData::Text(Text { start, end, .. }) => match (index, end) {
                (0, _) => {
                    *start = pos;
                    true
                }
                (1, Some(end)) => {
                    *end = pos;
                    true
                }
                _ => false,
            },
            ShapeData::Bitmap(bitmap) => match index {
                0 => {
                    bitmap.rect.min = pos;
                    true
                }
                1 => {
                    bitmap.rect.max = pos;
                    true
                }
                _ => false,
            },
        }
    }
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.data {
            ShapeData::Stroke(stroke) => stroke.translate(delta),
            ShapeData::Line(Line { start, end, .. })
            | ShapeData::Arrow(Arrow { start, end, .. })
            | ShapeData::Rectangle(Frame { start, end, .. })
            | ShapeData::Circle(Frame { start, end, .. })
            | ShapeData::Text(Text { start, end, .. }) => {
                *start += delta;
                if let Some(end) = end {
                    *end += delta;
                }
            }
            ShapeData::Bitmap(bitmap) => bitmap.rect = bitmap.rect.translate(delta),
        }
    }
    /// Bounding rect of the control points.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        crate::geom::bounding_rect(self.points())
    }
    /// Test `point` against this shape, with `tolerance` of slop in document units.
    ///
    /// Control points win over the body, so arrows and lines can be grabbed by their ends.
    #[must_use]
    pub fn hit_test(&self, point: Vec2, tolerance: f32) -> Option<HitPart> {
        let near = |target: Vec2| (target - point).mag() <= tolerance;
        match &self.data {
            ShapeData::Stroke(stroke) => stroke.hit(point, tolerance).then_some(HitPart::Body),
            ShapeData::Line(Line {
                start, end, width, ..
            })
            | ShapeData::Arrow(Arrow {
                start, end, width, ..
            }) => {
                let end = (*end)?;
                if near(*start) {
                    Some(HitPart::Point(0))
                } else if near(end) {
                    Some(HitPart::Point(1))
                } else {
                    let reach = width / 2.0 + tolerance;
                    (crate::geom::point_segment_distance(point, *start, end) <= reach)
                        .then_some(HitPart::Body)
                }
            }
            ShapeData::Rectangle(frame) | ShapeData::Circle(frame) => {
                let rect = frame.rect()?;
                let reach = frame.width / 2.0 + tolerance;
                // Both are dragged out by their bounding box, so both grab by its corners.
                let body = if matches!(self.data, ShapeData::Circle(_)) {
                    crate::geom::ellipse_outline_distance(point, &rect) <= reach
                        || (frame.fill && crate::geom::ellipse_contains(point, &rect))
                } else {
                    crate::geom::near_rect_outline(point, &rect, reach)
                        || (frame.fill && rect.contains(point))
                };
                if near(frame.start) {
                    Some(HitPart::Point(0))
                } else if frame.end.is_some_and(near) {
                    Some(HitPart::Point(1))
                } else {
                    body.then_some(HitPart::Body)
                }
            }
            ShapeData::Text(text) => text
                .rect()?
                .expand(tolerance)
                .contains(point)
                .then_some(HitPart::Body),
            ShapeData::Bitmap(bitmap) => {
                Rect::from_corners(bitmap.rect.min, bitmap.rect.max)
                    .contains(point)
                    .then_some(HitPart::Body)
            }
        }
    }
}
