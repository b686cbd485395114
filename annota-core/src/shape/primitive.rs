//! Two-point primitives: lines, arrows, rectangles, circles, text boxes, and placed bitmaps.
//!
//! All of them are anchored at a `start` and dragged out to an `end`, which is `None` until the
//! first drag moves it. They're useless (invalid) until then.

use unicode_segmentation::UnicodeSegmentation;

use crate::color::Color;
use crate::geom::{Rect, Vec2};

#[derive(Clone, PartialEq, Debug)]
pub struct Line {
    pub start: Vec2,
    pub end: Option<Vec2>,
    pub color: Color,
    pub width: f32,
}
impl Line {
    #[must_use]
    pub fn new(start: Vec2, color: Color, width: f32) -> Self {
        Self {
            start,
            end: None,
            color,
            width,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Arrow {
    pub start: Vec2,
    pub end: Option<Vec2>,
    pub color: Color,
    pub width: f32,
    /// Length of the barbs, in document units.
    pub head_size: f32,
    /// Width of the shaft at the start point. The shaft tapers to `width` at the head.
    pub tail_width: f32,
}
impl Arrow {
    #[must_use]
    pub fn new(start: Vec2, color: Color, width: f32) -> Self {
        Self {
            start,
            end: None,
            color,
            width,
            head_size: width * 4.0,
            tail_width: width,
        }
    }
    /// The two barb tips of the head, or None if there's no direction yet.
    #[must_use]
    pub fn head_points(&self) -> Option<[Vec2; 2]> {
        // Barbs sit 30 degrees either side of the shaft.
        const BARB_COS: f32 = 0.866_025_4;
        const BARB_SIN: f32 = 0.5;

        let end = self.end?;
        let shaft = end - self.start;
        let len = shaft.mag();
        if len < crate::geom::EPSILON {
            return None;
        }
        // Unit vector pointing from the head back along the shaft.
        let back = -shaft / len;
        let rotate = |sin: f32| {
            Vec2::new(
                back.x * BARB_COS - back.y * sin,
                back.x * sin + back.y * BARB_COS,
            )
        };
        Some([
            end + rotate(BARB_SIN) * self.head_size,
            end + rotate(-BARB_SIN) * self.head_size,
        ])
    }
}

/// Shared geometry of rectangles and circles, the latter inscribed in the frame.
#[derive(Clone, PartialEq, Debug)]
pub struct Frame {
    pub start: Vec2,
    pub end: Option<Vec2>,
    pub color: Color,
    pub width: f32,
    pub fill: bool,
    pub fill_color: Color,
    pub fill_opacity: u8,
}
impl Frame {
    #[must_use]
    pub fn new(start: Vec2, color: Color, width: f32) -> Self {
        Self {
            start,
            end: None,
            color,
            width,
            fill: false,
            fill_color: color,
            fill_opacity: crate::blend::OPAQUE,
        }
    }
    #[must_use]
    pub fn with_fill(self, fill_color: Color, fill_opacity: u8) -> Self {
        Self {
            fill: true,
            fill_color,
            fill_opacity,
            ..self
        }
    }
    /// Normalized rect, once dragged out.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.end.map(|end| Rect::from_corners(self.start, end))
    }
}

/// Placement of text within its box.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Alignment {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}
impl Alignment {
    /// Where the text's anchor sits inside its box, as fractions of width and height.
    #[must_use]
    pub fn anchor(self) -> Vec2 {
        let (x, y) = match self {
            Self::TopLeft => (0.0, 0.0),
            Self::Top => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::Left => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::Right => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::Bottom => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        };
        Vec2::new(x, y)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Text {
    pub start: Vec2,
    pub end: Option<Vec2>,
    pub content: String,
    pub color: Color,
    /// Background behind the glyphs, if any.
    pub fill: Option<Color>,
    pub alignment: Alignment,
    pub font_size: f32,
}
impl Text {
    #[must_use]
    pub fn new(start: Vec2, color: Color, font_size: f32) -> Self {
        Self {
            start,
            end: None,
            content: String::new(),
            color,
            fill: None,
            alignment: Alignment::default(),
            font_size,
        }
    }
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.end.map(|end| Rect::from_corners(self.start, end))
    }
    pub fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
    }
    /// Remove the last user-perceived character. Returns false if already empty.
    pub fn pop_grapheme(&mut self) -> bool {
        let Some((idx, _)) = self.content.grapheme_indices(true).next_back() else {
            return false;
        };
        self.content.truncate(idx);
        true
    }
}

/// An embedded raster, stretched over `rect`.
#[derive(Clone, PartialEq, Debug)]
pub struct Bitmap {
    pub image: image::RgbaImage,
    pub rect: Rect,
}
impl Bitmap {
    /// Place at `origin`, at one document unit per pixel.
    #[must_use]
    pub fn new(image: image::RgbaImage, origin: Vec2) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let size = Vec2::new(image.width() as f32, image.height() as f32);
        Self {
            image,
            rect: Rect::from_origin_size(origin, size),
        }
    }
}
