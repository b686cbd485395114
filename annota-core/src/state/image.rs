//! # Reference images
//!
//! Raster images shown beneath the layers. They're placed by an [`Arrangement`] and each can be
//! cropped by a "wipe" rect, which is how stacked images are compared against one another.

use crate::geom::{Rect, Vec2};

/// How reference images are laid out relative to each other.
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
pub enum Arrangement {
    /// Rows of equal cells, as close to square as possible.
    #[default]
    Grid,
    /// All on top of each other.
    Stacked,
    Horizontal,
    Vertical,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ReferenceImage {
    pub name: String,
    /// Size in pixels, which is also the size in document units.
    pub size: Vec2,
    /// Extra offset on top of where the arrangement puts it.
    pub offset: Vec2,
    /// Visible part of the image, in image-local units. Covers the whole image by default.
    pub wipe: Rect,
}
impl ReferenceImage {
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let size = Vec2::new(width as f32, height as f32);
        Self {
            name: name.into(),
            size,
            offset: Vec2::zero(),
            wipe: Rect::from_origin_size(Vec2::zero(), size),
        }
    }
    #[must_use]
    pub fn full_rect(&self) -> Rect {
        Rect::from_origin_size(Vec2::zero(), self.size)
    }
    /// Set the wipe, clamped to the image.
    pub fn set_wipe(&mut self, wipe: Rect) {
        let full = self.full_rect();
        let min = wipe.min.max_by_component(full.min).min_by_component(full.max);
        let max = wipe.max.max_by_component(full.min).min_by_component(full.max);
        self.wipe = Rect::from_corners(min, max);
    }
    /// The wipe, placed at `placement` in document units.
    #[must_use]
    pub fn visible_rect(&self, placement: &Rect) -> Rect {
        self.wipe.translate(placement.min)
    }
}

impl Arrangement {
    /// Where each image lands in document units, in the same order as `images`.
    #[must_use]
    pub fn layout(self, images: &[ReferenceImage]) -> Vec<Rect> {
        let mut cursor = Vec2::zero();
        match self {
            Self::Stacked => images
                .iter()
                .map(|image| Rect::from_origin_size(image.offset, image.size))
                .collect(),
            Self::Horizontal => images
                .iter()
                .map(|image| {
                    let rect = Rect::from_origin_size(cursor + image.offset, image.size);
                    cursor.x += image.size.x;
                    rect
                })
                .collect(),
            Self::Vertical => images
                .iter()
                .map(|image| {
                    let rect = Rect::from_origin_size(cursor + image.offset, image.size);
                    cursor.y += image.size.y;
                    rect
                })
                .collect(),
            Self::Grid => {
                let columns = grid_columns(images.len());
                let cell = images
                    .iter()
                    .fold(Vec2::zero(), |cell, image| cell.max_by_component(image.size));
                images
                    .iter()
                    .enumerate()
                    .map(|(idx, image)| {
                        #[allow(clippy::cast_precision_loss)]
                        let origin = Vec2::new(
                            (idx % columns) as f32 * cell.x,
                            (idx / columns) as f32 * cell.y,
                        );
                        Rect::from_origin_size(origin + image.offset, image.size)
                    })
                    .collect()
            }
        }
    }
}

/// Smallest column count whose square holds `count` cells.
fn grid_columns(count: usize) -> usize {
    let mut columns = 1;
    while columns * columns < count {
        columns += 1;
    }
    columns
}
