#![warn(clippy::pedantic)]

pub mod blend;
pub mod color;
pub mod geom;
pub mod id;
pub mod shape;
pub mod state;
pub mod viewport;

pub use color::Color;
pub use geom::{Rect, Vec2};
pub use shape::{Shape, ShapeData, ShapeID, ShapeKind};
