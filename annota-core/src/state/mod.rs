//! # State
//!
//! The mutable document model: layers of shapes, the stack that orders them, what's selected,
//! the reference images underneath, and the snapshot history tying them together.

pub mod document;
pub mod history;
pub mod image;
pub mod layer;
pub mod layer_stack;
pub mod selection;

pub use document::{DrawContext, Document};
pub use layer::Layer;
pub use layer_stack::LayerStack;
pub use selection::Selection;

/// Why an edit was refused. Interactive callers treat all of these as silent no-ops,
/// they're typed so the reason can be logged and tested.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    #[error("target layer or document is locked")]
    Locked,
    #[error("index does not refer to the layer the caller expected")]
    IndexMismatch,
    #[error("no current layer")]
    NoLayer,
    #[error("shape not found")]
    UnknownShape,
    #[error("edit makes no changes")]
    NoOp,
}
