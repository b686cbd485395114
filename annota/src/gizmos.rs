//! # Gizmos
//!
//! Visual feedback drawn over the document by the active tool: brush rings, the marquee, resize
//! handles. Gizmos are purely visual and live in viewport coordinates. Whoever renders the
//! overlay hands the tool an [`OverlaySurface`] to fill.

use annota_core::geom::{Rect, Vec2};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, strum::AsRefStr)]
pub enum CursorIcon {
    #[default]
    Default,
    Crosshair,
    Text,
    Move,
    Grab,
    Grabbing,
    ZoomIn,
    NeswResize,
    NwseResize,
    EwResize,
    NsResize,
    NotAllowed,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Gizmo {
    /// Outline of a round brush or eraser.
    Ring { center: Vec2, radius: f32 },
    /// Dashed selection rectangle.
    Marquee(Rect),
    /// A square grab handle.
    Handle { center: Vec2, size: f32 },
    /// Thin outline around something, e.g. the selection bounds.
    Outline(Rect),
}

pub trait OverlaySurface {
    fn push(&mut self, gizmo: Gizmo);
}
impl OverlaySurface for Vec<Gizmo> {
    fn push(&mut self, gizmo: Gizmo) {
        Vec::push(self, gizmo);
    }
}
impl<const N: usize> OverlaySurface for smallvec::SmallVec<[Gizmo; N]>
where
    [Gizmo; N]: smallvec::Array<Item = Gizmo>,
{
    fn push(&mut self, gizmo: Gizmo) {
        smallvec::SmallVec::push(self, gizmo);
    }
}
