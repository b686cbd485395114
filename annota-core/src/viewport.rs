//! # Viewport mapping
//!
//! Conversion between document units and viewport pixels: `viewport = units * zoom - origin`.
//! Every zoom operation that takes a reference point keeps the document point under it fixed.

use crate::geom::{Rect, Vec2};

/// Zoom never goes below this, so the mapping stays invertible.
pub const MIN_ZOOM: f32 = 0.01;
/// Space left around a rect by [`ViewportMapper::focus`], in viewport pixels.
pub const MARGIN: f32 = 8.0;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ViewportMapper {
    zoom: f32,
    /// Offset of the viewport's top-left, in viewport units.
    pub origin: Vec2,
    /// Size of the viewport in pixels. Only needed by [`Self::focus`].
    pub size: Vec2,
    min_zoom: f32,
}
impl Default for ViewportMapper {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            origin: Vec2::zero(),
            size: Vec2::new(1080.0, 1080.0),
            min_zoom: MIN_ZOOM,
        }
    }
}
impl ViewportMapper {
    #[must_use]
    pub fn with_min_zoom(min_zoom: f32) -> Self {
        Self {
            min_zoom: min_zoom.max(f32::EPSILON),
            ..Self::default()
        }
    }
    #[must_use]
    pub fn zoom_factor(&self) -> f32 {
        self.zoom
    }
    /// Set zoom directly, clamped to the minimum. Does not re-anchor.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = if zoom.is_finite() {
            zoom.max(self.min_zoom)
        } else {
            self.zoom
        };
    }
    #[must_use]
    pub fn to_viewport(&self, length: f32) -> f32 {
        length * self.zoom
    }
    #[must_use]
    pub fn to_viewport_coords(&self, point: Vec2) -> Vec2 {
        point * self.zoom - self.origin
    }
    #[must_use]
    pub fn to_viewport_rect(&self, rect: &Rect) -> Rect {
        Rect::from_corners(
            self.to_viewport_coords(rect.min),
            self.to_viewport_coords(rect.max),
        )
    }
    #[must_use]
    pub fn to_units(&self, length: f32) -> f32 {
        length / self.zoom
    }
    #[must_use]
    pub fn to_units_coords(&self, point: Vec2) -> Vec2 {
        (point + self.origin) / self.zoom
    }
    pub fn zoom_in(&mut self, delta: f32) {
        self.set_zoom(self.zoom * (1.0 + delta));
    }
    pub fn zoom_out(&mut self, delta: f32) {
        let divisor = 1.0 + delta;
        if divisor > f32::EPSILON {
            self.set_zoom(self.zoom / divisor);
        }
    }
    /// Scale zoom by `factor`, keeping whatever is under `reference` (viewport coords) in place.
    pub fn zoom(&mut self, factor: f32, reference: Vec2) {
        let anchor = self.to_units_coords(reference);
        self.set_zoom(self.zoom * factor);
        self.origin = anchor * self.zoom - reference;
    }
    /// Move the view by a viewport-space displacement. Content follows the pointer.
    pub fn pan(&mut self, delta: Vec2) {
        self.origin -= delta;
    }
    /// Fit `rect` (document units) into the viewport, centered, with a margin.
    /// Returns false and leaves the view alone if the rect or viewport is too small.
    pub fn focus(&mut self, rect: &Rect) -> bool {
        let available = self.size - Vec2::broadcast(2.0 * MARGIN);
        if rect.is_degenerate() || available.x <= 0.0 || available.y <= 0.0 {
            return false;
        }
        let zoom = (available.x / rect.width()).min(available.y / rect.height());
        if zoom < self.min_zoom {
            return false;
        }
        self.zoom = zoom;
        self.origin = rect.center() * zoom - self.size / 2.0;
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).mag() < 1e-3
    }
    #[test]
    fn round_trip() {
        let points = [
            Vec2::zero(),
            Vec2::new(123.5, -40.0),
            Vec2::new(-1e3, 7.25),
        ];
        for (zoom, origin) in [
            (1.0, Vec2::zero()),
            (2.5, Vec2::new(10.0, -3.0)),
            (0.125, Vec2::new(-500.0, 250.0)),
        ] {
            let mut mapper = ViewportMapper::default();
            mapper.set_zoom(zoom);
            mapper.origin = origin;
            for point in points {
                assert!(close(
                    mapper.to_units_coords(mapper.to_viewport_coords(point)),
                    point
                ));
            }
        }
    }
    #[test]
    fn zoom_is_anchored() {
        let mut mapper = ViewportMapper::default();
        mapper.origin = Vec2::new(30.0, 40.0);
        let reference = Vec2::new(200.0, 150.0);
        let under = mapper.to_units_coords(reference);
        for factor in [1.5, 0.5, 3.0, 0.01] {
            mapper.zoom(factor, reference);
            assert!(close(mapper.to_viewport_coords(under), reference));
        }
    }
    #[test]
    fn zoom_clamps() {
        let mut mapper = ViewportMapper::default();
        for _ in 0..100 {
            mapper.zoom_out(1.0);
        }
        assert!(mapper.zoom_factor() >= MIN_ZOOM);
        mapper.zoom_in(-1.0);
        assert!(mapper.zoom_factor() > 0.0);
        mapper.set_zoom(f32::NAN);
        assert!(mapper.zoom_factor().is_finite());
    }
    #[test]
    fn focus_fills_view() {
        let mut mapper = ViewportMapper::default();
        mapper.size = Vec2::new(116.0, 216.0);
        let rect = Rect::from_corners(Vec2::new(10.0, 10.0), Vec2::new(60.0, 20.0));
        assert!(mapper.focus(&rect));
        assert!((mapper.zoom_factor() - 2.0).abs() < 1e-4);
        assert!(close(mapper.to_viewport_coords(rect.center()), mapper.size / 2.0));
        assert!(!mapper.focus(&Rect::default()));
    }
    #[test]
    fn pan_follows_pointer() {
        let mut mapper = ViewportMapper::default();
        let before = mapper.to_viewport_coords(Vec2::new(5.0, 5.0));
        mapper.pan(Vec2::new(3.0, -2.0));
        let after = mapper.to_viewport_coords(Vec2::new(5.0, 5.0));
        assert!(close(after - before, Vec2::new(3.0, -2.0)));
    }
}
