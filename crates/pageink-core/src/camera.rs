//! View transform for a single drawing surface.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Camera holds the pan/zoom view transform of a surface.
///
/// The transform is view-only: drawable objects keep canvas-space
/// coordinates and pointer positions are mapped back through the inverse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen units.
    pub offset: Vec2,
    /// Current uniform scale.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen-to-canvas transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom level. Must be positive.
    pub fn set_zoom(&mut self, zoom: f64) {
        debug_assert!(zoom > 0.0, "zoom must be positive, got {zoom}");
        self.zoom = zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_is_identity() {
        let camera = Camera::new();
        let screen = Point::new(100.0, 200.0);
        let canvas = camera.screen_to_canvas(screen);
        assert!((canvas.x - screen.x).abs() < f64::EPSILON);
        assert!((canvas.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_offset_and_zoom() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(50.0, 100.0));
        camera.set_zoom(2.0);
        let canvas = camera.screen_to_canvas(Point::new(150.0, 300.0));
        assert!((canvas.x - 50.0).abs() < f64::EPSILON);
        assert!((canvas.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.25;

        let original = Point::new(123.0, 456.0);
        let back = camera.canvas_to_screen(camera.screen_to_canvas(original));

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }
}
