use glam::{UVec2, Vec2};

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 8.0;

/// Top-down 2D camera. `position` is the world-pixel point drawn at the
/// canvas origin.
/// Camera motion is presentation state and lives outside the world grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    pub fn new(position: Vec2, zoom: f32) -> Self {
        Self {
            position,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Zoom actually applied. `zoom` is public, so out-of-range or
    /// non-finite values set directly are brought back into range here.
    pub fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() {
            self.zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        }
    }

    /// World-pixel size of the area a canvas shows at the current zoom.
    pub fn viewport_size(&self, canvas: UVec2) -> Vec2 {
        canvas.as_vec2() / self.effective_zoom()
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.effective_zoom()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen / self.effective_zoom() + self.position
    }

    /// Move so that `target` sits in the middle of the canvas.
    pub fn center_on(&mut self, target: Vec2, canvas: UVec2) {
        self.position = target - self.viewport_size(canvas) * 0.5;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta / self.effective_zoom();
    }

    /// Multiply zoom by `factor`, keeping the canvas centre fixed.
    pub fn zoom_by(&mut self, factor: f32, canvas: UVec2) {
        let centre = self.screen_to_world(canvas.as_vec2() * 0.5);
        self.zoom = (self.effective_zoom() * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.center_on(centre, canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = Camera2D::default();
        assert_eq!(cam.viewport_size(UVec2::new(800, 600)), Vec2::new(800.0, 600.0));
        assert_eq!(cam.world_to_screen(Vec2::new(10.0, 5.0)), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn zoom_shrinks_viewport() {
        let cam = Camera2D::new(Vec2::new(100.0, 100.0), 2.0);
        assert_eq!(cam.viewport_size(UVec2::new(800, 600)), Vec2::new(400.0, 300.0));
        let p = Vec2::new(150.0, 120.0);
        assert_eq!(cam.screen_to_world(cam.world_to_screen(p)), p);
    }

    #[test]
    fn zoom_keeps_centre() {
        let canvas = UVec2::new(800, 600);
        let mut cam = Camera2D::default();
        cam.center_on(Vec2::new(1000.0, 1000.0), canvas);
        cam.zoom_by(2.0, canvas);
        assert_eq!(cam.screen_to_world(canvas.as_vec2() * 0.5), Vec2::new(1000.0, 1000.0));
        cam.zoom_by(1000.0, canvas);
        assert_eq!(cam.zoom, MAX_ZOOM);
    }

    #[test]
    fn degenerate_zoom_is_brought_into_range() {
        let canvas = UVec2::new(800, 600);
        let mut cam = Camera2D::default();
        cam.zoom = 0.0;
        assert_eq!(cam.effective_zoom(), MIN_ZOOM);
        assert!(cam.viewport_size(canvas).is_finite());
        cam.zoom = f32::NAN;
        assert_eq!(cam.viewport_size(canvas), canvas.as_vec2());
    }

    #[test]
    fn pan_is_in_screen_pixels() {
        let mut cam = Camera2D::new(Vec2::ZERO, 2.0);
        cam.pan(Vec2::new(10.0, 0.0));
        assert_eq!(cam.position, Vec2::new(5.0, 0.0));
    }
}
