//! 2D orthographic camera

use glam::{Mat4, Vec2, Vec3};

/// 2D orthographic camera. `zoom` is the visible half-height in world units.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec3,
    pub zoom: f32,
    pub aspect_ratio: f32,
}

impl Camera2D {
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            zoom: 1.0,
            aspect_ratio,
        }
    }

    /// Centre the camera on the rectangle `[min, max]` and zoom so it fits
    /// the viewport with `margin` world units to spare.
    pub fn frame(&mut self, min: Vec2, max: Vec2, margin: f32) {
        let center = (min + max) * 0.5;
        let half = (max - min) * 0.5 + Vec2::splat(margin);
        self.position = Vec3::new(center.x, center.y, 0.0);
        let aspect = self.aspect_ratio.max(f32::EPSILON);
        self.zoom = half.y.max(half.x / aspect);
    }

    /// Get the view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        let half_width = self.zoom * self.aspect_ratio;
        let half_height = self.zoom;

        let projection = Mat4::orthographic_rh(
            -half_width,
            half_width,
            -half_height,
            half_height,
            -1.0,
            1.0,
        );

        let view = Mat4::from_translation(-self.position);

        projection * view
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera_2d(camera: &Camera2D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_centres_rectangle() {
        let mut camera = Camera2D::new(2.0);
        camera.frame(Vec2::new(0.0, 0.0), Vec2::new(400.0, 100.0), 0.0);

        let clip = camera.view_projection() * glam::Vec4::new(200.0, 50.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);

        // Width-limited: 200 half-width over aspect 2 gives 100 half-height
        assert!((camera.zoom - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_frame_height_limited() {
        let mut camera = Camera2D::new(1.0);
        camera.frame(Vec2::new(-10.0, -50.0), Vec2::new(10.0, 50.0), 5.0);
        assert!((camera.zoom - 55.0).abs() < 1e-4);
    }
}
