//! Camera and projection utilities

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::transform::{Mat4, Vec3};

/// Camera configuration for viewing the room
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view, degrees
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 15.0),
            target: Point3::new(0.0, 0.0, -100.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov_degrees: 30.0,
            aspect: width as f32 / height.max(1) as f32,
            near: 1.0,
            far: 100.0,
        }
    }

    /// Update the aspect ratio after a resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Mat4 {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Matrix4::new_perspective(self.aspect, self.fov_degrees.to_radians(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a model-space point through `mvp` to screen space.
    ///
    /// Returns `(x, y, depth)` with `y` growing downwards and depth in NDC,
    /// or `None` when the point is behind the camera or outside the frustum.
    pub fn project_to_screen(
        &self,
        point: &Vec3,
        mvp: &Mat4,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = mvp * Vector4::new(point.x, point.y, point.z, 1.0);

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
