//! Pinhole camera for primary ray generation.

use arbor_math::{Mat4, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Image-plane camera in view space.
///
/// The eye sits at the view-space origin looking down -Z. Pixel `(i, j)` is
/// row `i` counted from the bottom and column `j` counted from the left.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov_y: f32,
}

impl Camera {
    /// Create a new camera.
    pub fn new(width: u32, height: u32, fov_y: f32) -> Self {
        Self {
            width,
            height,
            fov_y,
        }
    }

    /// Distance from the eye to the image plane, in pixels.
    pub fn image_plane_distance(&self) -> f32 {
        0.5 * self.height as f32 / (0.5 * self.fov_y.to_radians()).tan()
    }

    /// Primary ray through pixel row `i`, column `j`.
    pub fn primary_ray(&self, i: u32, j: u32) -> Ray {
        let x = j as f32 - self.width as f32 / 2.0;
        let y = i as f32 - self.height as f32 / 2.0;
        Ray::new(Vec3::ZERO, Vec3::new(x, y, -self.image_plane_distance()))
    }
}

/// Where the camera sits in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl CameraConfig {
    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_plane_distance() {
        // 90 degrees: half the height
        let camera = Camera::new(100, 100, 90.0);
        assert!((camera.image_plane_distance() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_center_ray_looks_down_negative_z() {
        let camera = Camera::new(64, 64, 60.0);
        let ray = camera.primary_ray(32, 32);

        assert_eq!(ray.start.truncate(), Vec3::ZERO);
        assert_eq!(ray.direction.x, 0.0);
        assert_eq!(ray.direction.y, 0.0);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn test_row_zero_is_bottom() {
        let camera = Camera::new(64, 64, 60.0);
        let ray = camera.primary_ray(0, 0);

        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y < 0.0);
    }

    #[test]
    fn test_view_matrix() {
        let config = CameraConfig::default();
        let view = config.view_matrix();

        // The eye maps to the view-space origin
        assert!(view.transform_point3(config.eye).length() < 1e-5);
        // The target lies straight ahead
        let target = view.transform_point3(config.target);
        assert!((target - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-4);
    }
}
