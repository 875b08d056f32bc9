// Transform utilities for Mat4
//
// Extends glam::Mat4 with the homogeneous helpers the scene-graph walk needs.
// Note: glam::Mat4 already provides transform_point3(), inverse() and transpose()

use glam::{Mat4, Vec4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a homogeneous point, keeping whatever w the product yields.
    fn transform_point4(&self, point: Vec4) -> Vec4;

    /// Transform a homogeneous vector. The result always has w=0, even if the
    /// matrix has a non-affine bottom row.
    fn transform_vector4(&self, vector: Vec4) -> Vec4;

    /// Matrix that carries object-space normals into the frame of `self`.
    ///
    /// This is the transpose of the inverse, so normals stay perpendicular to
    /// surfaces under non-uniform scale.
    fn normal_correction(&self) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn transform_point4(&self, point: Vec4) -> Vec4 {
        *self * point
    }

    fn transform_vector4(&self, vector: Vec4) -> Vec4 {
        let transformed = *self * vector.truncate().extend(0.0);
        transformed.truncate().extend(0.0)
    }

    fn normal_correction(&self) -> Mat4 {
        self.inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_transform_point4_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let point = Vec4::new(1.0, 2.0, 3.0, 1.0);

        assert_eq!(mat.transform_point4(point), Vec4::new(11.0, 22.0, 33.0, 1.0));
    }

    #[test]
    fn test_transform_vector4_no_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let vector = Vec4::new(1.0, 0.0, 0.0, 0.0);

        // Translation should NOT affect vectors (w=0)
        assert_eq!(mat.transform_vector4(vector), vector);
    }

    #[test]
    fn test_transform_vector4_forces_w() {
        let mat = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        // Stray w on the input is ignored
        let transformed = mat.transform_vector4(Vec4::new(1.0, 0.0, 0.0, 1.0));

        assert!((transformed.x - 0.0).abs() < 0.001);
        assert!((transformed.y - 1.0).abs() < 0.001);
        assert_eq!(transformed.w, 0.0);
    }

    #[test]
    fn test_normal_correction_non_uniform_scale() {
        // Squash y: the normal of the tilted plane x + y = 0 must stay perpendicular
        let mat = Mat4::from_scale(Vec3::new(1.0, 0.5, 1.0));
        let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
        let tangent = Vec3::new(1.0, -1.0, 0.0);

        let n = mat.normal_correction().transform_vector3(normal);
        let t = mat.transform_vector3(tangent);

        assert!(n.dot(t).abs() < 1e-5);
    }

    #[test]
    fn test_normal_correction_rotation_is_rotation() {
        let mat = Mat4::from_rotation_y(0.7);
        let corrected = mat.normal_correction();

        assert!(corrected.abs_diff_eq(mat, 1e-5));
    }
}
