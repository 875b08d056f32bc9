use crate::{Mat4, Mat4Ext, Vec3, Vec4};

/// A ray in homogeneous coordinates.
///
/// `start` is a point (w=1) and `direction` is a vector (w=0). Rays are value
/// types: the scene-graph walk re-expresses them in each node's frame instead
/// of mutating them in place.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub start: Vec4,
    pub direction: Vec4,
}

impl Ray {
    /// Create a new ray from a 3D start point and direction.
    pub fn new(start: Vec3, direction: Vec3) -> Self {
        Self {
            start: start.extend(1.0),
            direction: direction.extend(0.0),
        }
    }

    /// Create a ray from homogeneous components, fixing up the w values.
    pub fn from_homogeneous(start: Vec4, direction: Vec4) -> Self {
        Self {
            start: start.truncate().extend(1.0),
            direction: direction.truncate().extend(0.0),
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: start + t * direction (w stays 1)
    #[inline]
    pub fn at(&self, t: f32) -> Vec4 {
        self.start + self.direction * t
    }

    /// Re-express this ray in another frame.
    ///
    /// The start goes through the full matrix; the direction ignores
    /// translation and comes out with w=0.
    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray {
            start: matrix.transform_point4(self.start),
            direction: matrix.transform_vector4(self.direction),
        }
    }
}
