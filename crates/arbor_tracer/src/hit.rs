//! HitRecord for ray-scene intersection.

use arbor_core::{Material, WHITE_TEXTURE};
use arbor_math::{Vec2, Vec4};

/// Result of an intersection query against a leaf or a whole subtree.
///
/// A record with infinite `time` is the "no hit" sentinel; every other field
/// is meaningless in that state.
#[derive(Debug, Clone)]
pub struct HitRecord<'a> {
    /// Ray parameter of the hit, +∞ when nothing was hit
    pub time: f32,
    /// Hit point in the frame of the query ray (w=1)
    pub point: Vec4,
    /// Unit surface normal in the frame of the query ray (w=0)
    pub normal: Vec4,
    /// Material of the leaf that was hit
    pub material: Option<&'a Material>,
    /// Texture bound to the leaf that was hit
    pub texture_name: &'a str,
    /// Texture coordinates in [0, 1]²
    pub texcoord: Vec2,
}

impl<'a> HitRecord<'a> {
    /// The "no hit" sentinel.
    pub fn miss() -> Self {
        Self {
            time: f32::INFINITY,
            point: Vec4::W,
            normal: Vec4::ZERO,
            material: None,
            texture_name: WHITE_TEXTURE,
            texcoord: Vec2::ZERO,
        }
    }

    /// True if this record describes an actual intersection.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.time.is_finite()
    }

    /// Keep whichever of two records is nearer along the ray.
    ///
    /// Ties keep `self`, so earlier children win over later ones.
    #[inline]
    pub fn closer(self, other: HitRecord<'a>) -> HitRecord<'a> {
        if other.time < self.time {
            other
        } else {
            self
        }
    }
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self::miss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(time: f32) -> HitRecord<'static> {
        HitRecord {
            time,
            ..HitRecord::miss()
        }
    }

    #[test]
    fn test_miss_sentinel() {
        let rec = HitRecord::miss();
        assert!(!rec.is_hit());
        assert_eq!(rec.time, f32::INFINITY);
        assert!(rec.material.is_none());
    }

    #[test]
    fn test_closer_picks_minimum() {
        assert_eq!(at(3.0).closer(at(1.0)).time, 1.0);
        assert_eq!(at(1.0).closer(at(3.0)).time, 1.0);
        assert_eq!(HitRecord::miss().closer(at(2.0)).time, 2.0);
        assert_eq!(at(2.0).closer(HitRecord::miss()).time, 2.0);
    }

    #[test]
    fn test_closer_ignores_nan() {
        // A NaN time never replaces a real hit
        assert_eq!(at(2.0).closer(at(f32::NAN)).time, 2.0);
    }
}
