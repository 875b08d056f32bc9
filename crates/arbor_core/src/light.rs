//! Point, directional and spot lights.

use arbor_math::{Mat4, Mat4Ext, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::material::Color;

/// A light source declared at a scene-graph node.
///
/// `position` is homogeneous: w=1 is a point light at that location, w=0 is a
/// directional light whose light vector (surface towards light) is
/// `-position`. A zero `spot_direction` means the light is omnidirectional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub position: Vec4,
    pub spot_direction: Vec4,
    /// Spot cone half-angle in degrees
    pub spot_cutoff: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient: Color::splat(0.1),
            diffuse: Color::ONE,
            specular: Color::ONE,
            position: Vec4::W,
            spot_direction: Vec4::ZERO,
            spot_cutoff: 180.0,
        }
    }
}

impl Light {
    /// Create a white point light at `position`.
    pub fn point(position: Vec3) -> Self {
        Self {
            position: position.extend(1.0),
            ..Default::default()
        }
    }

    /// Create a white directional light. `direction` is stored as-is in the
    /// w=0 position, so the shading light vector is `-direction`.
    pub fn directional(direction: Vec3) -> Self {
        Self {
            position: direction.extend(0.0),
            ..Default::default()
        }
    }

    /// Set the three color terms.
    pub fn with_colors(mut self, ambient: Color, diffuse: Color, specular: Color) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    /// Restrict the light to a cone around `direction`.
    pub fn with_spot(mut self, direction: Vec3, cutoff_degrees: f32) -> Self {
        self.spot_direction = direction.extend(0.0);
        self.spot_cutoff = cutoff_degrees;
        self
    }

    /// True for w=0 lights.
    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }

    /// Cosine of the spot cutoff angle.
    pub fn spot_cos_cutoff(&self) -> f32 {
        self.spot_cutoff.to_radians().cos()
    }

    /// Re-express the light in another frame.
    ///
    /// The position goes through the full matrix (a w=0 position is
    /// unaffected by translation); the spot direction is a vector.
    pub fn transformed(&self, frame: &Mat4) -> Light {
        Light {
            position: frame.transform_point4(self.position),
            spot_direction: frame.transform_vector4(self.spot_direction),
            ..self.clone()
        }
    }
}
