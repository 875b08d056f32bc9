//! Phong material description.

use arbor_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// A Phong material attached to a leaf node.
///
/// Shading reads `ambient`, `diffuse`, `specular` and `shininess`. The
/// remaining scalars are carried for scene descriptions that set them but are
/// not consumed by the direct-lighting renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient reflectance (RGB, 0-1)
    pub ambient: Color,

    /// Diffuse reflectance (RGB, 0-1)
    pub diffuse: Color,

    /// Specular reflectance (RGB, 0-1)
    pub specular: Color,

    /// Phong exponent
    pub shininess: f32,

    /// Reserved: mirror reflection weight
    pub reflection: f32,

    /// Reserved: transmission weight
    pub transparency: f32,

    /// Reserved: fraction of light absorbed at the surface
    pub absorption: f32,

    /// Reserved: index of refraction
    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::splat(0.2),
            diffuse: Color::splat(0.8),
            specular: Color::ZERO,
            shininess: 1.0,
            reflection: 0.0,
            transparency: 0.0,
            absorption: 1.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// Create a material from the four Phong terms.
    pub fn phong(ambient: Color, diffuse: Color, specular: Color, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            ..Default::default()
        }
    }

    /// Create a matte material whose ambient term is a dimmed copy of the diffuse color.
    pub fn matte(color: Color) -> Self {
        Self::phong(color * 0.2, color, Color::ZERO, 1.0)
    }

    /// Check whether the material has a specular highlight at all.
    pub fn is_specular(&self) -> bool {
        self.specular.max_element() > 0.0
    }
}
