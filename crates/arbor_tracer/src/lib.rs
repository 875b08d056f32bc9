//! Arbor ray tracer.
//!
//! Casts one primary ray per pixel through a scene graph, finds the closest
//! hit against analytic unit primitives, and shades it with Phong lighting,
//! hard shadows and texture lookup.

mod camera;
mod error;
mod hit;
mod intersect;
mod renderer;
mod shading;
mod traversal;

pub use camera::{Camera, CameraConfig};
pub use error::{RenderError, RenderResult};
pub use hit::HitRecord;
pub use intersect::intersect_leaf;
pub use renderer::{color_to_rgba8, ImageBuffer, RenderConfig, Raytracer};
pub use shading::shade;
pub use traversal::{collect_lights, intersect_node, Traceable};

/// Re-export common math types from arbor_math
pub use arbor_math::{Mat4, Ray, Vec2, Vec3, Vec4};
