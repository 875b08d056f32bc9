//! Arbor Core - scene graph, materials, lights and textures.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Scenegraph`, `SceneNode`, `NodeKind`, `Primitive`
//! - **Shading inputs**: `Material`, `Light`
//! - **Textures**: `Texture`, `TextureTable` and the `TextureSampler` seam
//!
//! # Example
//!
//! ```ignore
//! use arbor_core::{Material, Primitive, Scenegraph};
//! use arbor_math::{Mat4, Vec3};
//!
//! let mut scene = Scenegraph::new();
//! let root = scene.add_group("root");
//! let xform = scene.add_transform("ball-xform", Mat4::from_translation(Vec3::Y));
//! let ball = scene.add_leaf("ball", Primitive::Sphere, Material::default(), "white");
//! scene.add_child(root, xform)?;
//! scene.add_child(xform, ball)?;
//! scene.set_root(root)?;
//! ```

pub mod light;
pub mod material;
pub mod node;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use light::Light;
pub use material::Material;
pub use node::{NodeId, NodeKind, Primitive, SceneNode};
pub use scene::{SceneError, SceneResult, Scenegraph};
pub use texture::{
    Texture, TextureError, TextureResult, TextureSampler, TextureTable, WHITE_TEXTURE,
};
