//! Texture loading and lookup for shading.
//!
//! Textures are resolved in a blocking setup phase: every registered image is
//! decoded into a [`TextureTable`] before any pixel is shaded, and the table is
//! read-only for the rest of the render.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arbor_math::{Vec3, Vec4};
use thiserror::Error;

use crate::node::NodeKind;
use crate::scene::Scenegraph;

/// Texture name that stands for "no texture": shading multiplies by 1.0 and
/// never calls a sampler.
pub const WHITE_TEXTURE: &str = "white";

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unknown texture '{name}' used by node '{node}'")]
    UnknownTexture { name: String, node: String },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Anything that can return an RGBA color for a texture coordinate.
///
/// Implementations must handle coordinates outside [0, 1] themselves.
pub trait TextureSampler: Send + Sync {
    fn sample(&self, u: f32, v: f32) -> Vec4;
}

/// A decoded texture with pixel data.
///
/// Stores pixels as RGBA floats in [0, 1], row-major, top row first.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data, [R, G, B, A] per pixel
    pub pixels: Vec<[f32; 4]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
            path: "<solid>".to_string(),
        }
    }

    /// Create a two-color checkerboard with `cells` squares per side.
    pub fn checker(cells: u32, a: Vec3, b: Vec3) -> Self {
        let size = cells.max(1);
        let pixels = (0..size * size)
            .map(|i| {
                let c = if (i / size + i % size) % 2 == 0 { a } else { b };
                [c.x, c.y, c.z, 1.0]
            })
            .collect();
        Self::new(size, size, pixels, "<checker>")
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

impl TextureSampler for Texture {
    /// Bilinear lookup. UVs are clamped to [0, 1], with (0, 0) at the
    /// bottom-left of the image.
    fn sample(&self, u: f32, v: f32) -> Vec4 {
        if self.width == 0 || self.height == 0 {
            return Vec4::ONE;
        }

        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };

        // Flip v for image row order
        let x = u * (self.width - 1) as f32;
        let y = (1.0 - v) * (self.height - 1) as f32;

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let p00 = Vec4::from_array(self.get_pixel(x0, y0));
        let p10 = Vec4::from_array(self.get_pixel(x1, y0));
        let p01 = Vec4::from_array(self.get_pixel(x0, y1));
        let p11 = Vec4::from_array(self.get_pixel(x1, y1));

        let top = p00.lerp(p10, fx);
        let bottom = p01.lerp(p11, fx);
        top.lerp(bottom, fy)
    }
}

/// Resolved name → sampler table used while rendering.
#[derive(Clone, Default)]
pub struct TextureTable {
    samplers: HashMap<String, Arc<dyn TextureSampler>>,
}

impl TextureTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every texture registered in `scene`, resolving relative paths
    /// against `base_dir`. Blocks until all images are loaded.
    pub fn load_registry(scene: &Scenegraph, base_dir: Option<&Path>) -> TextureResult<Self> {
        let mut table = Self::new();
        for (name, path) in scene.texture_paths() {
            let full_path = resolve_path(base_dir, path);
            let texture = load_texture_file(&full_path)?;

            log::debug!(
                "Loaded texture: {} ({}x{}, {:.1} KB)",
                name,
                texture.width,
                texture.height,
                texture.size_bytes() as f32 / 1024.0
            );

            table.insert(name, texture);
        }

        log::info!("Loaded {} textures", table.len());
        Ok(table)
    }

    /// Bind a sampler to a name, replacing any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, sampler: impl TextureSampler + 'static) {
        self.samplers.insert(name.into(), Arc::new(sampler));
    }

    /// Get a sampler by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TextureSampler>> {
        self.samplers.get(name)
    }

    /// Check that every leaf reachable in `scene` names either `"white"` or a
    /// bound texture.
    pub fn validate(&self, scene: &Scenegraph) -> TextureResult<()> {
        for id in scene.reachable() {
            let Some(node) = scene.node(id) else { continue };
            if let NodeKind::Leaf { texture, .. } = &node.kind {
                if texture != WHITE_TEXTURE && !self.samplers.contains_key(texture) {
                    return Err(TextureError::UnknownTexture {
                        name: texture.clone(),
                        node: node.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get the number of bound textures.
    pub fn len(&self) -> usize {
        self.samplers.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.samplers.is_empty()
    }
}

/// Resolve a path relative to an optional base directory.
fn resolve_path(base_dir: Option<&Path>, path: &str) -> PathBuf {
    let path = Path::new(path);

    match base_dir {
        Some(base) if !path.is_absolute() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    // Shading happens in display space, so bytes are only rescaled
    let pixels: Vec<[f32; 4]> = rgba
        .pixels()
        .map(|p| {
            [
                p[0] as f32 / 255.0,
                p[1] as f32 / 255.0,
                p[2] as f32 / 255.0,
                p[3] as f32 / 255.0,
            ]
        })
        .collect();

    Ok(Texture::new(
        width,
        height,
        pixels,
        path.to_string_lossy().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Primitive};

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width, 1);
        assert_eq!(tex.height, 1);

        let sample = tex.sample(0.5, 0.5);
        assert!((sample - Vec4::new(1.0, 0.5, 0.0, 1.0)).length() < 0.001);
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let tex = Texture::checker(2, Vec3::ONE, Vec3::ZERO);

        // Top-left cell is `a`, bottom-left is `b`
        assert!((tex.sample(-3.0, 7.0) - Vec4::ONE).length() < 0.001);
        assert!((tex.sample(0.0, -1.0) - Vec4::new(0.0, 0.0, 0.0, 1.0)).length() < 0.001);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let tex = Texture::new(
            2,
            1,
            vec![[0.0, 0.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]],
            "<test>",
        );

        let mid = tex.sample(0.5, 0.5);
        assert!((mid.x - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_table_validate() {
        let mut scene = Scenegraph::new();
        let root = scene.add_group("root");
        let plain = scene.add_leaf("plain", Primitive::Sphere, Material::default(), "white");
        let wood = scene.add_leaf("crate", Primitive::Box, Material::default(), "wood");
        scene.add_child(root, plain).unwrap();
        scene.add_child(root, wood).unwrap();
        scene.set_root(root).unwrap();

        let mut table = TextureTable::new();
        match table.validate(&scene) {
            Err(TextureError::UnknownTexture { name, node }) => {
                assert_eq!(name, "wood");
                assert_eq!(node, "crate");
            }
            other => panic!("expected UnknownTexture, got {:?}", other),
        }

        table.insert("wood", Texture::solid_color(Vec3::new(0.6, 0.4, 0.2)));
        assert!(table.validate(&scene).is_ok());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_registry_missing_file() {
        let mut scene = Scenegraph::new();
        scene.register_texture("ghost", "does/not/exist.png");

        let result = TextureTable::load_registry(&scene, None);
        assert!(matches!(result, Err(TextureError::LoadError(_))));
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/assets");
        assert_eq!(resolve_path(Some(base), "a.png"), PathBuf::from("/assets/a.png"));
        assert_eq!(resolve_path(Some(base), "/abs/a.png"), PathBuf::from("/abs/a.png"));
        assert_eq!(resolve_path(None, "a.png"), PathBuf::from("a.png"));
    }
}
