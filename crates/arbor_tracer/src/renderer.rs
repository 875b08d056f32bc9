//! Whole-frame ray tracing.
//!
//! One primary ray per pixel, closest hit across the scene graph, then Phong
//! shading against every light collected for the frame. Rows are rendered in
//! parallel with rayon; nothing is shared between pixels except read-only
//! scene data.

use std::time::Instant;

use arbor_core::{Light, SceneError, Scenegraph, TextureTable};
use arbor_math::{Mat4, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::shading::shade;
use crate::traversal::Traceable;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Color of pixels whose ray hits nothing
    pub background: Vec4,
    /// Distance shadow rays start above the surface
    pub shadow_bias: f32,
    /// Half-width of the random offset added to shadow ray origins
    pub shadow_jitter: f32,
    /// Seed for all per-pixel randomness
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fov_degrees: 60.0,
            background: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shadow_bias: 1e-3,
            shadow_jitter: 0.0,
            seed: 0,
        }
    }
}

/// Image buffer for storing render output.
///
/// Row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec4>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec4::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec4) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Flat `4 * width * height` RGBA floats, row-major.
    pub fn to_rgba_f32(&self) -> Vec<f32> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba8(*color));
        }
        bytes
    }

    /// Convert to an `image` buffer ready to be written to disk.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(color_to_rgba8(self.get(x, y)))
        })
    }
}

/// Quantize a color to 8 bits per channel.
#[inline]
pub fn color_to_rgba8(color: Vec4) -> [u8; 4] {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
}

/// Renders a scene graph through a pinhole camera.
///
/// Construction checks everything that could go wrong (resolution, field of
/// view, root, texture names), so `draw` itself is infallible.
pub struct Raytracer<'a> {
    scene: &'a Scenegraph,
    textures: &'a TextureTable,
    config: RenderConfig,
    camera: Camera,
}

impl<'a> Raytracer<'a> {
    pub fn new(
        scene: &'a Scenegraph,
        textures: &'a TextureTable,
        config: RenderConfig,
    ) -> RenderResult<Self> {
        if config.width == 0 || config.height == 0 {
            return Err(RenderError::InvalidResolution {
                width: config.width,
                height: config.height,
            });
        }
        let fov = config.fov_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(RenderError::InvalidFov(fov));
        }
        if scene.root().is_none() {
            return Err(SceneError::NoRoot.into());
        }
        textures.validate(scene)?;

        let camera = Camera::new(config.width, config.height, config.fov_degrees);
        Ok(Self {
            scene,
            textures,
            config,
            camera,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a full frame with the scene placed by `view`.
    pub fn draw(&self, view: Mat4) -> ImageBuffer {
        let start = Instant::now();
        let (width, height) = (self.config.width, self.config.height);

        let lights = self.scene.lights(view);
        log::info!(
            "Rendering {}x{}: {} nodes, {} leaves, {} lights",
            width,
            height,
            self.scene.node_count(),
            self.scene.leaf_count(),
            lights.len()
        );

        let mut image = ImageBuffer::new(width, height);
        image
            .pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(row, pixels)| {
                // Camera rows count up from the bottom
                let i = height - 1 - row as u32;
                for (j, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = self.trace(i, j as u32, view, &lights);
                }
            });

        log::info!("Render finished in {:.2?}", start.elapsed());
        image
    }

    /// Color of camera pixel `(i, j)`, with `i` counted from the bottom.
    ///
    /// Matches the corresponding pixel of [`Raytracer::draw`] exactly.
    pub fn render_pixel(&self, i: u32, j: u32, view: Mat4) -> Vec4 {
        let lights = self.scene.lights(view);
        self.trace(i, j, view, &lights)
    }

    fn trace(&self, i: u32, j: u32, view: Mat4, lights: &[Light]) -> Vec4 {
        let ray = self.camera.primary_ray(i, j);
        let hit = self.scene.intersect(&ray, view);
        if !hit.is_hit() {
            return self.config.background;
        }

        let mut rng = pixel_rng(self.config.seed, i, j);
        shade(
            self.scene,
            view,
            &hit,
            lights,
            self.textures,
            &self.config,
            &mut rng,
        )
    }
}

/// Independent, reproducible random stream for one pixel.
fn pixel_rng(seed: u64, i: u32, j: u32) -> StdRng {
    let key = ((i as u64) << 32) | j as u64;
    StdRng::seed_from_u64(seed ^ key.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
