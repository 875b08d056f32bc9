//! Arbor command-line renderer.
//!
//! Renders the built-in demo scene to a PNG. Settings come from defaults, an
//! optional JSON config file, and command-line flags, in that order.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use arbor_math::Vec3;
use arbor_tracer::{CameraConfig, RenderConfig, Raytracer};
use clap::Parser;
use serde::Deserialize;

mod demo;

/// Arbor - scene-graph ray tracer
#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Render the Arbor demo scene to a PNG")]
struct Cli {
    /// JSON file with `render` and `camera` sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output image path
    #[arg(short, long, default_value = "arbor.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// Seed for shadow jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Camera position as x,y,z
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    eye: Option<Vec<f32>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    render: RenderConfig,
    camera: CameraConfig,
}

impl Cli {
    fn settings(&self) -> Result<FileConfig> {
        let mut settings = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => FileConfig {
                camera: CameraConfig {
                    eye: Vec3::new(0.0, 2.0, 9.0),
                    ..Default::default()
                },
                ..Default::default()
            },
        };

        let render = &mut settings.render;
        if let Some(width) = self.width {
            render.width = width;
        }
        if let Some(height) = self.height {
            render.height = height;
        }
        if let Some(fov) = self.fov {
            render.fov_degrees = fov;
        }
        if let Some(seed) = self.seed {
            render.seed = seed;
        }
        if let Some(eye) = &self.eye {
            let [x, y, z] = eye[..] else {
                anyhow::bail!("--eye expects three values, got {}", eye.len());
            };
            settings.camera.eye = Vec3::new(x, y, z);
        }

        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    log::info!("Building demo scene");
    let scene = demo::build_scene().context("Failed to build demo scene")?;
    let textures = demo::textures();

    let tracer = Raytracer::new(&scene, &textures, settings.render)
        .context("Failed to set up renderer")?;
    let image = tracer.draw(settings.camera.view_matrix());

    image
        .to_rgba_image()
        .save(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    log::info!("Wrote {}", cli.output.display());

    Ok(())
}
