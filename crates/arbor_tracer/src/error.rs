//! Renderer errors.

use arbor_core::{SceneError, TextureError};
use thiserror::Error;

/// Errors that can occur while setting up a render.
///
/// Everything is checked before the first pixel; rendering itself never fails.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Field of view must be between 0 and 180 degrees, got {0}")]
    InvalidFov(f32),
}

/// Result type for render setup.
pub type RenderResult<T> = Result<T, RenderError>;
