//! Error types for the host-side tooling.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading inputs for the viewer.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Gesture script is not valid JSON or does not match the format
    #[error("Script parse error: {0}")]
    Script(#[from] serde_json::Error),

    /// Image metadata could not be read
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Image file reports zero width or height
    #[error("Image has no pixels: {path:?}")]
    EmptyImage {
        /// Path of the offending image
        path: PathBuf,
    },

    /// Script parsed but describes something the engine cannot run
    #[error("Invalid script: {message}")]
    InvalidScript {
        /// Description of the problem
        message: String,
    },
}

impl Error {
    /// Create an invalid script error with a message.
    pub fn invalid_script(message: impl Into<String>) -> Self {
        Self::InvalidScript {
            message: message.into(),
        }
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
