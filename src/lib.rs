//! lightbox - gesture tooling for a zoomable image viewer
//!
//! Host-side support around the `lightbox_gesture` engine: viewer configuration,
//! image metadata lookup, and reproducible gesture scripts.

pub mod config;
pub mod constants;
pub mod error;
pub mod image_info;
pub mod script;

pub use config::{ConfigError, LogLevel, ViewerConfig};
pub use error::{Error, Result};
pub use script::{GestureScript, ReplayRecord, replay};

pub use lightbox_gesture as gesture;
