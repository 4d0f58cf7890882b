//! Gesture scripts.
//!
//! A script describes a viewport, an image and a sequence of gesture events
//! and timing steps. Replaying it through a [`TransformEngine`] yields the
//! frames a renderer would have drawn plus the notifications the host would
//! have received, which makes gesture behaviour reproducible outside a device.
//!
//! ```json
//! {
//!   "viewport": { "width": 1080, "height": 2340 },
//!   "image": { "width": 4032, "height": 3024 },
//!   "steps": [
//!     { "type": "tap", "position": { "x": 540, "y": 1170 }, "count": 2 },
//!     { "type": "settle" }
//!   ]
//! }
//! ```
//!
//! [`TransformEngine`]: lightbox_gesture::TransformEngine

mod replay;

#[cfg(test)]
mod tests;

pub use replay::{ReplayRecord, replay};

use crate::constants::MAX_TICK_MS;
use crate::error::{Error, Result};
use crate::image_info;
use lightbox_gesture::{GestureEvent, ImageSize};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A complete gesture script.
#[derive(Debug, Clone, Serialize)]
pub struct GestureScript {
    pub viewport: ScriptViewport,

    /// Image shown when the script starts; gestures stay inert without one
    #[serde(default)]
    pub image: Option<ImageSource>,

    /// Start with the pager mid-swipe
    #[serde(default)]
    pub paging: bool,

    pub steps: Vec<Step>,
}

/// Viewport description. `system_bar` overrides the configured offset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScriptViewport {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub system_bar: Option<f32>,
}

/// Where the image dimensions come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    /// Dimensions given inline
    Size(ImageSize),
    /// Dimensions read from an image file, relative to the script's directory
    File { path: PathBuf },
}

impl ImageSource {
    /// Resolve to a size, reading file headers relative to `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> Result<ImageSize> {
        match self {
            ImageSource::Size(size) if size.is_empty() => Err(Error::invalid_script(format!(
                "image size {}x{} has no pixels",
                size.width, size.height
            ))),
            ImageSource::Size(size) => Ok(*size),
            ImageSource::File { path } => image_info::image_size(&base_dir.join(path)),
        }
    }
}

/// One script step: either a gesture event or a control instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Step {
    Gesture(GestureEvent),
    Control(ControlStep),
}

/// `type` tags handled by [`ControlStep`]; everything else is a gesture.
const CONTROL_TYPES: &[&str] = &["tick", "settle", "paging", "show_image", "resolve_image"];

impl Step {
    fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        let is_control = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|tag| CONTROL_TYPES.contains(&tag));
        if is_control {
            serde_json::from_value(value).map(Step::Control)
        } else {
            serde_json::from_value(value).map(Step::Gesture)
        }
    }
}

/// Instructions that drive time and lifecycle rather than gestures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlStep {
    /// Let `ms` milliseconds of animation time pass
    Tick { ms: u64 },
    /// Run animations until they come to rest
    Settle,
    /// Enter or leave the paging lock-out
    Paging { enabled: bool },
    /// Switch to another image (unknown size when omitted)
    ShowImage {
        #[serde(default)]
        image: Option<ImageSource>,
    },
    /// The current image's metadata finished loading
    ResolveImage { image: ImageSource },
}

/// On-disk layout, with steps kept raw so errors can name the broken one.
#[derive(Deserialize)]
struct ScriptFile {
    viewport: ScriptViewport,
    #[serde(default)]
    image: Option<ImageSource>,
    #[serde(default)]
    paging: bool,
    steps: Vec<serde_json::Value>,
}

impl GestureScript {
    /// Parse and validate a script from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ScriptFile = serde_json::from_str(json)?;
        let steps = file
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Step::from_value(value)
                    .map_err(|e| Error::invalid_script(format!("step {}: {}", index + 1, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let script = Self {
            viewport: file.viewport,
            image: file.image,
            paging: file.paging,
            steps,
        };
        script.validate()?;
        Ok(script)
    }

    /// Load a script from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let script = Self::from_json(&json)?;
        log::info!("Loaded script {:?} with {} steps", path, script.steps.len());
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        let ScriptViewport {
            width,
            height,
            system_bar,
        } = self.viewport;
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(width) || !positive(height) {
            return Err(Error::invalid_script(format!(
                "viewport must have a positive size, got {}x{}",
                width, height
            )));
        }
        if let Some(bar) = system_bar {
            if !bar.is_finite() || bar < 0.0 {
                return Err(Error::invalid_script(format!(
                    "system bar offset must be non-negative, got {}",
                    bar
                )));
            }
        }
        let oversized_tick = self.steps.iter().enumerate().find_map(|(index, step)| match step {
            Step::Control(ControlStep::Tick { ms }) if *ms > MAX_TICK_MS => Some((index, *ms)),
            _ => None,
        });
        if let Some((index, ms)) = oversized_tick {
            return Err(Error::invalid_script(format!(
                "step {}: tick of {} ms exceeds the {} ms limit",
                index + 1,
                ms,
                MAX_TICK_MS
            )));
        }
        Ok(())
    }
}
