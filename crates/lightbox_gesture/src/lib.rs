//! lightbox_gesture - pinch, pan and tap handling for a zoomable image viewer
//!
//! This crate turns normalized gesture events (focal points, scale factors,
//! translations, taps) into a bounded affine transform for the displayed image.
//! It does not recognize touches itself and does not render anything: the host
//! feeds [`GestureEvent`]s into a [`TransformEngine`], draws the [`Frame`] it
//! reports, and reacts to the [`ViewerEvent`]s it raises.

mod arbiter;
mod bounds;
mod clock;
mod config;
pub mod constants;
mod engine;
mod event;
mod spring;
mod transform;
mod zoom_state;

pub use arbiter::{Activation, GestureArbiter, GestureGroup};
pub use bounds::{
    clamp_translation, extra_translation_to_stay_in_bounds, max_committed_scale,
    pinch_scale_range, scaled_dimensions, ImageSize, Viewport,
};
pub use clock::FrameClock;
pub use config::{GestureConfig, InvalidSetting};
pub use engine::{Frame, TransformEngine};
pub use event::{EventSink, GestureEvent, ViewerEvent};
pub use spring::{Spring, SpringConfig, TransformAnimation};
pub use transform::{Transform, Vector};
pub use zoom_state::{derive_is_zoomed, ZoomStateTracker};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bounds::{ImageSize, Viewport};
    pub use crate::config::GestureConfig;
    pub use crate::engine::{Frame, TransformEngine};
    pub use crate::event::{EventSink, GestureEvent, ViewerEvent};
    pub use crate::transform::{Transform, Vector};
}
