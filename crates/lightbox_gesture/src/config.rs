//! Tunable gesture parameters.

use crate::constants::{
    DISMISS_DISTANCE, DISMISS_VELOCITY, MAX_ORIGINAL_IMAGE_ZOOM, MIN_DOUBLE_TAP_SCALE,
};
use crate::spring::SpringConfig;
use serde::{Deserialize, Serialize};

/// Parameters of the [`TransformEngine`](crate::TransformEngine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Smallest scale a double tap zooms to
    #[serde(default = "default_min_double_tap_scale")]
    pub min_double_tap_scale: f32,

    /// Maximum magnification relative to the image's native resolution
    #[serde(default = "default_max_original_image_zoom")]
    pub max_original_image_zoom: f32,

    /// Drag distance (pixels) that dismisses the viewer on release
    #[serde(default = "default_dismiss_distance")]
    pub dismiss_distance: f32,

    /// Fling velocity (pixels/second) that dismisses the viewer on release
    #[serde(default = "default_dismiss_velocity")]
    pub dismiss_velocity: f32,

    /// Spring used for resets and double-tap zoom
    #[serde(default = "SpringConfig::clamped")]
    pub reset_spring: SpringConfig,

    /// Spring used to snap back an aborted dismiss swipe
    #[serde(default)]
    pub dismiss_spring: SpringConfig,
}

fn default_min_double_tap_scale() -> f32 {
    MIN_DOUBLE_TAP_SCALE
}

fn default_max_original_image_zoom() -> f32 {
    MAX_ORIGINAL_IMAGE_ZOOM
}

fn default_dismiss_distance() -> f32 {
    DISMISS_DISTANCE
}

fn default_dismiss_velocity() -> f32 {
    DISMISS_VELOCITY
}

/// A gesture setting outside the range the engine can work with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("gesture setting `{field}` {problem}")]
pub struct InvalidSetting {
    pub field: String,
    pub problem: &'static str,
}

impl InvalidSetting {
    pub(crate) fn new(field: impl Into<String>, problem: &'static str) -> Self {
        Self {
            field: field.into(),
            problem,
        }
    }
}

/// `Ok` when `valid`, otherwise an [`InvalidSetting`] for `field`.
pub(crate) fn check(
    valid: bool,
    field: impl Into<String>,
    problem: &'static str,
) -> Result<(), InvalidSetting> {
    if valid {
        Ok(())
    } else {
        Err(InvalidSetting::new(field, problem))
    }
}

impl GestureConfig {
    /// Reject settings that would make the engine misbehave: NaN springs,
    /// zero thresholds, or a reset spring allowed to zoom out past 1:1.
    pub fn validate(&self) -> Result<(), InvalidSetting> {
        check(
            self.min_double_tap_scale.is_finite() && self.min_double_tap_scale >= 1.0,
            "min_double_tap_scale",
            "must be at least 1",
        )?;
        check(
            self.max_original_image_zoom.is_finite() && self.max_original_image_zoom > 0.0,
            "max_original_image_zoom",
            "must be a positive number",
        )?;
        check(
            self.dismiss_distance.is_finite() && self.dismiss_distance >= 0.0,
            "dismiss_distance",
            "must not be negative",
        )?;
        check(
            self.dismiss_velocity.is_finite() && self.dismiss_velocity >= 0.0,
            "dismiss_velocity",
            "must not be negative",
        )?;

        self.reset_spring.validate("reset_spring")?;
        check(
            self.reset_spring.overshoot_clamping,
            "reset_spring.overshoot_clamping",
            "must be true, an overshooting reset would shrink the image below 1:1",
        )?;
        self.dismiss_spring.validate("dismiss_spring")
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_double_tap_scale: default_min_double_tap_scale(),
            max_original_image_zoom: default_max_original_image_zoom(),
            dismiss_distance: default_dismiss_distance(),
            dismiss_velocity: default_dismiss_velocity(),
            reset_spring: SpringConfig::clamped(),
            dismiss_spring: SpringConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let config: GestureConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GestureConfig::default());
        assert!(config.reset_spring.overshoot_clamping);
        assert!(!config.dismiss_spring.overshoot_clamping);
    }

    #[test]
    fn test_partial_override() {
        let config: GestureConfig =
            serde_json::from_str(r#"{ "min_double_tap_scale": 3.0 }"#).unwrap();
        assert_eq!(config.min_double_tap_scale, 3.0);
        assert_eq!(config.max_original_image_zoom, MAX_ORIGINAL_IMAGE_ZOOM);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GestureConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_massless_spring_is_rejected() {
        let config: GestureConfig =
            serde_json::from_str(r#"{ "dismiss_spring": { "mass": 0 } }"#).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "dismiss_spring.mass");
    }

    #[test]
    fn test_reset_spring_must_clamp_overshoot() {
        let config: GestureConfig =
            serde_json::from_str(r#"{ "reset_spring": { "overshoot_clamping": false } }"#).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "reset_spring.overshoot_clamping");
    }

    #[test]
    fn test_double_tap_scale_below_one_is_rejected() {
        let config = GestureConfig {
            min_double_tap_scale: 0.5,
            ..GestureConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "min_double_tap_scale");
    }
}
