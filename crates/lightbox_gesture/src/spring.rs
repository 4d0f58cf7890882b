//! Spring physics for settling animations.
//!
//! Resetting the zoom, landing a double tap and snapping back an aborted
//! dismiss swipe all animate with a damped spring rather than a fixed-duration
//! curve, so an interrupted animation can hand its current value straight to
//! the next gesture.

use crate::config::{check, InvalidSetting};
use crate::constants::{
    SPRING_DAMPING, SPRING_MASS, SPRING_MAX_STEP_SECS, SPRING_REST_DISPLACEMENT,
    SPRING_REST_SPEED, SPRING_STIFFNESS,
};
use crate::transform::Transform;
use serde::{Deserialize, Serialize};

/// Parameters of a damped harmonic oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    #[serde(default = "default_stiffness")]
    pub stiffness: f32,
    #[serde(default = "default_damping")]
    pub damping: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// Stop as soon as the value crosses the target instead of oscillating around it
    #[serde(default)]
    pub overshoot_clamping: bool,
    #[serde(default = "default_rest_displacement")]
    pub rest_displacement_threshold: f32,
    #[serde(default = "default_rest_speed")]
    pub rest_speed_threshold: f32,
}

fn default_stiffness() -> f32 {
    SPRING_STIFFNESS
}

fn default_damping() -> f32 {
    SPRING_DAMPING
}

fn default_mass() -> f32 {
    SPRING_MASS
}

fn default_rest_displacement() -> f32 {
    SPRING_REST_DISPLACEMENT
}

fn default_rest_speed() -> f32 {
    SPRING_REST_SPEED
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: default_stiffness(),
            damping: default_damping(),
            mass: default_mass(),
            overshoot_clamping: false,
            rest_displacement_threshold: default_rest_displacement(),
            rest_speed_threshold: default_rest_speed(),
        }
    }
}

impl SpringConfig {
    /// Default spring that never overshoots its target.
    pub fn clamped() -> Self {
        Self {
            overshoot_clamping: true,
            ..Self::default()
        }
    }

    /// Check that the parameters describe a spring that settles; `name`
    /// prefixes the offending field in the error.
    pub fn validate(&self, name: &str) -> Result<(), InvalidSetting> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        check(positive(self.stiffness), format!("{name}.stiffness"), "must be a positive number")?;
        check(
            self.damping.is_finite() && self.damping >= 0.0,
            format!("{name}.damping"),
            "must not be negative",
        )?;
        check(positive(self.mass), format!("{name}.mass"), "must be a positive number")?;
        check(
            positive(self.rest_displacement_threshold),
            format!("{name}.rest_displacement_threshold"),
            "must be a positive number",
        )?;
        check(
            positive(self.rest_speed_threshold),
            format!("{name}.rest_speed_threshold"),
            "must be a positive number",
        )
    }

    /// Same dynamics with rest thresholds divided by `span`, for springs that
    /// drive a normalized `0..1` progress across a distance of `span` units.
    fn normalized(&self, span: f32) -> Self {
        let span = span.max(1.0);
        Self {
            rest_displacement_threshold: self.rest_displacement_threshold / span,
            rest_speed_threshold: self.rest_speed_threshold / span,
            ..*self
        }
    }
}

/// A scalar value moving toward a target under spring forces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    /// Sign of the initial displacement, used to detect overshoot
    direction: f32,
    at_rest: bool,
}

impl Spring {
    /// Start a spring at `from` heading to `to` with an initial `velocity`.
    pub fn new(from: f32, to: f32, velocity: f32, config: SpringConfig) -> Self {
        let at_rest = from == to && velocity == 0.0;
        Self {
            config,
            value: if at_rest { to } else { from },
            velocity,
            target: to,
            direction: (from - to).signum(),
            at_rest,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Advance by `dt` seconds. Returns `true` while the spring is still moving.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.at_rest {
            return false;
        }

        let mut remaining = dt.max(0.0);
        while remaining > 0.0 && !self.at_rest {
            let h = remaining.min(SPRING_MAX_STEP_SECS);
            remaining -= h;
            self.integrate(h);
        }
        !self.at_rest
    }

    fn integrate(&mut self, h: f32) {
        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;

        // Semi-implicit Euler
        let displacement = self.value - self.target;
        let acceleration = (-stiffness * displacement - damping * self.velocity) / mass;
        self.velocity += acceleration * h;
        self.value += self.velocity * h;

        let displacement = self.value - self.target;
        let overshot = self.direction != 0.0 && displacement.signum() == -self.direction;
        if self.config.overshoot_clamping && overshot {
            self.settle();
            return;
        }

        if displacement.abs() < self.config.rest_displacement_threshold
            && self.velocity.abs() < self.config.rest_speed_threshold
        {
            self.settle();
        }
    }

    fn settle(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
        self.at_rest = true;
    }
}

/// Spring animation between two transforms.
///
/// All three components follow the same normalized progress curve, which is
/// what independent springs with identical parameters and zero initial
/// velocity would do anyway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformAnimation {
    from: Transform,
    to: Transform,
    progress: Spring,
}

impl TransformAnimation {
    pub fn new(from: Transform, to: Transform, config: SpringConfig) -> Self {
        let span = (to.translate_x - from.translate_x)
            .abs()
            .max((to.translate_y - from.translate_y).abs());
        Self {
            from,
            to,
            progress: Spring::new(0.0, 1.0, 0.0, config.normalized(span)),
        }
    }

    /// The transform at the current point of the animation.
    pub fn current(&self) -> Transform {
        if self.progress.is_at_rest() {
            return self.to;
        }
        self.from.lerp(&self.to, self.progress.value())
    }

    pub fn target(&self) -> Transform {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.progress.is_at_rest()
    }

    /// Advance by `dt` seconds. Returns `true` while still animating.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.from == self.to {
            self.progress.settle();
        }
        self.progress.step(dt)
    }
}
