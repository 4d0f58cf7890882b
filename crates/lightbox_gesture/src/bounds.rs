//! Viewport geometry and bounds clamping.

use crate::transform::{Transform, Vector};
use serde::{Deserialize, Serialize};

/// The fixed on-screen rectangle hosting the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Extend the height by a system bar (status/navigation bar) the viewer draws under.
    pub fn with_system_bar(mut self, offset: f32) -> Self {
        self.height += offset.max(0.0);
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn center(&self) -> Vector {
        Vector::new(self.width / 2.0, self.height / 2.0)
    }

    /// Convert an absolute viewport position into a position relative to the centre.
    pub fn relative_to_center(&self, point: Vector) -> Vector {
        point - self.center()
    }
}

/// Natural (pixel) dimensions of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. Zero-height images report an aspect of 1.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Size of the displayed image at `scale`, where scale 1 fits the image to the viewport.
///
/// An image wider than the viewport (relative to aspect) fills the width,
/// otherwise it fills the height.
pub fn scaled_dimensions(image_aspect: f32, scale: f32, viewport: &Viewport) -> (f32, f32) {
    let is_landscape = image_aspect > viewport.aspect();
    if is_landscape {
        let width = scale * viewport.width;
        (width, width / image_aspect)
    } else {
        let height = scale * viewport.height;
        (height * image_aspect, height)
    }
}

/// Clamp a translation so the scaled image cannot leave the viewport.
///
/// The allowed pan distance on an axis is half of the overhang,
/// `max(0, (scaled_size - screen_size) / 2)`.
pub fn clamp_translation(value: f32, scaled_size: f32, screen_size: f32) -> f32 {
    let pan_distance = ((scaled_size - screen_size) / 2.0).max(0.0);
    value.clamp(-pan_distance, pan_distance)
}

/// Translation that must be added to `candidate` to bring it back within bounds.
pub fn extra_translation_to_stay_in_bounds(
    candidate: &Transform,
    image_aspect: f32,
    viewport: &Viewport,
) -> Vector {
    let (translate_x, translate_y, scale) = candidate.read();
    let (scaled_width, scaled_height) = scaled_dimensions(image_aspect, scale, viewport);
    let clamped_x = clamp_translation(translate_x, scaled_width, viewport.width);
    let clamped_y = clamp_translation(translate_y, scaled_height, viewport.height);
    Vector::new(clamped_x - translate_x, clamped_y - translate_y)
}

/// Largest committed scale before the image is magnified past
/// `max_original_zoom` times its native resolution.
///
/// Never below 1: an image narrower than the viewport simply cannot be zoomed.
pub fn max_committed_scale(image: &ImageSize, viewport: &Viewport, max_original_zoom: f32) -> f32 {
    let native = image.width as f32 / viewport.width * max_original_zoom;
    native.max(1.0)
}

/// Range `(min, max)` a pinch scale may take on top of `committed_scale`, such
/// that the cumulative scale stays in `[1, max_committed_scale]`.
///
/// The lower bound never exceeds the upper bound.
pub fn pinch_scale_range(committed_scale: f32, max_committed_scale: f32) -> (f32, f32) {
    let min = 1.0 / committed_scale;
    let max = (max_committed_scale / committed_scale).max(min);
    (min, max)
}
