//! Affine transform mathematics for the image viewer.
//!
//! A [`Transform`] is a uniform scale followed by a translation, which is all a
//! zoomable image needs. It behaves like the 3x3 matrix
//!
//! ```text
//! | scale   0     translate_x |
//! |   0   scale   translate_y |
//! |   0     0          1      |
//! ```
//!
//! and every `prepend_*` operation right-multiplies a delta onto it, so the
//! delta is applied to a point *before* the existing transform. Building
//! `identity -> prepend_pan -> prepend_pinch -> prepend_transform(committed)`
//! therefore maps a point through the committed state first, then the pinch,
//! then the pan (which happens in screen space).

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D vector or point, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    /// Create a new vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(f32, f32)> for Vector {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Uniform-scale + translation transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Transform {
    /// Create a transform from its components.
    pub const fn new(translate_x: f32, translate_y: f32, scale: f32) -> Self {
        Self {
            translate_x,
            translate_y,
            scale,
        }
    }

    /// The neutral transform: no translation, scale 1.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Extract `(translate_x, translate_y, scale)` for the rendering layer.
    pub fn read(&self) -> (f32, f32, f32) {
        (self.translate_x, self.translate_y, self.scale)
    }

    pub fn translation(&self) -> Vector {
        Vector::new(self.translate_x, self.translate_y)
    }

    /// Map a point through this transform.
    pub fn apply(&self, point: Vector) -> Vector {
        Vector::new(
            self.scale * point.x + self.translate_x,
            self.scale * point.y + self.translate_y,
        )
    }

    /// Right-multiply a translation: `self * Translate(x, y)`.
    pub fn prepend_translate(&self, x: f32, y: f32) -> Transform {
        Transform::new(
            self.translate_x + self.scale * x,
            self.translate_y + self.scale * y,
            self.scale,
        )
    }

    /// Right-multiply a uniform scale: `self * Scale(value)`.
    pub fn prepend_scale(&self, value: f32) -> Transform {
        Transform::new(self.translate_x, self.translate_y, self.scale * value)
    }

    /// Compose a screen-space pan in front of this transform.
    pub fn prepend_pan(&self, pan: Vector) -> Transform {
        self.prepend_translate(pan.x, pan.y)
    }

    /// Compose a pinch in front of this transform.
    ///
    /// The pinch scales about `origin` (relative to the viewport centre) and then
    /// shifts by `translation`:
    /// `self * Translate(translation) * Translate(origin) * Scale(scale) * Translate(-origin)`.
    pub fn prepend_pinch(&self, scale: f32, origin: Vector, translation: Vector) -> Transform {
        self.prepend_translate(translation.x, translation.y)
            .prepend_translate(origin.x, origin.y)
            .prepend_scale(scale)
            .prepend_translate(-origin.x, -origin.y)
    }

    /// Matrix product `self * other`; `other` is applied to points first.
    pub fn prepend_transform(&self, other: &Transform) -> Transform {
        Transform::new(
            self.translate_x + self.scale * other.translate_x,
            self.translate_y + self.scale * other.translate_y,
            self.scale * other.scale,
        )
    }

    /// Snap translation to whole pixels and scale to three decimals so repeated
    /// commits do not accumulate sub-pixel drift.
    pub fn rounded(&self) -> Transform {
        Transform::new(
            self.translate_x.round(),
            self.translate_y.round(),
            (self.scale * 1e3).round() / 1e3,
        )
    }

    /// Component-wise linear interpolation; `t = 0` yields `self`, `t = 1` yields `to`.
    pub fn lerp(&self, to: &Transform, t: f32) -> Transform {
        Transform::new(
            self.translate_x + (to.translate_x - self.translate_x) * t,
            self.translate_y + (to.translate_y - self.translate_y) * t,
            self.scale + (to.scale - self.scale) * t,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn transform_approx_eq(a: &Transform, b: &Transform) -> bool {
        approx_eq(a.translate_x, b.translate_x)
            && approx_eq(a.translate_y, b.translate_y)
            && approx_eq(a.scale, b.scale)
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform::identity();
        assert_eq!(t.read(), (0.0, 0.0, 1.0));
        assert_eq!(Transform::default(), t);
    }

    #[test]
    fn test_identity_is_neutral_on_both_sides() {
        let samples = [
            Transform::new(12.0, -40.0, 2.5),
            Transform::new(-300.0, 0.5, 1.0),
            Transform::new(0.0, 0.0, 7.25),
        ];
        for t in samples {
            assert_eq!(Transform::identity().prepend_transform(&t), t);
            assert_eq!(t.prepend_transform(&Transform::identity()), t);
        }
    }

    #[test]
    fn test_pinch_about_centre_adds_no_translation() {
        for scale in [1.0, 1.5, 2.0, 3.75, 10.0] {
            let t = Transform::identity().prepend_pinch(scale, Vector::ZERO, Vector::ZERO);
            let (tx, ty, s) = t.read();
            assert_eq!(tx, 0.0);
            assert_eq!(ty, 0.0);
            assert!(approx_eq(s, scale));
        }
    }

    #[test]
    fn test_pinch_keeps_origin_fixed() {
        let origin = Vector::new(120.0, -80.0);
        let t = Transform::identity().prepend_pinch(2.0, origin, Vector::ZERO);
        let mapped = t.apply(origin);
        assert!(approx_eq(mapped.x, origin.x));
        assert!(approx_eq(mapped.y, origin.y));
        // Scaling about (120, -80) by 2 moves the origin of the image by -origin.
        assert_eq!(t.read(), (-120.0, 80.0, 2.0));
    }

    #[test]
    fn test_pinch_translation_is_screen_space() {
        let committed = Transform::new(0.0, 0.0, 2.0);
        let t = Transform::identity()
            .prepend_pinch(1.0, Vector::ZERO, Vector::new(10.0, 5.0))
            .prepend_transform(&committed);
        assert_eq!(t.read(), (10.0, 5.0, 2.0));
    }

    #[test]
    fn test_pan_happens_after_scale() {
        let committed = Transform::new(0.0, 0.0, 3.0);
        let t = Transform::identity()
            .prepend_pan(Vector::new(30.0, -15.0))
            .prepend_transform(&committed);
        // Pan is not multiplied by the committed scale.
        assert_eq!(t.read(), (30.0, -15.0, 3.0));
    }

    #[test]
    fn test_composition_order_matters() {
        let a = Transform::new(10.0, 0.0, 2.0);
        let b = Transform::new(0.0, 20.0, 3.0);
        let ab = a.prepend_transform(&b);
        let ba = b.prepend_transform(&a);
        assert_eq!(ab.read(), (10.0, 40.0, 6.0));
        assert_eq!(ba.read(), (30.0, 20.0, 6.0));
    }

    #[test]
    fn test_composition_matches_point_mapping() {
        let a = Transform::new(10.0, -3.0, 2.0);
        let b = Transform::new(-7.0, 20.0, 1.5);
        let p = Vector::new(4.0, 9.0);
        let direct = a.apply(b.apply(p));
        let composed = a.prepend_transform(&b).apply(p);
        assert!(approx_eq(direct.x, composed.x));
        assert!(approx_eq(direct.y, composed.y));
    }

    #[test]
    fn test_rounding() {
        let t = Transform::new(10.4, -3.6, 1.23456).rounded();
        assert_eq!(t.translate_x, 10.0);
        assert_eq!(t.translate_y, -4.0);
        assert!(approx_eq(t.scale, 1.235));
    }

    #[test]
    fn test_rounding_snaps_near_one() {
        let t = Transform::new(0.2, 0.0, 0.99996).rounded();
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.translate_x, 0.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let from = Transform::new(100.0, -50.0, 3.0);
        let to = Transform::identity();
        assert!(transform_approx_eq(&from.lerp(&to, 0.0), &from));
        assert!(transform_approx_eq(&from.lerp(&to, 1.0), &to));
        assert!(transform_approx_eq(
            &from.lerp(&to, 0.5),
            &Transform::new(50.0, -25.0, 2.0)
        ));
    }
}
