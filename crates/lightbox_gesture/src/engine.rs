//! Per-image gesture state machine.
//!
//! The engine keeps a *committed* transform that persists between gestures and
//! a set of transient values that only live while a gesture is active (pan
//! translation, pinch scale/origin/translation). What the renderer draws is
//! always
//!
//! ```text
//! pan * pinch * committed
//! ```
//!
//! When a gesture ends its delta is folded into the committed transform,
//! rounded, and the transient values go back to neutral.

use crate::arbiter::{Activation, GestureArbiter, GestureGroup};
use crate::bounds::{self, ImageSize, Viewport};
use crate::config::GestureConfig;
use crate::constants::{MAX_FRAME_SECS, MIN_BACKDROP_OPACITY};
use crate::event::{EventSink, GestureEvent, ViewerEvent};
use crate::spring::{Spring, TransformAnimation};
use crate::transform::{Transform, Vector};
use crate::zoom_state::{derive_is_zoomed, ZoomStateTracker};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Values the rendering layer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    /// Backdrop opacity, fading while the image is dragged towards dismissal
    pub opacity: f32,
}

/// Gesture-to-transform engine for one displayed image.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    viewport: Viewport,
    config: GestureConfig,
    /// Natural image size, `None` until the host resolves it
    image: Option<ImageSize>,

    committed: Transform,
    animation: Option<TransformAnimation>,

    pan_translation: Vector,
    pan_active: bool,
    pinch_scale: f32,
    pinch_origin: Vector,
    pinch_translation: Vector,
    pinch_active: bool,

    dismiss_offset: f32,
    dismiss_active: bool,
    dismiss_spring: Option<Spring>,

    arbiter: GestureArbiter,
    zoom_state: ZoomStateTracker,
    pending: Vec<ViewerEvent>,
}

impl TransformEngine {
    /// Create an engine for a viewport; image dimensions are unknown until
    /// [`set_image_size`](Self::set_image_size) is called.
    pub fn new(viewport: Viewport, config: GestureConfig) -> Self {
        Self {
            viewport,
            config,
            image: None,
            committed: Transform::identity(),
            animation: None,
            pan_translation: Vector::ZERO,
            pan_active: false,
            pinch_scale: 1.0,
            pinch_origin: Vector::ZERO,
            pinch_translation: Vector::ZERO,
            pinch_active: false,
            dismiss_offset: 0.0,
            dismiss_active: false,
            dismiss_spring: None,
            arbiter: GestureArbiter::new(),
            zoom_state: ZoomStateTracker::new(),
            pending: Vec::new(),
        }
    }

    /// Builder-style variant of [`set_image_size`](Self::set_image_size).
    pub fn with_image_size(mut self, image: ImageSize) -> Self {
        self.set_image_size(Some(image));
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        self.image
    }

    /// Record the natural size of the current image once its metadata resolves.
    /// Empty sizes are treated as unknown.
    pub fn set_image_size(&mut self, image: Option<ImageSize>) {
        self.image = image.filter(|size| !size.is_empty());
    }

    /// Switch to a different image: everything goes back to identity.
    pub fn show_image(&mut self, image: Option<ImageSize>) {
        log::debug!("Showing new image {:?}", image);
        self.set_image_size(image);
        self.committed = Transform::identity();
        self.animation = None;
        self.reset_pan();
        self.reset_pinch();
        self.pan_active = false;
        self.pinch_active = false;
        self.dismiss_offset = 0.0;
        self.dismiss_active = false;
        self.dismiss_spring = None;
        let paging = self.arbiter.is_paging();
        self.arbiter = GestureArbiter::new();
        self.arbiter.set_paging(paging);
        self.sync_zoom_state();
    }

    /// Lock out every gesture while the surrounding pager is mid-swipe.
    ///
    /// Gestures in progress end as if the fingers were lifted.
    pub fn set_paging(&mut self, paging: bool) {
        if paging == self.arbiter.is_paging() {
            return;
        }
        if paging {
            self.end_pinch();
            self.end_pan();
            self.end_dismiss(0.0);
        }
        self.arbiter.set_paging(paging);
        self.sync_zoom_state();
    }

    pub fn is_paging(&self) -> bool {
        self.arbiter.is_paging()
    }

    /// The persisted transform (its current animated value while settling).
    pub fn committed(&self) -> Transform {
        self.committed
    }

    pub fn pinch_scale(&self) -> f32 {
        self.pinch_scale
    }

    pub fn pan_translation(&self) -> Vector {
        self.pan_translation
    }

    pub fn pinch_translation(&self) -> Vector {
        self.pinch_translation
    }

    pub fn dismiss_offset(&self) -> f32 {
        self.dismiss_offset
    }

    /// Whether the image is currently zoomed (by a live pinch or the committed state).
    pub fn is_zoomed(&self) -> bool {
        derive_is_zoomed(self.pinch_scale, self.committed.scale)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || self.dismiss_spring.is_some()
    }

    /// The transform currently drawn: `pan * pinch * committed`.
    pub fn render_transform(&self) -> Transform {
        Transform::identity()
            .prepend_pan(self.pan_translation)
            .prepend_pinch(self.pinch_scale, self.pinch_origin, self.pinch_translation)
            .prepend_transform(&self.committed)
    }

    /// Everything the renderer needs for the current frame.
    pub fn frame(&self) -> Frame {
        let (translate_x, translate_y, scale) = self.render_transform().read();
        let fade = self.dismiss_offset.abs() / self.viewport.height;
        Frame {
            translate_x,
            translate_y: translate_y + self.dismiss_offset,
            scale,
            opacity: (1.0 - fade).clamp(MIN_BACKDROP_OPACITY, 1.0),
        }
    }

    /// Translation to add to `candidate` so the image stays within the viewport.
    /// Zero while the image size is unknown.
    pub fn extra_translation_to_stay_in_bounds(&self, candidate: &Transform) -> Vector {
        match self.image {
            Some(image) => {
                bounds::extra_translation_to_stay_in_bounds(candidate, image.aspect(), &self.viewport)
            }
            None => Vector::ZERO,
        }
    }

    /// Feed one gesture event from the host's recognizer.
    pub fn handle(&mut self, event: GestureEvent) {
        if self.arbiter.is_paging() {
            log::trace!("Ignoring {:?} while paging", event);
            return;
        }

        match event {
            GestureEvent::PinchStart { focal } => self.start_pinch(focal),
            GestureEvent::PinchChange { scale } => self.change_pinch(scale),
            GestureEvent::PinchEnd => self.end_pinch(),
            GestureEvent::PanChange {
                translation,
                pointers,
            } => self.change_pan(translation, pointers),
            GestureEvent::PanEnd => self.end_pan(),
            GestureEvent::DismissChange { translation_y } => self.change_dismiss(translation_y),
            GestureEvent::DismissEnd { velocity_y } => self.end_dismiss(velocity_y),
            GestureEvent::Tap { position, count } => self.tap(position, count),
        }

        self.sync_zoom_state();
    }

    /// Advance running animations by `dt`. Returns `true` while something still moves.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let dt = dt.as_secs_f32().min(MAX_FRAME_SECS);

        if let Some(animation) = self.animation.as_mut() {
            let running = animation.step(dt);
            self.committed = animation.current();
            if !running {
                log::trace!("Transform animation settled at {:?}", self.committed);
                self.animation = None;
            }
        }

        if let Some(spring) = self.dismiss_spring.as_mut() {
            let running = spring.step(dt);
            self.dismiss_offset = spring.value();
            if !running {
                self.dismiss_spring = None;
            }
        }

        self.sync_zoom_state();
        self.is_animating()
    }

    /// Jump every running animation to its end state.
    pub fn finish_animations(&mut self) {
        if let Some(animation) = self.animation.take() {
            self.committed = animation.target();
        }
        if let Some(spring) = self.dismiss_spring.take() {
            self.dismiss_offset = spring.target();
        }
        self.sync_zoom_state();
    }

    /// Take the notifications raised since the last call.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Forward pending notifications to `sink`.
    pub fn dispatch<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        for event in self.pending.drain(..) {
            sink.emit(event);
        }
    }

    // -------------------------------------------------------------------------
    // Pinch
    // -------------------------------------------------------------------------

    fn start_pinch(&mut self, focal: Vector) {
        if !self.activate_transform() {
            return;
        }
        self.pinch_active = true;
        self.pinch_origin = self.viewport.relative_to_center(focal);
    }

    fn change_pinch(&mut self, scale: f32) {
        if !self.pinch_active {
            return;
        }
        let Some(image) = self.image else {
            return;
        };

        // Cumulative scale stays within [1, max]: no zooming out past 1:1 and no
        // magnifying so far that the picture gets blurry.
        let max_committed =
            bounds::max_committed_scale(&image, &self.viewport, self.config.max_original_image_zoom);
        let (min_pinch, max_pinch) = bounds::pinch_scale_range(self.committed.scale, max_committed);
        let next_scale = scale.clamp(min_pinch, max_pinch);
        self.pinch_scale = next_scale;

        // Zooming out near an edge would leave the image out of bounds; fold the
        // correction into the pinch translation as we go.
        let candidate = Transform::identity()
            .prepend_pan(self.pan_translation)
            .prepend_pinch(next_scale, self.pinch_origin, self.pinch_translation)
            .prepend_transform(&self.committed);
        let extra = self.extra_translation_to_stay_in_bounds(&candidate);
        if !extra.is_zero() {
            self.pinch_translation = self.pinch_translation + extra;
        }
        log::trace!(
            "Pinch scale {} (requested {}), translation {:?}",
            next_scale,
            scale,
            self.pinch_translation
        );
    }

    fn end_pinch(&mut self) {
        if !self.pinch_active {
            return;
        }
        let t = Transform::identity()
            .prepend_pinch(self.pinch_scale, self.pinch_origin, self.pinch_translation)
            .prepend_transform(&self.committed);
        self.commit(t);
        log::debug!("Committed pinch: {:?}", self.committed);

        self.reset_pinch();
        self.pinch_active = false;
        if !self.pan_active {
            self.arbiter.release(GestureGroup::Transform);
        }
    }

    fn reset_pinch(&mut self) {
        self.pinch_scale = 1.0;
        self.pinch_origin = Vector::ZERO;
        self.pinch_translation = Vector::ZERO;
    }

    // -------------------------------------------------------------------------
    // Pan
    // -------------------------------------------------------------------------

    /// Pointers needed before a pan activates. A zoomed image pans with one
    /// finger; otherwise two are needed, which lets a pinch continue as a pan.
    pub fn pan_min_pointers(&self) -> u32 {
        if self.is_zoomed() {
            1
        } else {
            2
        }
    }

    fn change_pan(&mut self, translation: Vector, pointers: u32) {
        if !self.pan_active {
            if pointers < self.pan_min_pointers() || !self.activate_transform() {
                return;
            }
            self.pan_active = true;
        }
        if self.image.is_none() {
            return;
        }

        let candidate = Transform::identity()
            .prepend_pan(translation)
            .prepend_pinch(self.pinch_scale, self.pinch_origin, self.pinch_translation)
            .prepend_transform(&self.committed);
        let extra = self.extra_translation_to_stay_in_bounds(&candidate);
        self.pan_translation = translation + extra;
        log::trace!("Pan translation {:?}", self.pan_translation);
    }

    fn end_pan(&mut self) {
        if !self.pan_active {
            return;
        }
        let t = Transform::identity()
            .prepend_pan(self.pan_translation)
            .prepend_transform(&self.committed);
        self.commit(t);
        log::debug!("Committed pan: {:?}", self.committed);

        self.reset_pan();
        self.pan_active = false;
        if !self.pinch_active {
            self.arbiter.release(GestureGroup::Transform);
        }
    }

    fn reset_pan(&mut self) {
        self.pan_translation = Vector::ZERO;
    }

    fn activate_transform(&mut self) -> bool {
        if !self.arbiter.try_activate(GestureGroup::Transform).is_granted() {
            return false;
        }
        // A new gesture takes over from any settling animation at its current value.
        self.animation = None;
        true
    }

    // -------------------------------------------------------------------------
    // Dismiss swipe
    // -------------------------------------------------------------------------

    fn change_dismiss(&mut self, translation_y: f32) {
        if !self.dismiss_active {
            if self.is_zoomed() {
                return;
            }
            match self.arbiter.try_activate(GestureGroup::DismissSwipe) {
                Activation::Rejected => return,
                Activation::Preempted(previous) => {
                    // Finish the transform as if its fingers lifted so its
                    // bounds corrections land in the committed state.
                    log::debug!("Dismiss swipe took over from {:?}", previous);
                    self.end_pinch();
                    self.end_pan();
                }
                Activation::Granted => {}
            }
            self.dismiss_active = true;
            self.dismiss_spring = None;
        }
        self.dismiss_offset = translation_y;
    }

    fn end_dismiss(&mut self, velocity_y: f32) {
        if !self.dismiss_active {
            return;
        }
        self.dismiss_active = false;
        self.arbiter.release(GestureGroup::DismissSwipe);

        let far_enough = self.dismiss_offset.abs() > self.config.dismiss_distance;
        let fast_enough = velocity_y.abs() > self.config.dismiss_velocity;
        if far_enough || fast_enough {
            log::debug!(
                "Dismissing at offset {} with velocity {}",
                self.dismiss_offset,
                velocity_y
            );
            self.pending.push(ViewerEvent::Dismiss);
            return;
        }

        let spring = Spring::new(self.dismiss_offset, 0.0, velocity_y, self.config.dismiss_spring);
        self.dismiss_spring = (!spring.is_at_rest()).then_some(spring);
    }

    // -------------------------------------------------------------------------
    // Taps
    // -------------------------------------------------------------------------

    fn tap(&mut self, position: Vector, count: u32) {
        let candidates: &[GestureGroup] = match count {
            0 => return,
            1 => &[GestureGroup::SingleTap],
            _ => &[GestureGroup::DoubleTap, GestureGroup::SingleTap],
        };
        let Some(group) = self.arbiter.resolve(candidates) else {
            return;
        };
        if !self.arbiter.try_activate(group).is_granted() {
            return;
        }

        match group {
            GestureGroup::DoubleTap => self.double_tap(position),
            _ => self.single_tap(),
        }
    }

    fn double_tap(&mut self, position: Vector) {
        let Some(image) = self.image else {
            return;
        };

        if self.committed.scale != 1.0 {
            // Back to 1:1.
            self.animate_to(Transform::identity());
            return;
        }

        // Zoom in far enough to get rid of the black bars, whatever the orientation.
        let screen_aspect = self.viewport.aspect();
        let image_aspect = image.aspect();
        let candidate_scale = (image_aspect / screen_aspect)
            .max(screen_aspect / image_aspect)
            .max(self.config.min_double_tap_scale);
        let max_scale =
            bounds::max_committed_scale(&image, &self.viewport, self.config.max_original_image_zoom);
        let scale = candidate_scale.min(max_scale);

        // Pinch into the tapped point, then shift back by however far that
        // would leave the image out of bounds.
        let origin = self.viewport.relative_to_center(position);
        let candidate = Transform::identity().prepend_pinch(scale, origin, Vector::ZERO);
        let extra = self.extra_translation_to_stay_in_bounds(&candidate);
        let target = Transform::identity().prepend_pinch(scale, origin, extra);
        log::debug!("Double tap zooming to {:?}", target);
        self.animate_to(target);
    }

    fn single_tap(&mut self) {
        if self.committed.scale != 1.0 {
            self.animate_to(Transform::identity());
        }
        self.pending.push(ViewerEvent::Tap);
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn animate_to(&mut self, target: Transform) {
        let animation = TransformAnimation::new(self.committed, target, self.config.reset_spring);
        self.animation = (self.committed != target).then_some(animation);
    }

    /// Store a finished gesture's transform as the committed state.
    ///
    /// Rounding can leave the scale a hair under 1 after pinching all the way
    /// out; anything under 1 snaps to identity, where the image fits the
    /// viewport and no translation is allowed.
    ///
    /// While the other half of a pinch-and-pan is still live, its translation
    /// offsets the bounds correction folded into `t`, so the result is only
    /// clamped once the last of the two ends.
    fn commit(&mut self, t: Transform) {
        let rounded = t.rounded();
        if rounded.scale < 1.0 {
            self.committed = Transform::identity();
            return;
        }
        if self.pinch_active && self.pan_active {
            self.committed = rounded;
            return;
        }

        let extra = self.extra_translation_to_stay_in_bounds(&rounded);
        self.committed = if extra.is_zero() {
            rounded
        } else {
            // Bounds are symmetric around zero, so truncating keeps whole pixels inside.
            Transform::new(
                (rounded.translate_x + extra.x).trunc(),
                (rounded.translate_y + extra.y).trunc(),
                rounded.scale,
            )
        };
    }

    fn sync_zoom_state(&mut self) {
        if let Some(zoomed) = self.zoom_state.update(self.is_zoomed()) {
            log::debug!("Zoom state changed: {}", zoomed);
            self.pending.push(ViewerEvent::ZoomStateChanged(zoomed));
        }
    }
}
