//! Centralized constants for lightbox_gesture
//!
//! Tuning values for zoom limits, dismiss thresholds and animations.

// =============================================================================
// Zoom
// =============================================================================

/// Smallest zoom a double tap lands on, even when the image already fills the viewport
pub const MIN_DOUBLE_TAP_SCALE: f32 = 2.0;

/// How far past native resolution the image may be magnified before it gets blurry
pub const MAX_ORIGINAL_IMAGE_ZOOM: f32 = 2.0;

// =============================================================================
// Dismiss swipe
// =============================================================================

/// Vertical drag distance (pixels) past which releasing dismisses the viewer
pub const DISMISS_DISTANCE: f32 = 150.0;

/// Vertical fling velocity (pixels/second) past which releasing dismisses the viewer
pub const DISMISS_VELOCITY: f32 = 1000.0;

/// Backdrop opacity never fades below this while dragging
pub const MIN_BACKDROP_OPACITY: f32 = 0.2;

// =============================================================================
// Spring physics
// =============================================================================

pub const SPRING_STIFFNESS: f32 = 100.0;
pub const SPRING_DAMPING: f32 = 10.0;
pub const SPRING_MASS: f32 = 1.0;

/// Displacement from target below which a spring may come to rest
pub const SPRING_REST_DISPLACEMENT: f32 = 0.01;

/// Speed below which a spring may come to rest
pub const SPRING_REST_SPEED: f32 = 2.0;

/// Largest integration step; longer frames are split into sub-steps
pub const SPRING_MAX_STEP_SECS: f32 = 1.0 / 240.0;

/// Frames longer than this (e.g. after the app was backgrounded) are truncated
pub const MAX_FRAME_SECS: f32 = 0.1;
