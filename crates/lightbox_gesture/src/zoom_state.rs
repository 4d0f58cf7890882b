//! Edge detection for the "is zoomed" flag.

/// Remembers the last reported zoom state and reports only flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoomStateTracker {
    zoomed: bool,
}

impl ZoomStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reported state.
    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    /// Feed the freshly derived state. Returns `Some(state)` only when it differs
    /// from the previously reported one.
    pub fn update(&mut self, zoomed: bool) -> Option<bool> {
        if zoomed == self.zoomed {
            return None;
        }
        self.zoomed = zoomed;
        Some(zoomed)
    }
}

/// Zoomed while either the live pinch or the committed transform is scaled.
pub fn derive_is_zoomed(pinch_scale: f32, committed_scale: f32) -> bool {
    pinch_scale != 1.0 || committed_scale != 1.0
}
