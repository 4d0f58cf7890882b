//! Exclusive composition of the viewer's gestures.
//!
//! Only one gesture group drives the image at a time. Pinch and pan share a
//! group so they run simultaneously (a pinch can turn into a pan midway).
//! Groups are ordered by priority: a higher-priority group may take over from
//! a lower one, never the other way around. While the surrounding pager is
//! mid-swipe nothing is recognized at all.

use serde::{Deserialize, Serialize};

/// Gesture groups, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureGroup {
    DismissSwipe,
    /// Pinch and pan, recognized simultaneously
    Transform,
    DoubleTap,
    SingleTap,
}

impl GestureGroup {
    /// Lower values win.
    pub fn priority(&self) -> u8 {
        match self {
            GestureGroup::DismissSwipe => 0,
            GestureGroup::Transform => 1,
            GestureGroup::DoubleTap => 2,
            GestureGroup::SingleTap => 3,
        }
    }

    /// Discrete gestures complete instantly and never hold the arbiter.
    pub fn is_discrete(&self) -> bool {
        matches!(self, GestureGroup::DoubleTap | GestureGroup::SingleTap)
    }
}

/// Outcome of asking to activate a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The group may proceed
    Granted,
    /// The group may proceed and took over from a lower-priority group
    Preempted(GestureGroup),
    /// The group must ignore this input
    Rejected,
}

impl Activation {
    pub fn is_granted(&self) -> bool {
        !matches!(self, Activation::Rejected)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureArbiter {
    active: Option<GestureGroup>,
    paging: bool,
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<GestureGroup> {
        self.active
    }

    pub fn is_paging(&self) -> bool {
        self.paging
    }

    /// Enable or disable the paging lock-out. Entering it drops any active group.
    pub fn set_paging(&mut self, paging: bool) {
        self.paging = paging;
        if paging {
            self.active = None;
        }
    }

    /// Request that `group` handles the current input.
    pub fn try_activate(&mut self, group: GestureGroup) -> Activation {
        if self.paging {
            return Activation::Rejected;
        }

        let activation = match self.active {
            None => Activation::Granted,
            Some(active) if active == group => return Activation::Granted,
            Some(active) if group.priority() < active.priority() => Activation::Preempted(active),
            Some(_) => return Activation::Rejected,
        };

        if !group.is_discrete() {
            self.active = Some(group);
        }
        activation
    }

    /// Release `group` if it is the active one.
    pub fn release(&mut self, group: GestureGroup) {
        if self.active == Some(group) {
            self.active = None;
        }
    }

    /// Pick the winner among several groups recognized from the same input.
    pub fn resolve(&self, candidates: &[GestureGroup]) -> Option<GestureGroup> {
        if self.paging {
            return None;
        }
        candidates.iter().copied().min_by_key(GestureGroup::priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_continuous_gesture_holds() {
        let mut arbiter = GestureArbiter::new();
        assert_eq!(arbiter.try_activate(GestureGroup::Transform), Activation::Granted);
        assert_eq!(arbiter.active(), Some(GestureGroup::Transform));
        // Pinch and pan share the group.
        assert_eq!(arbiter.try_activate(GestureGroup::Transform), Activation::Granted);
        // Taps wait until the transform gesture ends.
        assert_eq!(arbiter.try_activate(GestureGroup::SingleTap), Activation::Rejected);
        assert_eq!(arbiter.try_activate(GestureGroup::DoubleTap), Activation::Rejected);

        arbiter.release(GestureGroup::Transform);
        assert_eq!(arbiter.active(), None);
        assert_eq!(arbiter.try_activate(GestureGroup::SingleTap), Activation::Granted);
        // Taps never hold the arbiter.
        assert_eq!(arbiter.active(), None);
    }

    #[test]
    fn test_dismiss_preempts_transform() {
        let mut arbiter = GestureArbiter::new();
        arbiter.try_activate(GestureGroup::Transform);
        assert_eq!(
            arbiter.try_activate(GestureGroup::DismissSwipe),
            Activation::Preempted(GestureGroup::Transform)
        );
        assert_eq!(arbiter.try_activate(GestureGroup::Transform), Activation::Rejected);
        // Releasing a group that is not active changes nothing.
        arbiter.release(GestureGroup::Transform);
        assert_eq!(arbiter.active(), Some(GestureGroup::DismissSwipe));
    }

    #[test]
    fn test_paging_disables_everything() {
        let mut arbiter = GestureArbiter::new();
        arbiter.try_activate(GestureGroup::Transform);
        arbiter.set_paging(true);
        assert_eq!(arbiter.active(), None);
        for group in [
            GestureGroup::DismissSwipe,
            GestureGroup::Transform,
            GestureGroup::DoubleTap,
            GestureGroup::SingleTap,
        ] {
            assert!(!arbiter.try_activate(group).is_granted());
        }
        assert_eq!(arbiter.resolve(&[GestureGroup::SingleTap]), None);

        arbiter.set_paging(false);
        assert!(arbiter.try_activate(GestureGroup::SingleTap).is_granted());
    }

    #[test]
    fn test_resolve_by_priority() {
        let arbiter = GestureArbiter::new();
        assert_eq!(
            arbiter.resolve(&[
                GestureGroup::SingleTap,
                GestureGroup::DoubleTap,
                GestureGroup::Transform
            ]),
            Some(GestureGroup::Transform)
        );
        assert_eq!(
            arbiter.resolve(&[GestureGroup::SingleTap, GestureGroup::DoubleTap]),
            Some(GestureGroup::DoubleTap)
        );
        assert_eq!(arbiter.resolve(&[]), None);
    }
}
