//! Frame timing for driving animations from the host's render loop.

use std::time::Duration;
use web_time::Instant;

/// Measures the time between consecutive frames.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the previous call; zero on the first frame.
    pub fn delta(&mut self) -> Duration {
        self.delta_at(Instant::now())
    }

    /// Like [`delta`](Self::delta) with an explicit timestamp.
    pub fn delta_at(&mut self, now: Instant) -> Duration {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        delta
    }

    /// Forget the previous frame, e.g. when animations stop and the loop idles.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta_at(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_delta_between_frames() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.delta_at(start);
        let next = start + Duration::from_millis(16);
        assert_eq!(clock.delta_at(next), Duration::from_millis(16));

        clock.reset();
        assert_eq!(clock.delta_at(next + Duration::from_secs(5)), Duration::ZERO);
    }
}
