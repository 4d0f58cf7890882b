//! Global constants for the lightbox tooling

/// Simulated frame length when replaying scripts (roughly 60 Hz)
pub const REPLAY_FRAME_MS: u64 = 16;

/// Upper bound on frames a `settle` step may run before giving up
pub const MAX_SETTLE_FRAMES: usize = 600;

/// Longest single `tick` step a script may ask for (one minute)
pub const MAX_TICK_MS: u64 = 60_000;
