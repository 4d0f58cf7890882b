//! Unit tests for gesture scripts.
//!
//! These tests verify script parsing and validation, and that replaying a
//! script drives the engine the way the equivalent live gestures would.

mod replay_tests;
