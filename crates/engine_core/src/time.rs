//! Time management for the frame loop.
//!
//! `Time` is the single authority for "now". Every animated subsystem reads
//! `delta_seconds()` / `elapsed_seconds()` from it, so all countdowns are frame-delta
//! accumulated and pause together with frame delivery.

use std::time::Duration;

/// Upper bound for a single frame step. Longer gaps (debugger, backgrounded window)
/// are treated as one slow frame instead of a teleport.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Manages frame timing and delta time calculation.
#[derive(Debug, Default)]
pub struct Time {
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
}

impl Time {
    /// Create a new clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by a host-supplied frame delta (seconds). Negative or non-finite deltas
    /// count as a zero-length frame.
    pub fn advance(&mut self, delta_seconds: f32) {
        self.delta = if delta_seconds.is_finite() && delta_seconds > 0.0 {
            Duration::from_secs_f32(delta_seconds).min(MAX_FRAME_DELTA)
        } else {
            Duration::ZERO
        };
        self.elapsed += self.delta;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}
