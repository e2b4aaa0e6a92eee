//! Contracts for audio playback backends.

use thiserror::Error;

/// Errors a playback backend can report.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The platform refused to start playback (autoplay policy, no device).
    #[error("playback rejected: {0}")]
    Rejected(String),
    /// A cue was requested that the backend has no sound for.
    #[error("no sound loaded for cue {0:?}")]
    MissingSound(SoundCue),
    /// Backend-specific failure.
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Snapshot of a streaming track's playback clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackStatus {
    /// Playback position in seconds.
    pub current_time: f64,
    /// Track length in seconds; may be NaN or infinite while unknown.
    pub duration: f64,
    pub paused: bool,
    pub ended: bool,
}

impl PlaybackStatus {
    /// Actively playing and past the very first sample.
    pub fn is_playing(&self) -> bool {
        !self.paused && self.current_time > 0.0
    }

    /// Seconds left, when the duration is known.
    pub fn remaining(&self) -> Option<f64> {
        if self.duration.is_finite() && self.duration > 0.0 {
            Some((self.duration - self.current_time).max(0.0))
        } else {
            None
        }
    }
}

/// A long-running track with a readable clock (narration, music, ambient).
pub trait Playback {
    fn status(&self) -> PlaybackStatus;
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Volume in [0, 1]; callers clamp before calling.
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, _looping: bool) {}
}

/// Fire-and-forget sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Footstep in snow.
    Step,
    /// A falling title word hitting the ground.
    TitleImpact,
}

pub trait SfxPlayer {
    /// Play a fresh instance of `cue`; overlapping instances are allowed.
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_needs_a_known_duration() {
        let mut s = PlaybackStatus {
            current_time: 10.0,
            duration: f64::NAN,
            paused: false,
            ended: false,
        };
        assert_eq!(s.remaining(), None);
        s.duration = 75.5;
        assert_eq!(s.remaining(), Some(65.5));
        s.current_time = 90.0;
        assert_eq!(s.remaining(), Some(0.0));
    }

    #[test]
    fn zero_position_is_not_playing() {
        let s = PlaybackStatus {
            current_time: 0.0,
            duration: 60.0,
            paused: false,
            ended: false,
        };
        assert!(!s.is_playing());
    }
}
