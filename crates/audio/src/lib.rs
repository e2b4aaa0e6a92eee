//! Audio for the vignette: narration, music, ambient wind, and one-shot cues.
//!
//! Decoding and mixing belong to a backend. This crate defines the playback
//! contracts the rest of the game consumes, and the `AudioDirector` that applies
//! the start/unlock/volume policy on top of them. Every track is optional: a
//! missing track makes the corresponding call a no-op.

mod director;
mod levels;
mod playback;

#[cfg(feature = "kira")]
pub mod kira_backend;

pub use director::{AudioDirector, AudioState};
pub use levels::{clamp_volume, AudioLevels};
pub use playback::{AudioError, Playback, PlaybackStatus, SfxPlayer, SoundCue};
