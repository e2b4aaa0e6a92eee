//! Mix levels and volume sanitising.

use serde::{Deserialize, Serialize};

/// Clamp a requested volume into [0, 1]; non-finite input becomes silence.
pub fn clamp_volume(v: f32) -> f32 {
    engine_core::clamp01(v)
}

/// Per-track mix levels. Values outside [0, 1] are accepted here and clamped on use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioLevels {
    #[serde(default = "default_narration_volume")]
    pub narration_volume: f32,
    #[serde(default = "default_music_volume")]
    pub music_volume: f32,
    /// Ambient wind loop. Tuned above 1.0 upstream; effectively full volume.
    #[serde(default = "default_ambient_volume")]
    pub ambient_volume: f32,
    #[serde(default = "default_step_volume")]
    pub step_volume: f32,
    #[serde(default = "default_impact_volume")]
    pub impact_volume: f32,
    /// Minimum seconds between footstep sounds.
    #[serde(default = "default_step_interval")]
    pub step_interval: f32,
}

fn default_narration_volume() -> f32 {
    0.1
}
fn default_music_volume() -> f32 {
    0.1
}
fn default_ambient_volume() -> f32 {
    8.0
}
fn default_step_volume() -> f32 {
    0.2
}
fn default_impact_volume() -> f32 {
    0.05
}
fn default_step_interval() -> f32 {
    0.45
}

impl Default for AudioLevels {
    fn default() -> Self {
        Self {
            narration_volume: default_narration_volume(),
            music_volume: default_music_volume(),
            ambient_volume: default_ambient_volume(),
            step_volume: default_step_volume(),
            impact_volume: default_impact_volume(),
            step_interval: default_step_interval(),
        }
    }
}
