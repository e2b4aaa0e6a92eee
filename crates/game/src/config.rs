//! Typed configuration for every component. Loaded from `whiteout.ron` at startup.
//!
//! Every field has a serde default so partial files are fine. `sanitize` clamps
//! values that would break the simulation (non-finite numbers, zero durations,
//! restitution >= 1) instead of letting them propagate.

use audio::AudioLevels;
use engine_core::{Color, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, VignetteError};

/// File name looked up in the current directory.
pub const CONFIG_FILE: &str = "whiteout.ron";

/// Smallest duration any timed animation may have.
pub const MIN_DURATION: f32 = 0.01;

/// Lowest title drop gravity; below this the words never come down.
pub const MIN_DROP_GRAVITY: f32 = 50.0;

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

fn duration(v: f32, fallback: f32) -> f32 {
    finite_or(v, fallback).max(MIN_DURATION)
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v.map(|c| finite_or(c, 0.0)))
}

/// Parse a `#rrggbb` colour, falling back to white for malformed input.
pub fn parse_color(hex: &str) -> Color {
    Color::from_hex(hex).unwrap_or_else(|| {
        log::warn!("Invalid colour {:?}, using white", hex);
        Color::WHITE
    })
}

/// Free walking before the ending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed in units per second.
    pub move_speed: f32,
    /// Height of the character's origin above the terrain while walking.
    pub ground_offset: f32,
    pub start_position: [f32; 3],
    /// Initial yaw (radians). -PI/2 faces the goal along -X.
    pub start_yaw: f32,
    pub scale: f32,
    /// Seconds between debug position traces while moving.
    pub position_log_interval: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.5,
            ground_offset: 0.2,
            start_position: [0.0, -0.05, 0.0],
            start_yaw: -std::f32::consts::FRAC_PI_2,
            scale: 0.03,
            position_log_interval: 0.5,
        }
    }
}

impl MovementConfig {
    pub fn start_position(&self) -> Vec3 {
        vec3(self.start_position)
    }
}

/// Win auto-run and lose fall.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndingConfig {
    pub win_speed: f32,
    /// Horizontal run direction (x, z); normalised on use.
    pub win_direction: [f32; 2],
    pub win_ground_offset: f32,
    /// Gravity magnitude for the fall.
    pub lose_gravity: f32,
    pub lose_initial_velocity: f32,
    /// Most negative vertical velocity allowed.
    pub lose_terminal_velocity: f32,
    pub lose_ground_offset: f32,
    /// Exponential tilt rate (1/s).
    pub lose_tilt_rate: f32,
    /// Target tilt (x, y, z) in radians.
    pub lose_tilt: [f32; 3],
    pub freeze_duration: f32,
    pub freeze_color: String,
}

impl Default for EndingConfig {
    fn default() -> Self {
        Self {
            win_speed: 7.5,
            win_direction: [-1.0, 0.0],
            win_ground_offset: 0.2,
            lose_gravity: 140.0,
            lose_initial_velocity: -6.0,
            lose_terminal_velocity: -38.0,
            lose_ground_offset: 0.12,
            lose_tilt_rate: 2.2,
            lose_tilt: [-1.25, -2.5, -2.0],
            freeze_duration: 2.5,
            freeze_color: "#86d7ff".to_string(),
        }
    }
}

impl EndingConfig {
    /// Unit run direction on the XZ plane; defaults to -X when degenerate.
    pub fn win_direction(&self) -> Vec3 {
        Vec3::new(self.win_direction[0], 0.0, self.win_direction[1])
            .try_normalize()
            .unwrap_or(Vec3::NEG_X)
    }

    pub fn lose_tilt(&self) -> Vec3 {
        vec3(self.lose_tilt)
    }

    pub fn freeze_color(&self) -> Color {
        parse_color(&self.freeze_color)
    }
}

/// Narration-driven story beats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Narration time window (seconds, inclusive) in which the ending fires.
    pub ending_window: [f64; 2],
    /// Win when the character's x is at or below this value.
    pub goal_x_threshold: f32,
    /// Delay from the ending trigger to the result overlay.
    pub result_delay: f32,
    /// Delay from the ending trigger to the guidance fade-out.
    pub guidance_fade_delay: f32,
    /// Keep the final text visible and suppress the ending trigger (tuning aid).
    pub debug_always_show: bool,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            ending_window: [36.0, 38.0],
            goal_x_threshold: -100.0,
            result_delay: 3.0,
            guidance_fade_delay: 1.0,
            debug_always_show: false,
        }
    }
}

/// Ballistic drop of the final title words.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// When false the words use the eased fallback tween instead of physics.
    pub enabled: bool,
    pub word_spacing: f32,
    pub left_extra_x: f32,
    pub right_extra_x: f32,
    pub left_drop_height: f32,
    pub right_drop_height: f32,
    /// Seconds the right word waits after the left word starts falling.
    pub right_delay: f32,
    pub gravity: f32,
    /// Restitution per bounce, clamped to [0, 0.95].
    pub bounce: f32,
    /// Below this impact speed a word comes to rest.
    pub stop_velocity: f32,
    pub squash: f32,
    pub squash_duration: f32,
    pub impact_shake: f32,
    pub impact_shake_duration: f32,
    pub ground_shake: f32,
    pub ground_shake_duration: f32,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            word_spacing: 22.0,
            left_extra_x: -6.0,
            right_extra_x: -2.0,
            left_drop_height: 80.0,
            right_drop_height: 80.0,
            right_delay: 0.18,
            gravity: 520.0,
            bounce: 0.28,
            stop_velocity: 18.0,
            squash: 0.22,
            squash_duration: 0.14,
            impact_shake: 0.8,
            impact_shake_duration: 0.22,
            ground_shake: 0.35,
            ground_shake_duration: 0.18,
        }
    }
}

/// Final scene: title placement fallback tween and camera look-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalSceneConfig {
    pub rise_from_offset_y: f32,
    pub rise_to_offset_y: f32,
    pub rise_duration: f32,
    pub look_up_delay: f32,
    pub look_up_y_offset: f32,
    pub look_up_duration: f32,
}

impl Default for FinalSceneConfig {
    fn default() -> Self {
        Self {
            rise_from_offset_y: 150.0,
            rise_to_offset_y: -220.0,
            rise_duration: 5.0,
            look_up_delay: 0.0,
            look_up_y_offset: 20.0,
            look_up_duration: 1.0,
        }
    }
}

/// Guidance path geometry, colours, and animation timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub enabled: bool,
    /// Force visibility even before the first draw (debug).
    pub debug_visible: bool,
    pub hide_until_draw: bool,
    pub follow_character: bool,
    /// Distance the character must move before the path is rebuilt.
    pub follow_rebuild_distance: f32,
    pub start_x: f32,
    pub start_z: f32,
    pub goal_x: f32,
    pub goal_z: f32,
    /// When set, the goal is `start + goal_offset` instead of `goal_x/goal_z`.
    pub relative_goal: bool,
    pub goal_offset: [f32; 2],
    pub samples: u32,
    pub width: f32,
    pub height_offset: f32,
    pub opacity: f32,
    pub draw_duration: f32,
    pub fade_duration: f32,
    pub color_far: String,
    pub color_mid: String,
    pub color_near: String,
    pub color_goal: String,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debug_visible: false,
            hide_until_draw: true,
            follow_character: true,
            follow_rebuild_distance: 2.0,
            start_x: 0.0,
            start_z: 0.0,
            goal_x: -100.0,
            goal_z: 0.0,
            relative_goal: false,
            goal_offset: [-100.0, 0.0],
            samples: 120,
            width: 0.25,
            height_offset: 0.15,
            opacity: 0.9,
            draw_duration: 2.5,
            fade_duration: 1.5,
            color_far: "#ff4a3d".to_string(),
            color_mid: "#ffa62b".to_string(),
            color_near: "#ffe66d".to_string(),
            color_goal: "#5dffa0".to_string(),
        }
    }
}

impl GuidanceConfig {
    /// Colour stops ordered far, mid, near, goal.
    pub fn stops(&self) -> [Color; 4] {
        [
            parse_color(&self.color_far),
            parse_color(&self.color_mid),
            parse_color(&self.color_near),
            parse_color(&self.color_goal),
        ]
    }
}

/// Intro flythrough and chase camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub intro_duration: f32,
    /// Intro start, relative to the character.
    pub intro_start_offset: [f32; 3],
    /// Intro end, added to the chase position's behind-the-back component.
    pub intro_end_offset: [f32; 3],
    /// Distance behind the character along its facing.
    pub chase_distance: f32,
    /// Extra world-space offset of the chase position.
    pub chase_offset: [f32; 3],
    /// Height above the character the intro looks at.
    pub look_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            intro_duration: 4.0,
            intro_start_offset: [-10.0, 4.0, 5.0],
            intro_end_offset: [30.0, 10.0, 0.0],
            chase_distance: 10.0,
            chase_offset: [30.0, 10.0, 0.0],
            look_height: 1.0,
        }
    }
}

impl CameraConfig {
    pub fn intro_start_offset(&self) -> Vec3 {
        vec3(self.intro_start_offset)
    }
    pub fn intro_end_offset(&self) -> Vec3 {
        vec3(self.intro_end_offset)
    }
    pub fn chase_offset(&self) -> Vec3 {
        vec3(self.chase_offset)
    }
}

/// Footprint trail stamped into the snow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintConfig {
    pub interval: f32,
    pub lifetime: f32,
    pub max_count: usize,
    pub start_alpha: f32,
    pub canvas_size: u32,
    /// World span (centred on the origin) mapped onto the canvas.
    pub world_extent: f32,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        Self {
            interval: 0.3,
            lifetime: 10.0,
            max_count: 100,
            start_alpha: 0.3,
            canvas_size: 1024,
            world_extent: 200.0,
        }
    }
}

/// Everything, as stored in `whiteout.ron`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    pub movement: MovementConfig,
    pub ending: EndingConfig,
    pub narrative: NarrativeConfig,
    pub drop_text: DropConfig,
    pub final_scene: FinalSceneConfig,
    pub guidance: GuidanceConfig,
    pub camera: CameraConfig,
    pub footprints: FootprintConfig,
    pub audio: AudioLevels,
}

impl VignetteConfig {
    /// Load from `whiteout.ron`. If the file is missing or invalid, returns defaults.
    pub fn load() -> Self {
        let path = config_path();
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(VignetteError::Io { .. }) => Self::default(),
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and sanitise a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| VignetteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&data).map_err(|source| VignetteError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_ron(data: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        let mut config: Self = ron::from_str(data)?;
        config.sanitize();
        Ok(config)
    }

    /// Save current config to `whiteout.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("{}", VignetteError::from(e)),
        }
    }

    /// Clamp every field into its safe range.
    pub fn sanitize(&mut self) {
        let m = &mut self.movement;
        m.move_speed = finite_or(m.move_speed, 3.5).max(0.0);
        m.ground_offset = finite_or(m.ground_offset, 0.2);
        m.start_yaw = finite_or(m.start_yaw, -std::f32::consts::FRAC_PI_2);
        m.scale = finite_or(m.scale, 0.03).max(0.0);
        m.position_log_interval = duration(m.position_log_interval, 0.5);

        let e = &mut self.ending;
        e.win_speed = finite_or(e.win_speed, 7.5).max(0.0);
        e.win_ground_offset = finite_or(e.win_ground_offset, 0.2);
        e.lose_gravity = finite_or(e.lose_gravity, 140.0).abs();
        e.lose_initial_velocity = finite_or(e.lose_initial_velocity, -6.0);
        e.lose_terminal_velocity = -finite_or(e.lose_terminal_velocity, -38.0).abs();
        e.lose_ground_offset = finite_or(e.lose_ground_offset, 0.12);
        e.lose_tilt_rate = finite_or(e.lose_tilt_rate, 2.2).max(0.0);
        e.freeze_duration = duration(e.freeze_duration, 2.5);

        let n = &mut self.narrative;
        if !(n.ending_window[0].is_finite() && n.ending_window[1].is_finite()) {
            n.ending_window = [36.0, 38.0];
        }
        if n.ending_window[1] < n.ending_window[0] {
            n.ending_window.swap(0, 1);
        }
        n.goal_x_threshold = finite_or(n.goal_x_threshold, -100.0);
        n.result_delay = finite_or(n.result_delay, 3.0).max(0.0);
        n.guidance_fade_delay = finite_or(n.guidance_fade_delay, 1.0).max(0.0);

        let d = &mut self.drop_text;
        d.gravity = finite_or(d.gravity, 520.0).max(MIN_DROP_GRAVITY);
        d.bounce = finite_or(d.bounce, 0.28).clamp(0.0, 0.95);
        d.stop_velocity = finite_or(d.stop_velocity, 18.0).max(1.0);
        d.right_delay = finite_or(d.right_delay, 0.18).max(0.0);
        d.left_drop_height = finite_or(d.left_drop_height, 80.0).max(0.0);
        d.right_drop_height = finite_or(d.right_drop_height, 80.0).max(0.0);
        d.squash = finite_or(d.squash, 0.22).clamp(0.0, 1.0);
        d.squash_duration = duration(d.squash_duration, 0.14);
        d.impact_shake = finite_or(d.impact_shake, 0.8).max(0.0);
        d.impact_shake_duration = duration(d.impact_shake_duration, 0.22);
        d.ground_shake = finite_or(d.ground_shake, 0.35).max(0.0);
        d.ground_shake_duration = duration(d.ground_shake_duration, 0.18);

        let f = &mut self.final_scene;
        f.rise_duration = duration(f.rise_duration, 5.0);
        f.look_up_delay = finite_or(f.look_up_delay, 0.0).max(0.0);
        f.look_up_y_offset = finite_or(f.look_up_y_offset, 20.0);
        f.look_up_duration = duration(f.look_up_duration, 1.0);

        let g = &mut self.guidance;
        g.samples = g.samples.max(2);
        g.follow_rebuild_distance = finite_or(g.follow_rebuild_distance, 2.0).max(0.05);
        g.width = finite_or(g.width, 0.25).max(0.001);
        g.opacity = engine_core::clamp01(g.opacity);
        g.draw_duration = duration(g.draw_duration, 2.5);
        g.fade_duration = duration(g.fade_duration, 1.5);
        g.start_x = finite_or(g.start_x, 0.0);
        g.start_z = finite_or(g.start_z, 0.0);
        g.goal_x = finite_or(g.goal_x, -100.0);
        g.goal_z = finite_or(g.goal_z, 0.0);
        g.height_offset = finite_or(g.height_offset, 0.15);

        let c = &mut self.camera;
        c.intro_duration = duration(c.intro_duration, 4.0);
        c.chase_distance = finite_or(c.chase_distance, 10.0);
        c.look_height = finite_or(c.look_height, 1.0);

        let fp = &mut self.footprints;
        fp.interval = duration(fp.interval, 0.3);
        fp.lifetime = duration(fp.lifetime, 10.0);
        fp.start_alpha = engine_core::clamp01(fp.start_alpha);
        fp.world_extent = finite_or(fp.world_extent, 200.0).max(1.0);
        fp.canvas_size = fp.canvas_size.max(1);
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drop_text::DropText;
    use crate::i18n::Language;

    #[test]
    fn partial_file_keeps_defaults() {
        let c = VignetteConfig::from_ron("(drop_text: (gravity: 300.0))").unwrap();
        assert_eq!(c.drop_text.gravity, 300.0);
        assert_eq!(c.drop_text.bounce, 0.28);
        assert_eq!(c.ending.win_speed, 7.5);
        assert_eq!(c.narrative.ending_window, [36.0, 38.0]);
    }

    #[test]
    fn sanitize_clamps_unsafe_values() {
        let mut c = VignetteConfig::default();
        c.drop_text.bounce = 1.5;
        c.drop_text.stop_velocity = 0.0;
        c.guidance.opacity = f32::NAN;
        c.guidance.samples = 0;
        c.guidance.fade_duration = 0.0;
        c.ending.lose_terminal_velocity = 38.0;
        c.narrative.ending_window = [38.0, 36.0];
        c.sanitize();
        assert_eq!(c.drop_text.bounce, 0.95);
        assert_eq!(c.drop_text.stop_velocity, 1.0);
        assert_eq!(c.guidance.opacity, 0.0);
        assert_eq!(c.guidance.samples, 2);
        assert_eq!(c.guidance.fade_duration, MIN_DURATION);
        assert_eq!(c.ending.lose_terminal_velocity, -38.0);
        assert_eq!(c.narrative.ending_window, [36.0, 38.0]);
    }

    #[test]
    fn weightless_title_drop_is_floored() {
        let c = VignetteConfig::from_ron("(drop_text: (gravity: 0.0))").unwrap();
        assert_eq!(c.drop_text.gravity, MIN_DROP_GRAVITY);

        let mut drop = DropText::new(c.drop_text.clone(), c.final_scene.clone(), Language::En);
        drop.start();
        for _ in 0..60 * 30 {
            drop.update(1.0 / 60.0);
        }
        assert!(drop.all_landed());
    }

    #[test]
    fn invalid_ron_is_an_error() {
        assert!(VignetteConfig::from_ron("(movement: 5").is_err());
    }

    #[test]
    fn round_trips_through_ron() {
        let c = VignetteConfig::default();
        let s = ron::ser::to_string_pretty(&c, ron::ser::PrettyConfig::default()).unwrap();
        let back = VignetteConfig::from_ron(&s).unwrap();
        assert_eq!(back.guidance.color_goal, c.guidance.color_goal);
    }

    #[test]
    fn degenerate_win_direction_falls_back() {
        let e = EndingConfig {
            win_direction: [0.0, 0.0],
            ..Default::default()
        };
        assert_eq!(e.win_direction(), Vec3::NEG_X);
    }
}
