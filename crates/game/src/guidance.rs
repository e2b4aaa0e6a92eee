//! Guidance path: a tube from the character to the narrative goal, recoloured by
//! proximity, revealed by a timed draw and hidden by a timed fade.

use engine_core::{clamp01, ease, Color, Easing, Vec3};
use procgen::{terrain_height, CatmullRom, TubeMesh};

use crate::config::GuidanceConfig;

const RADIAL_SEGMENTS: usize = 8;
const DEFAULT_FAR_DISTANCE: f32 = 220.0;

/// Gradient breakpoints on normalised goal distance.
pub const MID_BREAK: f32 = 0.66;
pub const NEAR_BREAK: f32 = 0.33;

/// Map normalised goal distance `u` through the far/mid/near/goal stops.
/// `u = 1` is far away, `u = 0` is at the goal.
pub fn gradient_color(u: f32, stops: &[Color; 4]) -> Color {
    let [far, mid, near, goal] = *stops;
    let u = clamp01(u);
    if u > MID_BREAK {
        mid.lerp(far, clamp01((u - MID_BREAK) / (1.0 - MID_BREAK)))
    } else if u > NEAR_BREAK {
        near.lerp(mid, clamp01((u - NEAR_BREAK) / (MID_BREAK - NEAR_BREAK)))
    } else {
        goal.lerp(near, clamp01(u / NEAR_BREAK))
    }
}

#[derive(Debug)]
pub struct GuidancePath {
    config: GuidanceConfig,
    stops: [Color; 4],
    start: Vec3,
    far_distance: f32,
    tube: Option<TubeMesh>,
    draw_active: bool,
    draw_elapsed: f32,
    draw_progress: f32,
    draw_ever_started: bool,
    fade_active: bool,
    fade_elapsed: f32,
    faded_out: bool,
    opacity: f32,
    color: Color,
    rebuild_count: u32,
}

impl GuidancePath {
    pub fn new(config: GuidanceConfig) -> Self {
        let stops = config.stops();
        let start = ground_point(config.start_x, config.start_z, config.height_offset);
        Self {
            stops,
            start,
            far_distance: DEFAULT_FAR_DISTANCE,
            tube: None,
            draw_active: false,
            draw_elapsed: 0.0,
            draw_progress: 1.0,
            draw_ever_started: false,
            fade_active: false,
            fade_elapsed: 0.0,
            faded_out: false,
            opacity: clamp01(config.opacity),
            color: stops[0],
            rebuild_count: 0,
            config,
        }
    }

    pub fn config(&self) -> &GuidanceConfig {
        &self.config
    }

    /// Replace the configuration and rebuild the geometry.
    pub fn reconfigure(&mut self, config: GuidanceConfig) {
        self.stops = config.stops();
        self.start = ground_point(config.start_x, config.start_z, config.height_offset);
        self.config = config;
        self.build();
    }

    /// Live opacity change; no rebuild needed.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.config.opacity = clamp01(opacity);
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Far end of the path.
    pub fn goal(&self) -> Vec3 {
        let (x, z) = if self.config.relative_goal {
            (
                self.start.x + self.config.goal_offset[0],
                self.start.z + self.config.goal_offset[1],
            )
        } else {
            (self.config.goal_x, self.config.goal_z)
        };
        ground_point(x, z, self.config.height_offset)
    }

    /// Fixed narrative goal used for proximity colouring (on the ground).
    pub fn color_goal(&self) -> Vec3 {
        let (x, z) = (self.config.goal_x, self.config.goal_z);
        Vec3::new(x, terrain_height(x, z), z)
    }

    pub fn tube(&self) -> Option<&TubeMesh> {
        self.tube.as_ref()
    }

    pub fn rebuild_count(&self) -> u32 {
        self.rebuild_count
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn draw_progress(&self) -> f32 {
        self.draw_progress
    }

    pub fn draw_ever_started(&self) -> bool {
        self.draw_ever_started
    }

    /// Rendered index count for the current draw progress.
    pub fn draw_range(&self) -> usize {
        self.tube.as_ref().map_or(0, |t| t.draw_range(self.draw_progress))
    }

    pub fn is_visible(&self) -> bool {
        if !self.config.enabled || self.tube.is_none() {
            return false;
        }
        if self.config.debug_visible {
            return true;
        }
        let allowed = !self.config.hide_until_draw || self.draw_ever_started;
        allowed && !self.faded_out
    }

    /// Sample the path and sweep the tube.
    pub fn build(&mut self) {
        let samples = self.config.samples.max(2) as usize;
        let goal = self.goal();
        let points: Vec<Vec3> = (0..samples)
            .map(|i| {
                let t = i as f32 / (samples - 1) as f32;
                let x = self.start.x + (goal.x - self.start.x) * t;
                let z = self.start.z + (goal.z - self.start.z) * t;
                ground_point(x, z, self.config.height_offset)
            })
            .collect();

        let Some(curve) = CatmullRom::new(points) else {
            log::warn!("Guidance path needs at least two points");
            return;
        };
        let tube = TubeMesh::sweep(&curve, samples - 1, self.config.width, RADIAL_SEGMENTS);
        log::debug!(
            "Guidance rebuilt from ({:.2}, {:.2}): {} indices, length {:.1}",
            self.start.x,
            self.start.z,
            tube.draw_count(),
            tube.length
        );
        self.tube = Some(tube);
        self.faded_out = false;
        self.opacity = clamp01(self.config.opacity);
        self.rebuild_count += 1;
    }

    /// Start the path at the character and capture the colour reference distance.
    pub fn set_start_from_character(&mut self, character: Vec3) {
        self.move_start(character);
        self.far_distance = character.distance(self.color_goal()).max(1.0);
        self.build();
    }

    /// Begin the progressive reveal. Requires built geometry.
    pub fn start_draw(&mut self) {
        if self.tube.is_none() {
            return;
        }
        self.draw_active = true;
        self.draw_elapsed = 0.0;
        self.draw_progress = 0.0;
        self.draw_ever_started = true;
        self.fade_active = false;
        self.fade_elapsed = 0.0;
        self.faded_out = false;
        self.opacity = clamp01(self.config.opacity);
    }

    pub fn start_fade_out(&mut self) {
        if self.tube.is_none() {
            return;
        }
        self.fade_active = true;
        self.fade_elapsed = 0.0;
    }

    /// Per-frame: follow rebuild, proximity colour, then draw and fade timers.
    pub fn update(&mut self, dt: f32, character: Vec3, intro_playing: bool) {
        if !self.is_visible() {
            return;
        }

        if self.config.follow_character && !intro_playing {
            let moved = glam::Vec2::new(character.x - self.start.x, character.z - self.start.z).length();
            if moved >= self.config.follow_rebuild_distance.max(0.05) {
                self.move_start(character);
                self.build();
            }
        }

        let u = clamp01(character.distance(self.color_goal()) / self.far_distance.max(1.0));
        self.color = gradient_color(u, &self.stops);
        let base_opacity = clamp01(self.config.opacity);

        if self.draw_active {
            let duration = self.config.draw_duration.max(0.01);
            self.draw_elapsed = (self.draw_elapsed + dt).min(duration);
            self.draw_progress = clamp01(self.draw_elapsed / duration);
            if self.draw_progress >= 1.0 {
                self.draw_active = false;
            }
        }

        if self.fade_active {
            let duration = self.config.fade_duration.max(0.01);
            self.fade_elapsed = (self.fade_elapsed + dt).min(duration);
            let p = clamp01(self.fade_elapsed / duration);
            self.opacity = ease(base_opacity, 0.0, p, Easing::QuadIn);
            if p >= 1.0 {
                self.fade_active = false;
                self.faded_out = true;
            }
        } else {
            self.opacity = base_opacity;
        }
    }
}

impl GuidancePath {
    /// The followed start is written back so a later reconfigure keeps it.
    fn move_start(&mut self, character: Vec3) {
        self.config.start_x = character.x;
        self.config.start_z = character.z;
        self.start = ground_point(character.x, character.z, self.config.height_offset);
    }
}

fn ground_point(x: f32, z: f32, height_offset: f32) -> Vec3 {
    Vec3::new(x, terrain_height(x, z) + height_offset, z)
}
