//! Free walking along the character's facing.

use engine_core::{Transform, Vec3};
use procgen::terrain_height;

use crate::config::MovementConfig;

/// Held movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
}

impl MoveInput {
    pub fn any(&self) -> bool {
        self.forward || self.back
    }

    /// Local Z direction: +1 forward, -1 back, 0 when both or neither are held.
    fn axis(&self) -> f32 {
        match (self.forward, self.back) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

/// What a movement step did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveStep {
    /// The character actually changed position.
    pub moved: bool,
    /// Forward was held while moving.
    pub forward: bool,
}

#[derive(Debug)]
pub struct Movement {
    config: MovementConfig,
    disabled: bool,
    walk_paused: bool,
    forward_started: bool,
    log_timer: f32,
}

impl Movement {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            disabled: false,
            walk_paused: true,
            forward_started: false,
            log_timer: 0.0,
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.config.move_speed = speed.max(0.0);
    }

    /// Lock movement for the rest of the session.
    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn walk_paused(&self) -> bool {
        self.walk_paused
    }

    pub fn forward_started(&self) -> bool {
        self.forward_started
    }

    /// Forward input is refused outright once movement is locked.
    pub fn accepts(&self, forward: bool) -> bool {
        !(self.disabled && forward)
    }

    /// Spawn transform: start position snapped onto the terrain.
    pub fn spawn(&self) -> Transform {
        let mut p = self.config.start_position();
        p.y = terrain_height(p.x, p.z) + self.config.ground_offset;
        let mut t = Transform::from_position_yaw(p, self.config.start_yaw);
        t.scale = Vec3::splat(self.config.scale);
        t
    }

    /// Walk one frame. `blocked` covers the intro and game over.
    pub fn update(&mut self, dt: f32, input: MoveInput, character: &mut Transform, blocked: bool) -> MoveStep {
        if blocked || self.disabled {
            return MoveStep::default();
        }
        self.walk_paused = !input.any();

        let axis = input.axis();
        if axis == 0.0 {
            return MoveStep::default();
        }
        if input.forward {
            self.forward_started = true;
        }

        let direction = character.local_to_world_dir(Vec3::Z * axis).normalize_or_zero();
        character.translate(direction * self.config.move_speed * dt);
        let p = &mut character.position;
        p.y = terrain_height(p.x, p.z) + self.config.ground_offset;

        self.log_timer += dt;
        if self.log_timer >= self.config.position_log_interval {
            self.log_timer = 0.0;
            log::debug!("[POS] x:{:.2} y:{:.2} z:{:.2}", p.x, p.y, p.z);
        }

        MoveStep {
            moved: true,
            forward: input.forward,
        }
    }
}
