//! Win auto-run and lose fall.
//!
//! Once a mode is entered it is permanent for the session. The engine is the only
//! writer of the character transform while active; free movement is locked out by
//! the session.

use std::collections::HashMap;

use engine_core::{Color, Entity, MaterialColor, MeshPart, Transform, Vec3, World};
use procgen::terrain_height;

use crate::config::EndingConfig;
use crate::error::{Result, VignetteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndingMode {
    #[default]
    None,
    Win,
    Lose,
}

#[derive(Debug)]
pub struct EndingMotion {
    config: EndingConfig,
    /// Effective fall gravity magnitude.
    gravity: f32,
    direction: Vec3,
    tilt: Vec3,
    freeze_color: Color,
    mode: EndingMode,
    velocity_y: f32,
    freeze_elapsed: f32,
    original_colors: HashMap<Entity, Color>,
    walk_paused: bool,
}

impl EndingMotion {
    /// `drop_gravity` couples the fall to the title drop so the character never
    /// falls slower than a fraction of the words.
    pub fn new(config: EndingConfig, drop_gravity: f32) -> Self {
        let gravity = config.lose_gravity.abs().max(drop_gravity.abs() * 0.12);
        Self {
            gravity,
            direction: config.win_direction(),
            tilt: config.lose_tilt(),
            freeze_color: config.freeze_color(),
            config,
            mode: EndingMode::None,
            velocity_y: 0.0,
            freeze_elapsed: 0.0,
            original_colors: HashMap::new(),
            walk_paused: false,
        }
    }

    pub fn mode(&self) -> EndingMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != EndingMode::None
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    /// Freeze tint progress in [0, 1].
    pub fn freeze_progress(&self) -> f32 {
        engine_core::clamp01(self.freeze_elapsed / self.config.freeze_duration.max(0.01))
    }

    /// Whether the walk animation should be held.
    pub fn walk_paused(&self) -> bool {
        self.walk_paused
    }

    pub fn original_color(&self, entity: Entity) -> Option<Color> {
        self.original_colors.get(&entity).copied()
    }

    fn enter(&mut self, mode: EndingMode) -> Result<()> {
        if self.mode != EndingMode::None {
            return Err(VignetteError::EndingAlreadyTriggered(self.mode));
        }
        self.mode = mode;
        Ok(())
    }

    pub fn start_win(&mut self) -> Result<()> {
        self.enter(EndingMode::Win)?;
        self.walk_paused = false;
        log::info!("Ending: win auto-run");
        Ok(())
    }

    pub fn start_lose(&mut self, world: &World) -> Result<()> {
        self.enter(EndingMode::Lose)?;
        self.velocity_y = self.config.lose_initial_velocity;
        self.freeze_elapsed = 0.0;
        self.cache_original_colors(world);
        self.walk_paused = true;
        log::info!("Ending: lose fall");
        Ok(())
    }

    /// Record every mesh colour not already cached. Repeated calls never overwrite.
    pub fn cache_original_colors(&mut self, world: &World) {
        for (entity, (_, color)) in world.query::<(&MeshPart, &MaterialColor)>().iter() {
            self.original_colors.entry(entity).or_insert(color.0);
        }
    }

    /// Advance the active mode. Returns false when no mode is active.
    pub fn update(&mut self, dt: f32, character: &mut Transform, world: &mut World) -> bool {
        match self.mode {
            EndingMode::None => false,
            EndingMode::Win => {
                self.update_win(dt, character);
                true
            }
            EndingMode::Lose => {
                self.update_lose(dt, character);
                self.update_freeze(dt, world);
                true
            }
        }
    }

    fn update_win(&mut self, dt: f32, character: &mut Transform) {
        let p = &mut character.position;
        *p += self.direction * self.config.win_speed * dt;
        p.y = terrain_height(p.x, p.z) + self.config.win_ground_offset;
        self.walk_paused = false;
    }

    fn update_lose(&mut self, dt: f32, character: &mut Transform) {
        self.velocity_y -= self.gravity * dt;
        self.velocity_y = self.velocity_y.max(self.config.lose_terminal_velocity);
        let p = &mut character.position;
        p.y += self.velocity_y * dt;

        let ground = terrain_height(p.x, p.z) + self.config.lose_ground_offset;
        if p.y <= ground {
            p.y = ground;
            self.velocity_y = 0.0;
        }

        let k = (self.config.lose_tilt_rate * dt).min(1.0);
        character.rotation += (self.tilt - character.rotation) * k;
    }

    fn update_freeze(&mut self, dt: f32, world: &mut World) {
        self.freeze_elapsed = (self.freeze_elapsed + dt).min(self.config.freeze_duration);
        let p = self.freeze_progress();
        for (entity, color) in world.query_mut::<&mut MaterialColor>() {
            if let Some(base) = self.original_colors.get(&entity) {
                color.0 = base.lerp(self.freeze_color, p);
            }
        }
    }
}

/// Chase-from-behind-and-above camera used during both endings.
/// Returns `(position, target)`.
pub fn chase_camera(character: &Transform, distance: f32, offset: Vec3) -> (Vec3, Vec3) {
    let p = character.position;
    let yaw = character.rotation.y;
    let position = Vec3::new(
        p.x - yaw.sin() * distance + offset.x,
        p.y + offset.y,
        p.z - yaw.cos() * distance + offset.z,
    );
    (position, p)
}
