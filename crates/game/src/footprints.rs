//! Footprints stamped into the snow while walking.
//!
//! Prints live in canvas space: the world patch `[-extent/2, extent/2]` on X/Z
//! maps onto a square canvas. Alpha fades linearly to zero over the lifetime.

use engine_core::{Vec2, Vec3};

use crate::config::FootprintConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Canvas position in pixels.
    pub canvas: Vec2,
    pub age: f32,
}

#[derive(Debug)]
pub struct FootprintTrail {
    config: FootprintConfig,
    prints: Vec<Footprint>,
    since_last: f32,
}

impl FootprintTrail {
    pub fn new(config: FootprintConfig) -> Self {
        Self {
            config,
            prints: Vec::new(),
            since_last: 0.0,
        }
    }

    pub fn prints(&self) -> &[Footprint] {
        &self.prints
    }

    pub fn to_canvas(&self, world: Vec3) -> Vec2 {
        let size = self.config.canvas_size as f32;
        let extent = self.config.world_extent;
        let half = extent / 2.0;
        Vec2::new((world.x + half) / extent * size, (world.z + half) / extent * size)
    }

    /// Count walking time; stamps a print when the interval elapses.
    /// Returns true when a print was stamped.
    pub fn walk(&mut self, dt: f32, position: Vec3) -> bool {
        self.since_last += dt;
        if self.since_last < self.config.interval {
            return false;
        }
        self.since_last = 0.0;
        self.stamp(position);
        true
    }

    pub fn stamp(&mut self, position: Vec3) {
        self.prints.push(Footprint {
            canvas: self.to_canvas(position),
            age: 0.0,
        });
        if self.prints.len() > self.config.max_count {
            let excess = self.prints.len() - self.config.max_count;
            self.prints.drain(..excess);
        }
    }

    /// Age every print and drop the ones past their lifetime.
    pub fn update(&mut self, dt: f32) {
        let lifetime = self.config.lifetime;
        for p in &mut self.prints {
            p.age += dt;
        }
        self.prints.retain(|p| p.age < lifetime);
    }

    pub fn alpha(&self, print: &Footprint) -> f32 {
        let fade = print.age / self.config.lifetime;
        (self.config.start_alpha * (1.0 - fade)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_on_interval() {
        let mut trail = FootprintTrail::new(FootprintConfig::default());
        let mut stamped = 0;
        for _ in 0..60 {
            if trail.walk(0.25, Vec3::ZERO) {
                stamped += 1;
            }
        }
        assert_eq!(stamped, 30);
        assert_eq!(trail.prints()[0].canvas, Vec2::new(512.0, 512.0));
    }

    #[test]
    fn keeps_at_most_max_count() {
        let mut trail = FootprintTrail::new(FootprintConfig::default());
        for i in 0..130 {
            trail.stamp(Vec3::new(i as f32, 0.0, 0.0));
        }
        assert_eq!(trail.prints().len(), 100);
        assert_eq!(trail.prints()[0].canvas, trail.to_canvas(Vec3::new(30.0, 0.0, 0.0)));
    }

    #[test]
    fn fades_and_expires() {
        let mut trail = FootprintTrail::new(FootprintConfig::default());
        trail.stamp(Vec3::new(-100.0, 0.0, 100.0));
        assert_eq!(trail.prints()[0].canvas, Vec2::new(0.0, 1024.0));
        assert!((trail.alpha(&trail.prints()[0]) - 0.3).abs() < 1e-6);
        trail.update(5.0);
        assert!((trail.alpha(&trail.prints()[0]) - 0.15).abs() < 1e-6);
        trail.update(5.0);
        assert!(trail.prints().is_empty());
    }
}
