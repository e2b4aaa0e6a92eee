//! Decaying impact shake for the camera and the ground.

use engine_core::Vec3;
use rand::{rngs::StdRng, Rng};

/// A linearly decaying shake.
///
/// `raise` takes the max of the current and requested amplitude/duration and
/// restarts the envelope. Once `elapsed` reaches `duration` the offset is exactly
/// zero and the shake returns to idle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Shake {
    pub amplitude: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Shake {
    pub fn raise(&mut self, amplitude: f32, duration: f32) {
        self.amplitude = self.amplitude.max(amplitude.max(0.0));
        self.duration = self.duration.max(duration.max(0.0));
        self.elapsed = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0.0 && self.elapsed < self.duration
    }

    /// Normalised progress through the shake, 1 when idle.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Current envelope amplitude `A * (1 - t/D)`.
    pub fn envelope(&self) -> f32 {
        self.amplitude * (1.0 - self.progress())
    }

    /// Advance by `dt`; going idle resets amplitude and duration.
    pub fn advance(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        if self.elapsed >= self.duration {
            *self = Self::default();
        }
    }

    /// Random offset inside a ball of radius `envelope()`.
    pub fn random_offset(&self, rng: &mut StdRng) -> Vec3 {
        let amp = self.envelope();
        if amp <= 0.0 {
            return Vec3::ZERO;
        }
        let v = Vec3::new(
            rng.gen_range(-amp..=amp),
            rng.gen_range(-amp..=amp),
            rng.gen_range(-amp..=amp),
        );
        v.clamp_length_max(amp)
    }

    /// Vertical wobble: three full oscillations over the shake.
    pub fn wave_offset(&self) -> f32 {
        let amp = self.envelope();
        if amp <= 0.0 {
            return 0.0;
        }
        (self.progress() * std::f32::consts::PI * 6.0).sin() * amp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn zero_at_end_and_bounded_at_start() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut shake = Shake::default();
        shake.raise(0.8, 0.22);
        for _ in 0..100 {
            assert!(shake.random_offset(&mut rng).length() <= 0.8 + 1e-6);
        }

        let at_end = Shake {
            amplitude: 0.8,
            duration: 0.22,
            elapsed: 0.22,
        };
        assert_eq!(at_end.random_offset(&mut rng), Vec3::ZERO);
        assert_eq!(at_end.wave_offset(), 0.0);
    }

    #[test]
    fn raise_takes_max_and_restarts() {
        let mut shake = Shake::default();
        shake.raise(0.8, 0.22);
        shake.advance(0.1);
        shake.raise(0.35, 0.18);
        assert_eq!(shake.amplitude, 0.8);
        assert_eq!(shake.duration, 0.22);
        assert_eq!(shake.elapsed, 0.0);
    }

    #[test]
    fn finished_shake_goes_idle() {
        let mut shake = Shake::default();
        shake.raise(0.8, 0.22);
        for _ in 0..20 {
            shake.advance(0.016);
        }
        assert!(!shake.is_active());
        assert_eq!(shake, Shake::default());

        // A later small shake is not inflated by the finished large one.
        shake.raise(0.1, 0.1);
        assert_eq!(shake.amplitude, 0.1);
    }

    #[test]
    fn envelope_decays_monotonically() {
        let mut shake = Shake::default();
        shake.raise(1.0, 1.0);
        let mut last = shake.envelope();
        for _ in 0..9 {
            shake.advance(0.1);
            let e = shake.envelope();
            assert!(e < last);
            last = e;
        }
    }
}
