//! Pure easing curves for animation interpolation.

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Slow start.
    QuadIn,
    /// Slow start and end.
    QuadInOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` (clamped to [0, 1]).
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::QuadIn => t * t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Clamp to [0, 1]; NaN and infinities collapse to 0.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hold_for_every_curve() {
        for e in [Easing::QuadIn, Easing::QuadInOut] {
            assert_eq!(e.apply(0.0), 0.0, "{e:?}");
            assert_eq!(e.apply(1.0), 1.0, "{e:?}");
        }
    }

    #[test]
    fn quad_in_out_is_symmetric_at_half() {
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::QuadInOut.apply(0.25) < 0.25);
    }

    #[test]
    fn clamp01_rejects_non_finite() {
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(f32::INFINITY), 0.0);
        assert_eq!(clamp01(8.0), 1.0);
        assert_eq!(clamp01(-0.5), 0.0);
    }

    #[test]
    fn ease_interpolates() {
        assert!((ease(100.0, 200.0, 0.5, Easing::QuadIn) - 125.0).abs() < 0.001);
        assert!((ease(1.0, 0.0, 0.5, Easing::QuadIn) - 0.75).abs() < 0.001);
    }
}
