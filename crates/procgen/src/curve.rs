//! Smooth interpolating curve through sampled control points.

use glam::Vec3;

/// Uniform Catmull-Rom spline through a sequence of points (open, not closed).
///
/// The curve passes through every control point. Endpoints use mirrored phantom
/// points so the first and last segments have sensible tangents.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<Vec3>,
}

impl CatmullRom {
    /// Build a curve. Returns `None` with fewer than two points.
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of spans between control points.
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    fn control(&self, i: isize) -> Vec3 {
        let n = self.points.len() as isize;
        if i < 0 {
            2.0 * self.points[0] - self.points[1]
        } else if i >= n {
            2.0 * self.points[(n - 1) as usize] - self.points[(n - 2) as usize]
        } else {
            self.points[i as usize]
        }
    }

    /// Map global `t` in [0, 1] to (segment index, local weight).
    fn locate(&self, t: f32) -> (isize, f32) {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let p = self.segment_count() as f32 * t;
        let mut seg = p.floor() as isize;
        let mut w = p - seg as f32;
        if seg >= self.segment_count() as isize {
            seg = self.segment_count() as isize - 1;
            w = 1.0;
        }
        (seg, w)
    }

    /// Point on the curve at `t` in [0, 1].
    pub fn point(&self, t: f32) -> Vec3 {
        let (i, w) = self.locate(t);
        let (p0, p1, p2, p3) = (
            self.control(i - 1),
            self.control(i),
            self.control(i + 1),
            self.control(i + 2),
        );
        let w2 = w * w;
        let w3 = w2 * w;
        0.5 * ((2.0 * p1)
            + (-p0 + p2) * w
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * w2
            + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * w3)
    }

    /// Unit tangent at `t`. Falls back to the chord direction on degenerate spans.
    pub fn tangent(&self, t: f32) -> Vec3 {
        let (i, w) = self.locate(t);
        let (p0, p1, p2, p3) = (
            self.control(i - 1),
            self.control(i),
            self.control(i + 1),
            self.control(i + 2),
        );
        let w2 = w * w;
        let d = 0.5
            * ((-p0 + p2)
                + 2.0 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * w
                + 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * w2);
        d.try_normalize()
            .or_else(|| (p2 - p1).try_normalize())
            .unwrap_or(Vec3::X)
    }

    /// Arc length approximated with `divisions` chords.
    pub fn length(&self, divisions: usize) -> f32 {
        let divisions = divisions.max(1);
        let mut total = 0.0;
        let mut prev = self.point(0.0);
        for i in 1..=divisions {
            let p = self.point(i as f32 / divisions as f32);
            total += prev.distance(p);
            prev = p;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_control_points() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 1.0, 1.0),
            Vec3::new(4.0, 0.0, 2.0),
        ];
        let curve = CatmullRom::new(pts.clone()).unwrap();
        for (i, p) in pts.iter().enumerate() {
            let t = i as f32 / (pts.len() - 1) as f32;
            assert!((curve.point(t) - *p).length() < 1e-4, "point {i}");
        }
    }

    #[test]
    fn straight_line_length_and_tangent() {
        let curve = CatmullRom::new(vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)]).unwrap();
        assert!((curve.length(64) - 10.0).abs() < 1e-3);
        assert!((curve.tangent(0.3) - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn rejects_single_point() {
        assert!(CatmullRom::new(vec![Vec3::ONE]).is_none());
    }
}
