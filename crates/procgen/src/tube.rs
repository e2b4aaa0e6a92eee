//! Tube geometry swept along a curve, used to render the guidance path.
//!
//! Index order follows the curve, so rendering only the first `k` indices reveals
//! a prefix of the path. That is what the draw-progress reveal relies on.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::curve::CatmullRom;

/// Vertex for the tube mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PathVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// u runs along the curve (0..1), v around the tube.
    pub uv: [f32; 2],
}

/// Generated tube geometry.
#[derive(Debug, Clone)]
pub struct TubeMesh {
    pub vertices: Vec<PathVertex>,
    pub indices: Vec<u32>,
    /// Approximate arc length of the swept curve.
    pub length: f32,
    pub tubular_segments: usize,
    pub radial_segments: usize,
}

impl TubeMesh {
    /// Sweep a circle of `radius` along `curve`.
    pub fn sweep(curve: &CatmullRom, tubular_segments: usize, radius: f32, radial_segments: usize) -> Self {
        let tubular = tubular_segments.max(1);
        let radial = radial_segments.max(3);
        let frames = transport_frames(curve, tubular);

        let mut vertices = Vec::with_capacity((tubular + 1) * (radial + 1));
        for (i, frame) in frames.iter().enumerate() {
            let u = i as f32 / tubular as f32;
            let center = curve.point(u);
            for j in 0..=radial {
                let v = j as f32 / radial as f32;
                let angle = v * std::f32::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                let normal = (frame.normal * cos + frame.binormal * sin).normalize_or_zero();
                let p = center + normal * radius;
                vertices.push(PathVertex {
                    position: p.to_array(),
                    normal: normal.to_array(),
                    uv: [u, v],
                });
            }
        }

        let mut indices = Vec::with_capacity(tubular * radial * 6);
        for i in 1..=tubular {
            for j in 1..=radial {
                let a = ((radial + 1) * (i - 1) + (j - 1)) as u32;
                let b = ((radial + 1) * i + (j - 1)) as u32;
                let c = ((radial + 1) * i + j) as u32;
                let d = ((radial + 1) * (i - 1) + j) as u32;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self {
            vertices,
            indices,
            length: curve.length(tubular * 4),
            tubular_segments: tubular,
            radial_segments: radial,
        }
    }

    /// Total drawable element count (indices).
    pub fn draw_count(&self) -> usize {
        self.indices.len()
    }

    /// Index count covering the first `fraction` of the path.
    pub fn draw_range(&self, fraction: f32) -> usize {
        let f = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        (self.draw_count() as f32 * f).floor() as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    normal: Vec3,
    binormal: Vec3,
}

/// Parallel-transport frames: the normal is rotated along with the tangent so the
/// tube does not twist.
fn transport_frames(curve: &CatmullRom, segments: usize) -> Vec<Frame> {
    let tangents: Vec<Vec3> = (0..=segments)
        .map(|i| curve.tangent(i as f32 / segments as f32))
        .collect();

    // Seed the first normal from the axis least aligned with the tangent.
    let t0 = tangents[0];
    let abs = t0.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    let mut normal = t0.cross(axis).normalize_or_zero();
    normal = t0.cross(normal).normalize_or_zero();

    let mut frames = Vec::with_capacity(segments + 1);
    frames.push(Frame {
        normal,
        binormal: t0.cross(normal),
    });
    for i in 1..=segments {
        let rot = Quat::from_rotation_arc(tangents[i - 1], tangents[i]);
        normal = (rot * normal).normalize_or_zero();
        frames.push(Frame {
            normal,
            binormal: tangents[i].cross(normal),
        });
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight() -> CatmullRom {
        CatmullRom::new(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -10.0)]).unwrap()
    }

    #[test]
    fn counts_follow_segments() {
        let tube = TubeMesh::sweep(&straight(), 4, 0.25, 8);
        assert_eq!(tube.vertices.len(), 5 * 9);
        assert_eq!(tube.draw_count(), 4 * 8 * 6);
        assert!((tube.length - 10.0).abs() < 1e-3);
    }

    #[test]
    fn vertices_sit_at_radius() {
        let curve = straight();
        let tube = TubeMesh::sweep(&curve, 4, 0.5, 8);
        for (i, ring) in tube.vertices.chunks(9).enumerate() {
            let center = curve.point(i as f32 / 4.0);
            for v in ring {
                let d = Vec3::from(v.position).distance(center);
                assert!((d - 0.5).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn draw_range_is_a_floor_of_the_fraction() {
        let tube = TubeMesh::sweep(&straight(), 4, 0.25, 8);
        assert_eq!(tube.draw_range(0.0), 0);
        assert_eq!(tube.draw_range(0.5), 96);
        assert_eq!(tube.draw_range(1.0), 192);
        assert_eq!(tube.draw_range(f32::NAN), 0);
    }
}
