//! Snowfield terrain.
//!
//! `terrain_height` is the single gameplay height function: character clamping,
//! the guidance path, and the ending motion all sample it. The rendered ground mesh
//! uses the same function plus seeded per-vertex noise; the noise is visual only and
//! never feeds back into gameplay.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Ground height at world (x, z). Pure and deterministic.
#[inline]
pub fn terrain_height(x: f32, z: f32) -> f32 {
    let wave1 = (x * 0.08).sin() * (z * 0.08).cos() * 1.2;
    let wave2 = (x * 0.15 + z * 0.1).sin() * 0.6;
    wave1 + wave2
}

/// Vertex for the ground mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Configuration for the rendered ground plane.
#[derive(Debug, Clone)]
pub struct GroundConfig {
    /// Side length of the square plane in world units (centred on the origin).
    pub size: f32,
    /// Quads per side.
    pub segments: u32,
    /// Peak-to-peak amplitude of the per-vertex render noise.
    pub noise_amplitude: f32,
    /// Seed for the render noise.
    pub seed: u64,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 800.0,
            segments: 1000,
            noise_amplitude: 0.8,
            seed: 0,
        }
    }
}

impl GroundConfig {
    /// Lower-density plane for constrained devices.
    pub fn low_detail() -> Self {
        Self {
            segments: 220,
            ..Default::default()
        }
    }
}

/// Generated ground geometry.
#[derive(Debug)]
pub struct GroundMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
    pub config: GroundConfig,
}

impl GroundMesh {
    /// Build the ground grid: heights from `terrain_height` plus seeded noise in
    /// `[-amplitude/2, amplitude/2]`, with smooth vertex normals.
    pub fn generate(config: GroundConfig) -> Self {
        let segments = config.segments.max(1) as usize;
        let res = segments + 1;
        let step = config.size / segments as f32;
        let half = config.size / 2.0;
        let half_noise = config.noise_amplitude.abs() / 2.0;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut vertices = Vec::with_capacity(res * res);
        for gz in 0..res {
            for gx in 0..res {
                let x = gx as f32 * step - half;
                let z = gz as f32 * step - half;
                let noise = if half_noise > 0.0 {
                    rng.gen_range(-half_noise..=half_noise)
                } else {
                    0.0
                };
                vertices.push(TerrainVertex {
                    position: [x, terrain_height(x, z) + noise, z],
                    normal: [0.0, 1.0, 0.0],
                    uv: [gx as f32 / segments as f32, gz as f32 / segments as f32],
                });
            }
        }

        let mut indices = Vec::with_capacity(segments * segments * 6);
        for z in 0..segments {
            for x in 0..segments {
                let top_left = (z * res + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * res + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
            }
        }

        Self::calculate_normals(&mut vertices, res);
        log::debug!("Ground mesh: {} vertices, {} indices", vertices.len(), indices.len());

        Self {
            vertices,
            indices,
            config,
        }
    }

    fn calculate_normals(vertices: &mut [TerrainVertex], resolution: usize) {
        let mut normals: Vec<Vec3> = vec![Vec3::ZERO; vertices.len()];

        for z in 0..(resolution - 1) {
            for x in 0..(resolution - 1) {
                let i0 = z * resolution + x;
                let i1 = i0 + 1;
                let i2 = (z + 1) * resolution + x;
                let i3 = i2 + 1;

                let v0: Vec3 = vertices[i0].position.into();
                let v1: Vec3 = vertices[i1].position.into();
                let v2: Vec3 = vertices[i2].position.into();
                let v3: Vec3 = vertices[i3].position.into();

                let n1 = (v2 - v0).cross(v1 - v0).normalize_or_zero();
                normals[i0] += n1;
                normals[i2] += n1;
                normals[i1] += n1;

                let n2 = (v2 - v1).cross(v3 - v1).normalize_or_zero();
                normals[i1] += n2;
                normals[i2] += n2;
                normals[i3] += n2;
            }
        }

        for (i, vertex) in vertices.iter_mut().enumerate() {
            let n = normals[i].try_normalize().unwrap_or(Vec3::Y);
            vertex.normal = [n.x, n.y, n.z];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_reproducible_bit_for_bit() {
        for &(x, z) in &[(0.0, 0.0), (-100.0, 3.5), (12.25, -400.0), (1e4, 1e-3)] {
            let a = terrain_height(x, z);
            let b = terrain_height(x, z);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn height_matches_closed_form() {
        let (x, z) = (10.0_f32, -7.0_f32);
        let expected = (x * 0.08).sin() * (z * 0.08).cos() * 1.2 + (x * 0.15 + z * 0.1).sin() * 0.6;
        assert_eq!(terrain_height(x, z), expected);
        assert_eq!(terrain_height(0.0, 0.0), 0.0);
    }

    #[test]
    fn noiseless_ground_sits_on_gameplay_height() {
        let mesh = GroundMesh::generate(GroundConfig {
            size: 40.0,
            segments: 8,
            noise_amplitude: 0.0,
            seed: 1,
        });
        assert_eq!(mesh.vertices.len(), 81);
        assert_eq!(mesh.indices.len(), 8 * 8 * 6);
        for v in &mesh.vertices {
            assert_eq!(v.position[1], terrain_height(v.position[0], v.position[2]));
            assert!(v.normal[1] > 0.0, "normals should point up");
        }
    }

    #[test]
    fn flat_grid_normals_are_straight_up() {
        let res = 4;
        let mut vertices: Vec<TerrainVertex> = (0..res * res)
            .map(|i| TerrainVertex {
                position: [(i % res) as f32, 0.0, (i / res) as f32],
                normal: [0.0; 3],
                uv: [0.0; 2],
            })
            .collect();
        GroundMesh::calculate_normals(&mut vertices, res);
        for v in &vertices {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn render_noise_is_bounded_and_seeded() {
        let config = GroundConfig {
            size: 20.0,
            segments: 6,
            noise_amplitude: 0.8,
            seed: 42,
        };
        let a = GroundMesh::generate(config.clone());
        let b = GroundMesh::generate(config);
        for (va, vb) in a.vertices.iter().zip(&b.vertices) {
            assert_eq!(va.position, vb.position);
            let offset = va.position[1] - terrain_height(va.position[0], va.position[2]);
            assert!(offset.abs() <= 0.4 + 1e-5);
        }
    }
}
