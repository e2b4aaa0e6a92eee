//! Transform component and utilities for spatial positioning.

use glam::{EulerRot, Quat, Vec3};

/// A 3D transform: position, Euler rotation (radians, XYZ order), and scale.
///
/// Rotation is kept as Euler angles because the motion code eases each axis
/// independently (pitch/yaw/roll tilts); the quaternion is derived on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians: x = pitch, y = yaw, z = roll.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with position and yaw.
    pub fn from_position_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Vec3::new(0.0, yaw, 0.0),
            ..Default::default()
        }
    }

    /// Rotation as a quaternion (XYZ intrinsic order).
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Rotate a local-space direction into world space.
    pub fn local_to_world_dir(&self, local: Vec3) -> Vec3 {
        self.quat() * local
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}
