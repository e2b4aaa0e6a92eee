//! Camera composition.
//!
//! Exactly one base rule owns the camera each frame. Shake is added on top of the
//! base position and never written back into it, so when the shake ends the
//! camera sits exactly on its base pose.

use engine_core::{ease, Easing, Transform, Vec3};

use crate::config::{CameraConfig, FinalSceneConfig};
use crate::ending::chase_camera;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Intro,
    FreeFollow,
    EndingChase,
    FinalLookUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

#[derive(Debug)]
pub struct CameraRig {
    config: CameraConfig,
    scene: FinalSceneConfig,
    intro_elapsed: Option<f32>,
    anchor: Option<CameraPose>,
    look_up_elapsed: f32,
    base: CameraPose,
    pose: CameraPose,
    mode: CameraMode,
}

impl CameraRig {
    pub fn new(config: CameraConfig, scene: FinalSceneConfig) -> Self {
        Self {
            config,
            scene,
            intro_elapsed: None,
            anchor: None,
            look_up_elapsed: 0.0,
            base: CameraPose::default(),
            pose: CameraPose::default(),
            mode: CameraMode::FreeFollow,
        }
    }

    pub fn reconfigure(&mut self, config: CameraConfig, scene: FinalSceneConfig) {
        self.config = config;
        self.scene = scene;
    }

    pub fn start_intro(&mut self) {
        self.intro_elapsed = Some(0.0);
        self.mode = CameraMode::Intro;
    }

    pub fn intro_playing(&self) -> bool {
        self.intro_elapsed.is_some()
    }

    /// Advance the intro clock. Returns true on the frame the intro finishes.
    pub fn advance_intro(&mut self, dt: f32) -> bool {
        let Some(elapsed) = self.intro_elapsed.as_mut() else {
            return false;
        };
        *elapsed += dt.max(0.0);
        if *elapsed >= self.config.intro_duration {
            self.intro_elapsed = None;
            return true;
        }
        false
    }

    /// Freeze the current base pose as the final-scene anchor and begin the look-up.
    pub fn begin_final(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(self.base);
            self.look_up_elapsed = 0.0;
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn base(&self) -> CameraPose {
        self.base
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    fn select_mode(&self, ending_active: bool) -> CameraMode {
        if self.intro_playing() {
            CameraMode::Intro
        } else if self.anchor.is_some() {
            CameraMode::FinalLookUp
        } else if ending_active {
            CameraMode::EndingChase
        } else {
            CameraMode::FreeFollow
        }
    }

    fn chase(&self, character: &Transform, offset: Vec3) -> CameraPose {
        let (position, target) = chase_camera(character, self.config.chase_distance, offset);
        CameraPose { position, target }
    }

    fn intro_pose(&self, character: &Transform, elapsed: f32) -> CameraPose {
        let t = Easing::QuadInOut.apply(elapsed / self.config.intro_duration.max(0.01));
        let from = character.position + self.config.intro_start_offset();
        let to = self.chase(character, self.config.intro_end_offset()).position;
        CameraPose {
            position: from.lerp(to, t),
            target: character.position + Vec3::Y * self.config.look_height,
        }
    }

    fn look_up_pose(&mut self, anchor: CameraPose, dt: f32) -> CameraPose {
        self.look_up_elapsed += dt.max(0.0);
        let t = (self.look_up_elapsed - self.scene.look_up_delay) / self.scene.look_up_duration.max(0.01);
        let rise = ease(0.0, self.scene.look_up_y_offset, t, Easing::QuadInOut);
        CameraPose {
            position: anchor.position,
            target: anchor.target + Vec3::Y * rise,
        }
    }

    /// Pick the base rule for this frame, then add `shake`.
    pub fn compose(&mut self, dt: f32, character: &Transform, ending_active: bool, shake: Vec3) -> CameraPose {
        self.mode = self.select_mode(ending_active);
        self.base = match self.mode {
            CameraMode::Intro => self.intro_pose(character, self.intro_elapsed.unwrap_or(0.0)),
            CameraMode::FinalLookUp => match self.anchor {
                Some(anchor) => self.look_up_pose(anchor, dt),
                None => self.chase(character, self.config.chase_offset()),
            },
            CameraMode::EndingChase | CameraMode::FreeFollow => {
                self.chase(character, self.config.chase_offset())
            }
        };
        self.pose = CameraPose {
            position: self.base.position + shake,
            target: self.base.target,
        };
        self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> CameraRig {
        CameraRig::new(CameraConfig::default(), FinalSceneConfig::default())
    }

    fn character() -> Transform {
        Transform::from_position_yaw(Vec3::new(4.0, 1.0, -2.0), -std::f32::consts::FRAC_PI_2)
    }

    #[test]
    fn intro_flies_from_offset_to_chase() {
        let mut rig = rig();
        let c = character();
        rig.start_intro();
        let first = rig.compose(0.0, &c, false, Vec3::ZERO);
        assert_eq!(rig.mode(), CameraMode::Intro);
        assert!((first.position - (c.position + Vec3::new(-10.0, 4.0, 5.0))).length() < 1e-5);
        assert_eq!(first.target, c.position + Vec3::Y);

        assert!(!rig.advance_intro(3.9));
        assert!(rig.advance_intro(0.2));
        let after = rig.compose(0.0, &c, false, Vec3::ZERO);
        assert_eq!(rig.mode(), CameraMode::FreeFollow);
        assert_eq!(after.target, c.position);
    }

    #[test]
    fn modes_are_exclusive_by_state() {
        let mut rig = rig();
        let c = character();
        rig.compose(0.016, &c, false, Vec3::ZERO);
        assert_eq!(rig.mode(), CameraMode::FreeFollow);
        rig.compose(0.016, &c, true, Vec3::ZERO);
        assert_eq!(rig.mode(), CameraMode::EndingChase);
        rig.begin_final();
        rig.compose(0.016, &c, true, Vec3::ZERO);
        assert_eq!(rig.mode(), CameraMode::FinalLookUp);
    }

    #[test]
    fn shake_is_additive_and_leaves_no_drift() {
        let mut rig = rig();
        let c = character();
        let calm = rig.compose(0.016, &c, false, Vec3::ZERO);
        let shaken = rig.compose(0.016, &c, false, Vec3::new(0.3, -0.2, 0.1));
        assert_eq!(shaken.position, calm.position + Vec3::new(0.3, -0.2, 0.1));
        assert_eq!(rig.base().position, calm.position);
        let after = rig.compose(0.016, &c, false, Vec3::ZERO);
        assert_eq!(after, calm);
    }

    #[test]
    fn look_up_raises_target_and_holds() {
        let mut rig = rig();
        let mut c = character();
        let before = rig.compose(0.016, &c, false, Vec3::ZERO);
        rig.begin_final();

        // The anchor ignores further character motion.
        c.position.x -= 5.0;
        let half = rig.compose(0.5, &c, true, Vec3::ZERO);
        assert_eq!(half.position, before.position);
        assert!((half.target.y - (before.target.y + 10.0)).abs() < 1e-4);

        for _ in 0..10 {
            rig.compose(0.5, &c, true, Vec3::ZERO);
        }
        let held = rig.pose();
        assert!((held.target.y - (before.target.y + 20.0)).abs() < 1e-4);
    }
}
