//! Named numeric tuning fields for a debug panel.
//!
//! The typed config structs stay the source of truth; this is a thin reflection
//! layer on top. Values are clamped into each field's range, and the caller is
//! told which dependent geometry has to be rebuilt.

use crate::config::VignetteConfig;
use crate::error::{Result, VignetteError};

/// What has to happen after a field changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningEffect {
    /// Read live every frame; nothing to rebuild.
    Live,
    RebuildGuidance,
    RebuildDropLayout,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningField {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub effect: TuningEffect,
}

const fn field(name: &'static str, min: f32, max: f32, step: f32, effect: TuningEffect) -> TuningField {
    TuningField {
        name,
        min,
        max,
        step,
        effect,
    }
}

use TuningEffect::*;

/// Declares the field table and both accessors from one list so they cannot drift.
macro_rules! tuning_fields {
    ($( $name:literal => $($path:ident).+ : $kind:ident [$min:expr, $max:expr, $step:expr] $effect:ident ),+ $(,)?) => {
        pub const FIELDS: &[TuningField] = &[
            $( field($name, $min, $max, $step, $effect), )+
        ];

        fn read(config: &VignetteConfig, name: &str) -> Option<f32> {
            match name {
                $( $name => Some(config.$($path).+ as f32), )+
                _ => None,
            }
        }

        fn slot<'a>(config: &'a mut VignetteConfig, name: &str) -> Option<Slot<'a>> {
            match name {
                $( $name => Some(Slot::$kind(&mut config.$($path).+)), )+
                _ => None,
            }
        }
    };
}

tuning_fields! {
    "guidance.start_x" => guidance.start_x: F32 [-500.0, 500.0, 0.1] RebuildGuidance,
    "guidance.start_z" => guidance.start_z: F32 [-500.0, 500.0, 0.1] RebuildGuidance,
    "guidance.goal_x" => guidance.goal_x: F32 [-500.0, 500.0, 0.1] RebuildGuidance,
    "guidance.goal_z" => guidance.goal_z: F32 [-500.0, 500.0, 0.1] RebuildGuidance,
    "guidance.samples" => guidance.samples: U32 [20.0, 400.0, 1.0] RebuildGuidance,
    "guidance.width" => guidance.width: F32 [0.05, 2.0, 0.01] RebuildGuidance,
    "guidance.height_offset" => guidance.height_offset: F32 [0.0, 2.0, 0.01] RebuildGuidance,
    "guidance.opacity" => guidance.opacity: F32 [0.0, 1.0, 0.01] Live,
    "drop_text.word_spacing" => drop_text.word_spacing: F32 [0.0, 60.0, 0.5] RebuildDropLayout,
    "drop_text.left_extra_x" => drop_text.left_extra_x: F32 [-40.0, 40.0, 0.5] RebuildDropLayout,
    "drop_text.right_extra_x" => drop_text.right_extra_x: F32 [-40.0, 40.0, 0.5] RebuildDropLayout,
    "drop_text.gravity" => drop_text.gravity: F32 [50.0, 2000.0, 10.0] RebuildDropLayout,
    "drop_text.bounce" => drop_text.bounce: F32 [0.0, 0.95, 0.01] RebuildDropLayout,
    "drop_text.stop_velocity" => drop_text.stop_velocity: F32 [1.0, 200.0, 1.0] RebuildDropLayout,
    "drop_text.squash" => drop_text.squash: F32 [0.0, 0.6, 0.01] RebuildDropLayout,
    "final_scene.look_up_y_offset" => final_scene.look_up_y_offset: F32 [-50.0, 50.0, 0.5] Live,
    "movement.move_speed" => movement.move_speed: F32 [0.0, 20.0, 0.1] Live,
}

enum Slot<'a> {
    F32(&'a mut f32),
    U32(&'a mut u32),
}

pub fn find(name: &str) -> Result<&'static TuningField> {
    FIELDS
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| VignetteError::UnknownTuningField(name.to_string()))
}

pub fn get(config: &VignetteConfig, name: &str) -> Result<f32> {
    read(config, name).ok_or_else(|| VignetteError::UnknownTuningField(name.to_string()))
}

/// Set a field, clamped into range. Non-finite input is ignored (the field keeps
/// its value). Returns what needs rebuilding.
pub fn set(config: &mut VignetteConfig, name: &str, value: f32) -> Result<TuningEffect> {
    let field = find(name)?;
    if !value.is_finite() {
        log::warn!("Ignoring non-finite value for {}", name);
        return Ok(Live);
    }
    let clamped = value.clamp(field.min, field.max);
    match slot(config, name) {
        Some(Slot::F32(v)) => *v = clamped,
        Some(Slot::U32(v)) => *v = clamped.round() as u32,
        None => return Err(VignetteError::UnknownTuningField(name.to_string())),
    }
    Ok(field.effect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_field_resolves() {
        let mut config = VignetteConfig::default();
        for f in FIELDS {
            assert!(slot(&mut config, f.name).is_some(), "{} has no slot", f.name);
        }
    }

    #[test]
    fn set_clamps_and_reports_effect() {
        let mut config = VignetteConfig::default();
        assert_eq!(set(&mut config, "guidance.width", 9.0).unwrap(), RebuildGuidance);
        assert_eq!(config.guidance.width, 2.0);
        assert_eq!(set(&mut config, "drop_text.bounce", 0.5).unwrap(), RebuildDropLayout);
        assert_eq!(config.drop_text.bounce, 0.5);
        assert_eq!(set(&mut config, "guidance.samples", 33.6).unwrap(), RebuildGuidance);
        assert_eq!(config.guidance.samples, 34);
        assert_eq!(get(&config, "guidance.samples").unwrap(), 34.0);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut config = VignetteConfig::default();
        assert!(matches!(
            set(&mut config, "guidance.colour", 1.0),
            Err(VignetteError::UnknownTuningField(_))
        ));
        assert!(get(&config, "nope").is_err());
    }

    #[test]
    fn non_finite_is_ignored() {
        let mut config = VignetteConfig::default();
        set(&mut config, "guidance.opacity", f32::NAN).unwrap();
        assert_eq!(config.guidance.opacity, 0.9);
    }
}
