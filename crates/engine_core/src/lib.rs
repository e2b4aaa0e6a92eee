//! Core engine types and utilities for Whiteout.
//!
//! This crate provides the foundational types used across all systems:
//! - Transform and spatial components
//! - Time management
//! - Colours and easing curves
//! - Components for the character mesh hierarchy

pub mod color;
pub mod components;
pub mod easing;
pub mod time;
pub mod transform;

pub use color::*;
pub use components::*;
pub use easing::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3};
pub use hecs::{Entity, World};
