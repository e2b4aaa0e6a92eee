//! Components for the character model's mesh hierarchy.
//!
//! Each renderable piece of the character is an entity in a `hecs::World`; the
//! `Entity` id is the stable identifier used to cache per-mesh state such as the
//! material colour captured before a tint animation.

use crate::Color;

/// A named mesh belonging to the character model.
#[derive(Debug, Clone)]
pub struct MeshPart {
    pub name: String,
}

impl MeshPart {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Current material colour of a mesh. Written by animation, read by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialColor(pub Color);
