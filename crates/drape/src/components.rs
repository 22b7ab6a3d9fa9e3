//! Gameplay components that aren't big enough for their own module.
//!
//! The cloth itself lives in [`cloth`](crate::cloth), terrain in
//! [`terrain`](crate::terrain), and [`Transform`](crate::math::Transform) in
//! [`math`](crate::math).

use serde::{Deserialize, Serialize};

use crate::ecs::Entity;
use crate::input::KeyCode;
use crate::math::Vec2;

/// A rigid sphere the cloth collides with, centered on the entity's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollision {
    /// Radius in world units. Transform scale is not applied.
    pub radius: f32,
}

/// Keeps an entity resting on a terrain's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainFollow {
    /// The entity carrying the [`Terrain`](crate::terrain::Terrain) to follow.
    pub terrain: Entity,
    /// Distance from the entity's origin to its bottom.
    pub half_height: f32,
}

/// Which keys drive an entity's [`MoveInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMap {
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl Default for InputMap {
    fn default() -> Self {
        Self {
            forward: KeyCode::ArrowUp,
            backward: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
        }
    }
}

/// Per-frame movement intent, written by the input system.
///
/// `axis.x` is right (+) / left (-), `axis.y` is forward (+) / backward (-).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    pub axis: Vec2,
}

/// Moves the entity along world X/Z from its [`MoveInput`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSpaceMove {
    /// Units per second.
    pub speed: f32,
}

/// A perspective camera. Its view comes from the entity's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees. Default: 45.
    pub fov_y: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
