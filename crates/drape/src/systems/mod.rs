//! # Systems — The Per-Frame Pipeline
//!
//! Each system is a small struct implementing [`System`](crate::ecs::System).
//! It picks the entities it cares about by [`ComponentMask`](crate::ecs::ComponentMask)
//! and silently skips everything else. A system never panics on missing data:
//! an absent resource or a dangling handle just means there is nothing to do
//! this frame.
//!
//! ## Default Order
//!
//! [`scene::default_schedule`](crate::scene::default_schedule) registers them
//! like this:
//!
//! | # | System                   | Reads                           | Writes               |
//! |---|--------------------------|---------------------------------|----------------------|
//! | 1 | [`InputSystem`]          | `Input<KeyCode>`, `InputMap`    | `MoveInput`          |
//! | 2 | [`TerrainFollowSystem`]  | `Terrain`, `TerrainFollow`      | `Transform.y`        |
//! | 3 | [`WorldSpaceMoveSystem`] | `MoveInput`, `WorldSpaceMove`   | `Transform`          |
//! | 4 | [`CameraControlSystem`]  | `Input<KeyCode>`                | camera `Transform`   |
//! | 5 | [`MousePickingSystem`]   | cursor, camera, mouse buttons   | grabbed `Particle`   |
//! | 6 | [`ClothPhysicsSystem`]   | `ClothSettings`                 | `Cloth`              |
//! | 7 | [`ClothCollisionSystem`] | colliders' `Transform`          | `Cloth`              |
//! | 8 | [`ClothMeshSystem`]      | `Cloth`                         | `ClothMesh`          |
//!
//! Every row only reads what rows above it have already written this frame.
//! Collision runs after physics so the last word on a particle's position is
//! always "outside every collider"; the mesh runs last so the renderer sees
//! the resolved positions.

pub mod camera;
pub mod cloth;
pub mod collision;
pub mod input;
pub mod mesh;
pub mod movement;
pub mod picking;
pub mod terrain_follow;

pub use camera::CameraControlSystem;
pub use cloth::ClothPhysicsSystem;
pub use collision::ClothCollisionSystem;
pub use input::InputSystem;
pub use mesh::ClothMeshSystem;
pub use movement::WorldSpaceMoveSystem;
pub use picking::MousePickingSystem;
pub use terrain_follow::TerrainFollowSystem;

/// `Some(dt)` when `dt` is usable for moving things this frame.
pub(crate) fn usable_delta(dt: f32) -> Option<f32> {
    (dt.is_finite() && dt > 0.0).then_some(dt)
}
