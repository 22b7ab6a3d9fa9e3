//! Convenience re-exports. `use drape::prelude::*` brings in the common items.

pub use crate::app::App;
pub use crate::cloth::{
    Cloth, ClothBuilder, ClothMesh, ClothOrientation, ClothSettings, ClothVertex, Collider, Link, LinkKind,
    Particle, PinPattern,
};
pub use crate::components::{Camera, InputMap, MoveInput, SphereCollision, TerrainFollow, WorldSpaceMove};
pub use crate::ecs::{Bundle, Component, ComponentMask, Entity, EntityRecord, Schedule, System, World};
pub use crate::error::SceneError;
pub use crate::input::{CursorPosition, Input, KeyCode, MouseButton, Viewport};
pub use crate::math::{Mat4, Quat, Ray, Transform, Vec2, Vec3, Vec4};
pub use crate::scene::{
    CameraDesc, ClothDesc, DriveDesc, HeightSource, SceneDesc, SceneHandles, SphereDesc, TerrainDesc,
    default_schedule,
};
pub use crate::systems::{
    CameraControlSystem, ClothCollisionSystem, ClothMeshSystem, ClothPhysicsSystem, InputSystem,
    MousePickingSystem, TerrainFollowSystem, WorldSpaceMoveSystem,
};
pub use crate::terrain::{HeightField, Terrain};
pub use crate::time::{FrameTime, Time};
