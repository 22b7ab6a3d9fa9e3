//! # Drape — Cloth Simulation on a Capability-Mask ECS
//!
//! A small simulation framework for position-based cloth: particle grids
//! integrated with Verlet, held together by relaxed distance links, and
//! pushed out of rigid spheres and heightfield terrain every frame. Around
//! that sit the pieces an interactive scene needs: keyboard movement, a fly
//! camera, mouse dragging, and a vertex buffer ready for a renderer.
//!
//! Start with `use drape::prelude::*` and build an [`App`](app::App) from a
//! [`SceneDesc`](scene::SceneDesc).
//!
//! ## Frame Pipeline
//!
//! ```text
//! Input → TerrainFollow → WorldSpaceMove → CameraControl → MousePicking
//!       → ClothPhysics (integrate, solve) → ClothCollision → ClothMesh
//! ```
//!
//! The order is the contract; see [`systems`].

pub mod app;
pub mod cloth;
pub mod components;
pub mod ecs;
pub mod error;
pub mod input;
pub mod math;
pub mod prefabs;
pub mod prelude;
pub mod scene;
pub mod systems;
pub mod terrain;
pub mod time;

/// Install `env_logger`, reading `RUST_LOG` and defaulting to `info`.
///
/// Safe to call more than once; later calls do nothing.
pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
