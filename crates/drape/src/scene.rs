//! # Scene — Describe, Load, and Spawn
//!
//! A [`SceneDesc`] is plain data: the cloth settings plus lists of cloths,
//! spheres, an optional terrain, and the camera. It round-trips through JSON
//! with serde, and [`SceneDesc::spawn`] turns it into entities.
//!
//! ```ignore
//! let desc = SceneDesc::from_file("scenes/curtain.json")?;
//! let mut world = World::new();
//! let handles = desc.spawn(&mut world)?;
//! let mut schedule = scene::default_schedule(&handles);
//! ```
//!
//! ## File Format
//!
//! ```json
//! {
//!   "settings": { "solver_iterations": 8 },
//!   "cloths": [
//!     { "rows": 20, "cols": 20, "width": 2.0, "height": 2.0,
//!       "origin": [-1.0, 1.0, 0.0], "pins": "top_corners" }
//!   ],
//!   "spheres": [
//!     { "position": [2.0, -1.2, 0.0], "radius": 1.0, "drive": { "speed": 1.0 } }
//!   ],
//!   "terrain": { "source": { "image": { "path": "height.png" } }, "size": [20.0, 2.0, 20.0] },
//!   "camera": { "position": [0.0, 0.0, 3.0] }
//! }
//! ```
//!
//! Every field has a default, so a file only spells out what it changes.
//! Top-level lists that are left out are empty. Relative heightmap paths
//! resolve against the scene file's directory.
//!
//! [`SceneDesc::default`] is the demo scene: a 20×20 cloth hanging from its
//! top corners in front of the camera, with a sphere beneath it that the
//! arrow keys slide around.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cloth::{ClothBuilder, ClothOrientation, ClothSettings, PinPattern};
use crate::components::InputMap;
use crate::ecs::{Entity, Schedule, World};
use crate::error::SceneError;
use crate::input::{CursorPosition, Input, KeyCode, MouseButton, Viewport};
use crate::math::Vec3;
use crate::prefabs;
use crate::systems::{
    CameraControlSystem, ClothCollisionSystem, ClothMeshSystem, ClothPhysicsSystem, InputSystem,
    MousePickingSystem, TerrainFollowSystem, WorldSpaceMoveSystem,
};

// ── Descriptions ─────────────────────────────────────────────────────────

/// A complete scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub settings: ClothSettings,
    #[serde(default)]
    pub cloths: Vec<ClothDesc>,
    #[serde(default)]
    pub spheres: Vec<SphereDesc>,
    #[serde(default)]
    pub terrain: Option<TerrainDesc>,
    #[serde(default)]
    pub camera: CameraDesc,
    /// Directory relative heightmap paths resolve against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// One cloth grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothDesc {
    pub name: Option<String>,
    pub rows: usize,
    pub cols: usize,
    pub width: f32,
    pub height: f32,
    /// World position of the top-left particle.
    pub origin: Vec3,
    pub orientation: ClothOrientation,
    pub pins: PinPattern,
    pub particle_mass: f32,
    pub shear: bool,
    pub bend: bool,
}

/// A rigid collision sphere, optionally driven by the keyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereDesc {
    pub name: Option<String>,
    pub position: Vec3,
    pub radius: f32,
    /// Keyboard control along world X/Z. `None` for a static sphere.
    pub drive: Option<DriveDesc>,
    /// Rest on the scene's terrain, if there is one. Not allowed together
    /// with `drive`.
    pub follow_terrain: bool,
}

/// Keyboard control for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveDesc {
    /// Units per second.
    pub speed: f32,
    pub keys: InputMap,
}

/// Where a terrain's heights come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightSource {
    /// Level ground at a normalized height.
    Flat { height: f32 },
    /// A grayscale heightmap image.
    Image { path: PathBuf },
    /// Procedural rolling hills: `resolution²` samples, `frequency` bumps per side.
    Waves { resolution: usize, frequency: f32 },
}

/// A heightfield terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainDesc {
    pub name: Option<String>,
    pub source: HeightSource,
    /// Center of the footprint; `y` is the height of a 0 sample.
    pub position: Vec3,
    /// Footprint extent along X and Z, and height of a 1 sample along Y.
    pub size: Vec3,
}

/// The viewing camera and the controls attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Keyboard fly speed, units per second.
    pub speed: f32,
    /// Mouse picking radius, world units.
    pub pick_radius: f32,
}

impl Default for SceneDesc {
    fn default() -> Self {
        Self {
            settings: ClothSettings::default(),
            cloths: vec![ClothDesc::default()],
            spheres: vec![SphereDesc {
                drive: Some(DriveDesc::default()),
                ..SphereDesc::default()
            }],
            terrain: None,
            camera: CameraDesc::default(),
            base_dir: None,
        }
    }
}

impl Default for ClothDesc {
    fn default() -> Self {
        Self {
            name: None,
            rows: 20,
            cols: 20,
            width: 2.0,
            height: 2.0,
            origin: Vec3::new(-1.0, 1.0, 0.0),
            orientation: ClothOrientation::Vertical,
            pins: PinPattern::TopCorners,
            particle_mass: 1.0,
            shear: true,
            bend: false,
        }
    }
}

impl Default for SphereDesc {
    fn default() -> Self {
        Self {
            name: None,
            position: Vec3::new(2.0, -1.2, 0.0),
            radius: 1.0,
            drive: None,
            follow_terrain: false,
        }
    }
}

impl Default for DriveDesc {
    fn default() -> Self {
        Self {
            speed: 1.0,
            keys: InputMap::default(),
        }
    }
}

impl Default for TerrainDesc {
    fn default() -> Self {
        Self {
            name: None,
            source: HeightSource::Flat { height: 0.0 },
            position: Vec3::new(0.0, -2.5, 0.0),
            size: Vec3::new(20.0, 2.0, 20.0),
        }
    }
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            fov_y: 45.0,
            near: 0.1,
            far: 1000.0,
            speed: CameraControlSystem::DEFAULT_SPEED,
            pick_radius: MousePickingSystem::DEFAULT_PICK_RADIUS,
        }
    }
}

impl ClothDesc {
    /// The builder this description stands for.
    pub fn builder(&self) -> ClothBuilder {
        ClothBuilder::new(self.rows, self.cols)
            .size(self.width, self.height)
            .origin(self.origin)
            .orientation(self.orientation)
            .pins(self.pins.clone())
            .particle_mass(self.particle_mass)
            .shear(self.shear)
            .bend(self.bend)
    }
}

// ── Loading ──────────────────────────────────────────────────────────────

impl SceneDesc {
    /// Parse a scene from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scene file. Relative heightmap paths in it resolve
    /// against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut desc = Self::from_json(&json)?;
        desc.base_dir = path.parent().map(Path::to_path_buf);
        log::info!("Loaded scene '{}'", path.display());
        Ok(desc)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the scene to a file as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| SceneError::Io {
            path: path.to_owned(),
            source,
        })
    }

    /// Spawn every entity into `world` and install the shared resources.
    ///
    /// Existing input resources are kept, so a host can set up its window
    /// state before spawning. On error the world may hold the entities
    /// spawned before the failing one.
    pub fn spawn(&self, world: &mut World) -> Result<SceneHandles, SceneError> {
        world.insert_resource(self.settings.sanitized());
        if !world.has_resource::<Input<KeyCode>>() {
            world.insert_resource(Input::<KeyCode>::new());
        }
        if !world.has_resource::<Input<MouseButton>>() {
            world.insert_resource(Input::<MouseButton>::new());
        }
        if !world.has_resource::<CursorPosition>() {
            world.insert_resource(CursorPosition::default());
        }
        if !world.has_resource::<Viewport>() {
            world.insert_resource(Viewport::default());
        }

        let terrain = self
            .terrain
            .as_ref()
            .map(|desc| prefabs::spawn_terrain(world, desc, self.base_dir.as_deref()))
            .transpose()?;
        let camera = prefabs::spawn_camera(world, &self.camera);
        let cloths = self
            .cloths
            .iter()
            .map(|desc| prefabs::spawn_cloth(world, desc))
            .collect::<Result<Vec<_>, _>>()?;
        let spheres: Vec<Entity> = self
            .spheres
            .iter()
            .map(|desc| prefabs::spawn_sphere(world, desc, terrain))
            .collect::<Result<_, _>>()?;

        let handles = SceneHandles {
            camera,
            cloths,
            spheres,
            terrain,
            camera_speed: self.camera.speed,
            pick_radius: self.camera.pick_radius,
        };
        log::info!(
            "Spawned scene: {} cloth(s), {} sphere(s), terrain: {}, {} entities",
            handles.cloths.len(),
            handles.spheres.len(),
            handles.terrain.is_some(),
            world.entity_count()
        );
        Ok(handles)
    }
}

/// Handles to what [`SceneDesc::spawn`] created.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneHandles {
    pub camera: Entity,
    pub cloths: Vec<Entity>,
    pub spheres: Vec<Entity>,
    pub terrain: Option<Entity>,
    pub camera_speed: f32,
    pub pick_radius: f32,
}

/// The standard pipeline for a spawned scene, in its required order.
pub fn default_schedule(handles: &SceneHandles) -> Schedule {
    Schedule::new()
        .with_system(InputSystem)
        .with_system(TerrainFollowSystem)
        .with_system(WorldSpaceMoveSystem)
        .with_system(CameraControlSystem::new(handles.camera).with_speed(handles.camera_speed))
        .with_system(MousePickingSystem::new(handles.camera).with_pick_radius(handles.pick_radius))
        .with_system(ClothPhysicsSystem)
        .with_system(ClothCollisionSystem)
        .with_system(ClothMeshSystem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloth::{Cloth, ClothMesh};
    use crate::components::{MoveInput, SphereCollision, TerrainFollow, WorldSpaceMove};
    use crate::ecs::ComponentMask;
    use crate::math::Transform;
    use crate::terrain::Terrain;

    #[test]
    fn default_scene_matches_demo() {
        let mut world = World::new();
        let handles = SceneDesc::default().spawn(&mut world).unwrap();

        assert_eq!(handles.cloths.len(), 1);
        assert_eq!(handles.spheres.len(), 1);
        assert!(handles.terrain.is_none());

        let cloth = world.get::<Cloth>(handles.cloths[0]).unwrap();
        assert_eq!((cloth.rows(), cloth.cols()), (20, 20));
        assert_eq!(cloth.pinned_count(), 2);
        assert!(world.get::<ClothMesh>(handles.cloths[0]).is_some());

        let sphere = handles.spheres[0];
        assert_eq!(world.get::<SphereCollision>(sphere).unwrap().radius, 1.0);
        assert_eq!(
            world.get::<Transform>(sphere).unwrap().translation,
            Vec3::new(2.0, -1.2, 0.0)
        );
        assert!(world.has_components(
            sphere,
            ComponentMask::INPUT | ComponentMask::INPUT_MAP | ComponentMask::WORLD_SPACE_MOVE
        ));
        assert_eq!(world.get::<WorldSpaceMove>(sphere).unwrap().speed, 1.0);

        let cam = world.get::<Transform>(handles.camera).unwrap();
        assert_eq!(cam.translation, Vec3::new(0.0, 0.0, 3.0));
        assert!(world.has_resource::<ClothSettings>());
        assert!(world.has_resource::<Input<KeyCode>>());
    }

    #[test]
    fn default_schedule_order() {
        let mut world = World::new();
        let handles = SceneDesc::default().spawn(&mut world).unwrap();
        let schedule = default_schedule(&handles);
        assert_eq!(
            schedule.names(),
            vec![
                "InputSystem",
                "TerrainFollowSystem",
                "WorldSpaceMoveSystem",
                "CameraControlSystem",
                "MousePickingSystem",
                "ClothPhysicsSystem",
                "ClothCollisionSystem",
                "ClothMeshSystem",
            ]
        );
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let desc = SceneDesc::from_json(r#"{ "cloths": [ { "rows": 4, "cols": 6 } ] }"#).unwrap();
        assert!(desc.spheres.is_empty());
        assert!(desc.terrain.is_none());
        assert_eq!(desc.cloths[0].rows, 4);
        assert_eq!(desc.cloths[0].width, 2.0);
        assert_eq!(desc.settings, ClothSettings::default());
        assert_eq!(desc.camera, CameraDesc::default());
    }

    #[test]
    fn json_round_trip_keeps_scene() {
        let mut desc = SceneDesc::default();
        desc.terrain = Some(TerrainDesc {
            source: HeightSource::Waves {
                resolution: 16,
                frequency: 2.0,
            },
            ..TerrainDesc::default()
        });
        desc.cloths[0].pins = PinPattern::Hooks(3);
        let back = SceneDesc::from_json(&desc.to_json().unwrap()).unwrap();
        assert_eq!(back, desc);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = SceneDesc::from_json("{ \"cloths\": 3 }").unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }

    #[test]
    fn invalid_cloth_fails_spawn() {
        let desc = SceneDesc {
            cloths: vec![ClothDesc {
                rows: 0,
                ..ClothDesc::default()
            }],
            ..SceneDesc::default()
        };
        let err = desc.spawn(&mut World::new()).unwrap_err();
        assert!(matches!(err, SceneError::InvalidCloth(_)));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = SceneDesc::from_file("/nonexistent/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }

    #[test]
    fn terrain_followers_get_linked() {
        let desc = SceneDesc {
            terrain: Some(TerrainDesc::default()),
            spheres: vec![SphereDesc {
                follow_terrain: true,
                ..SphereDesc::default()
            }],
            ..SceneDesc::default()
        };
        let mut world = World::new();
        let handles = desc.spawn(&mut world).unwrap();
        let terrain = handles.terrain.unwrap();
        assert!(world.get::<Terrain>(terrain).is_some());
        let follow = world.get::<TerrainFollow>(handles.spheres[0]).unwrap();
        assert_eq!(follow.terrain, terrain);
        assert_eq!(follow.half_height, 1.0);
        assert!(world.get::<MoveInput>(handles.spheres[0]).is_none());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        SceneDesc::default().save(&path).unwrap();
        let loaded = SceneDesc::from_file(&path).unwrap();
        assert_eq!(loaded.base_dir.as_deref(), Some(dir.path()));
        assert_eq!(loaded.cloths, SceneDesc::default().cloths);
    }
}
