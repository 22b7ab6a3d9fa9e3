//! Spawners for the scene's building blocks.
//!
//! Each function turns one description from [`scene`](crate::scene) into an
//! entity with the right component bundle, and names it if the description
//! carries a name.

use std::f32::consts::TAU;
use std::path::Path;

use crate::cloth::ClothMesh;
use crate::components::{Camera, MoveInput, SphereCollision, TerrainFollow, WorldSpaceMove};
use crate::ecs::{Entity, World};
use crate::error::SceneError;
use crate::math::{Transform, Vec3};
use crate::scene::{CameraDesc, ClothDesc, HeightSource, SphereDesc, TerrainDesc};
use crate::terrain::{HeightField, Terrain};

fn maybe_name(world: &mut World, entity: Entity, name: Option<&str>) {
    if let Some(name) = name {
        world.name_entity(entity, name);
    }
}

/// A cloth and its render mesh.
pub fn spawn_cloth(world: &mut World, desc: &ClothDesc) -> Result<Entity, SceneError> {
    let cloth = desc.builder().build()?;
    let mesh = ClothMesh::for_cloth(&cloth);
    log::debug!(
        "Cloth {}x{}: {} links, {} pinned",
        cloth.rows(),
        cloth.cols(),
        cloth.links().len(),
        cloth.pinned_count()
    );
    let entity = world.spawn((cloth, mesh));
    maybe_name(world, entity, desc.name.as_deref());
    Ok(entity)
}

/// A collision sphere. With a `drive`, the keyboard moves it; with
/// `follow_terrain` and a `terrain` to follow, it rests on the ground.
///
/// Both at once is an error: movement and terrain-follow would each write the
/// sphere's transform in the same frame.
pub fn spawn_sphere(world: &mut World, desc: &SphereDesc, terrain: Option<Entity>) -> Result<Entity, SceneError> {
    if desc.drive.is_some() && desc.follow_terrain {
        return Err(SceneError::InvalidSphere(format!(
            "{} cannot be both driven and terrain-following",
            desc.name.as_deref().unwrap_or("unnamed sphere")
        )));
    }
    let radius = if desc.radius.is_finite() && desc.radius >= 0.0 {
        desc.radius
    } else {
        log::warn!("Sphere radius {} is invalid; using 1", desc.radius);
        1.0
    };
    let entity = world.spawn((Transform::from_translation(desc.position), SphereCollision { radius }));

    if let Some(drive) = desc.drive {
        world.insert(entity, MoveInput::default());
        world.insert(entity, drive.keys);
        world.insert(entity, WorldSpaceMove { speed: drive.speed });
    }
    match (desc.follow_terrain, terrain) {
        (true, Some(terrain)) => {
            world.insert(
                entity,
                TerrainFollow {
                    terrain,
                    half_height: radius,
                },
            );
        }
        (true, None) => log::warn!("Sphere {:?} wants to follow terrain, but the scene has none", entity),
        _ => {}
    }
    maybe_name(world, entity, desc.name.as_deref());
    Ok(entity)
}

/// A heightfield terrain. Relative image paths resolve against `base_dir`.
pub fn spawn_terrain(world: &mut World, desc: &TerrainDesc, base_dir: Option<&Path>) -> Result<Entity, SceneError> {
    let field = match &desc.source {
        HeightSource::Flat { height } => HeightField::flat(2, 2, *height),
        HeightSource::Image { path } => match base_dir {
            Some(dir) if path.is_relative() => HeightField::from_image(dir.join(path))?,
            _ => HeightField::from_image(path)?,
        },
        HeightSource::Waves { resolution, frequency } => {
            let n = *resolution;
            let step = frequency * TAU / n.saturating_sub(1).max(1) as f32;
            HeightField::from_fn(n, n, |x, z| {
                0.5 + 0.5 * (x as f32 * step).sin() * (z as f32 * step).cos()
            })?
        }
    };
    if !desc.size.is_finite() || !desc.position.is_finite() {
        return Err(SceneError::InvalidTerrain(format!(
            "position {:?} and size {:?} must be finite",
            desc.position, desc.size
        )));
    }
    let transform = Transform {
        translation: desc.position,
        scale: desc.size,
        ..Transform::IDENTITY
    };
    let entity = world.spawn((Terrain::new(field), transform));
    maybe_name(world, entity, desc.name.as_deref());
    Ok(entity)
}

/// The viewing camera, looking at its target.
pub fn spawn_camera(world: &mut World, desc: &CameraDesc) -> Entity {
    let transform = Transform::from_translation(desc.position).looking_at(desc.target, Vec3::Y);
    world.spawn((
        transform,
        Camera {
            fov_y: desc.fov_y,
            near: desc.near,
            far: desc.far,
        },
    ))
}
