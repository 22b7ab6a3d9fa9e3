//! Resolve cloth particles against the scene's rigid colliders.

use crate::cloth::collide::{Collider, resolve_collisions};
use crate::cloth::{Cloth, ClothSettings};
use crate::components::SphereCollision;
use crate::ecs::{ComponentMask, System, World};
use crate::math::Transform;
use crate::terrain::Terrain;
use crate::time::FrameTime;

/// Pushes every free cloth particle out of every sphere and above every
/// terrain, once per frame, after the solver has run.
///
/// Colliders are snapshotted first (spheres, then terrains, each in entity
/// order), then each cloth is resolved against the whole list.
#[derive(Debug, Default)]
pub struct ClothCollisionSystem;

impl ClothCollisionSystem {
    const SPHERE: ComponentMask = ComponentMask::SPHERE_COLLISION.union(ComponentMask::TRANSFORM);
    const TERRAIN: ComponentMask = ComponentMask::TERRAIN.union(ComponentMask::TRANSFORM);

    /// Every collider in the world, captured for this frame.
    pub fn colliders(world: &World) -> Vec<Collider> {
        let spheres = world.records().filter(|r| r.has_components(Self::SPHERE)).filter_map(|r| {
            let sphere = r.get::<SphereCollision>()?;
            let transform = r.get::<Transform>()?;
            Some(Collider::Sphere {
                center: transform.translation,
                radius: sphere.radius,
            })
        });
        let terrains = world.records().filter(|r| r.has_components(Self::TERRAIN)).filter_map(|r| {
            Some(Collider::Terrain {
                terrain: r.get::<Terrain>()?.clone(),
                transform: *r.get::<Transform>()?,
            })
        });
        spheres.chain(terrains).collect()
    }
}

impl System for ClothCollisionSystem {
    fn update(&mut self, world: &mut World, _time: &FrameTime) {
        let colliders = Self::colliders(world);
        if colliders.is_empty() {
            return;
        }
        let epsilon = world
            .get_resource::<ClothSettings>()
            .map_or(ClothSettings::default().collision_epsilon, |s| s.collision_epsilon);

        for record in world.records_mut() {
            if !record.has_components(ComponentMask::CLOTH) {
                continue;
            }
            let entity = record.entity();
            if let Some(cloth) = record.get_mut::<Cloth>() {
                let contacts = resolve_collisions(cloth, &colliders, epsilon);
                if contacts > 0 {
                    log::trace!("{:?}: {} collision contacts", entity, contacts);
                }
            }
        }
    }
}
