//! Keeps followers glued to the ground.

use crate::components::TerrainFollow;
use crate::ecs::{ComponentMask, Entity, System, World};
use crate::math::{Transform, Vec2};
use crate::terrain::Terrain;
use crate::time::FrameTime;

use super::usable_delta;

/// How quickly a follower converges on the ground, per second.
pub const FOLLOW_RATE: f32 = 50.0;

/// Eases each follower's `y` toward `ground + half_height`.
///
/// The blend factor is `min(dt * FOLLOW_RATE, 1)`, so at 60 fps a follower
/// closes most of the gap in one frame without snapping. If the follower is
/// off the terrain, or its terrain handle no longer points at a terrain, it
/// is left where it is.
///
/// Entities that also carry `WorldSpaceMove` are skipped: their transform
/// belongs to [`WorldSpaceMoveSystem`](super::WorldSpaceMoveSystem).
#[derive(Debug, Default)]
pub struct TerrainFollowSystem;

impl TerrainFollowSystem {
    const MASK: ComponentMask = ComponentMask::TERRAIN_FOLLOW.union(ComponentMask::TRANSFORM);

    fn ground_target(world: &World, follow: &TerrainFollow, position: Vec2) -> Option<f32> {
        let terrain = world.get::<Terrain>(follow.terrain)?;
        let placement = world.get::<Transform>(follow.terrain)?;
        Some(terrain.sample_height(placement, position)? + follow.half_height)
    }
}

impl System for TerrainFollowSystem {
    fn update(&mut self, world: &mut World, time: &FrameTime) {
        let Some(dt) = usable_delta(time.delta) else {
            return;
        };
        let factor = (dt * FOLLOW_RATE).min(1.0);

        let targets: Vec<(Entity, f32)> = world
            .records()
            .filter(|record| {
                record.has_components(Self::MASK) && !record.has_components(ComponentMask::WORLD_SPACE_MOVE)
            })
            .filter_map(|record| {
                let follow = record.get::<TerrainFollow>()?;
                let t = record.get::<Transform>()?.translation;
                let target = Self::ground_target(world, follow, Vec2::new(t.x, t.z))?;
                Some((record.entity(), target))
            })
            .collect();

        for (entity, target) in targets {
            if let Some(transform) = world.get_mut::<Transform>(entity) {
                let y = &mut transform.translation.y;
                *y += (target - *y) * factor;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::WorldSpaceMove;
    use crate::terrain::HeightField;

    fn setup(start_y: f32) -> (World, Entity) {
        let mut world = World::new();
        let ground = world.spawn((
            Terrain::new(HeightField::flat(4, 4, 0.5)),
            Transform::IDENTITY.with_scale(10.0),
        ));
        let follower = world.spawn((
            Transform::from_xyz(1.0, start_y, 1.0),
            TerrainFollow {
                terrain: ground,
                half_height: 1.0,
            },
        ));
        (world, follower)
    }

    fn y(world: &World, e: Entity) -> f32 {
        world.get::<Transform>(e).unwrap().translation.y
    }

    #[test]
    fn long_frame_snaps_to_ground() {
        let (mut world, e) = setup(20.0);
        TerrainFollowSystem.update(&mut world, &FrameTime::fixed(0, 0.1));
        assert!((y(&world, e) - 6.0).abs() < 1e-5);
    }

    #[test]
    fn short_frame_eases_toward_ground() {
        let (mut world, e) = setup(16.0);
        // factor = 0.01 * 50 = 0.5
        TerrainFollowSystem.update(&mut world, &FrameTime::fixed(0, 0.01));
        assert!((y(&world, e) - 11.0).abs() < 1e-4);
    }

    #[test]
    fn off_terrain_is_unchanged() {
        let (mut world, e) = setup(3.0);
        world.get_mut::<Transform>(e).unwrap().translation.x = 100.0;
        TerrainFollowSystem.update(&mut world, &FrameTime::fixed(0, 0.1));
        assert_eq!(y(&world, e), 3.0);
    }

    #[test]
    fn dangling_terrain_handle_is_ignored() {
        let mut world = World::new();
        let not_terrain = world.spawn((Transform::IDENTITY,));
        let e = world.spawn((
            Transform::from_xyz(0.0, 3.0, 0.0),
            TerrainFollow {
                terrain: not_terrain,
                half_height: 0.0,
            },
        ));
        TerrainFollowSystem.update(&mut world, &FrameTime::fixed(0, 0.1));
        assert_eq!(y(&world, e), 3.0);
    }

    #[test]
    fn moving_entities_are_left_to_movement() {
        let (mut world, e) = setup(16.0);
        world.insert(e, WorldSpaceMove { speed: 1.0 });
        TerrainFollowSystem.update(&mut world, &FrameTime::fixed(0, 0.1));
        assert_eq!(y(&world, e), 16.0);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let (mut world, e) = setup(16.0);
        TerrainFollowSystem.update(&mut world, &FrameTime::fixed(0, 0.0));
        assert_eq!(y(&world, e), 16.0);
    }
}
