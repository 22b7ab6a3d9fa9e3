//! Integrate and relax every cloth.

use crate::cloth::integrate::integrate;
use crate::cloth::solver::{max_link_error, solve};
use crate::cloth::{Cloth, ClothSettings};
use crate::ecs::{ComponentMask, System, World};
use crate::time::FrameTime;

/// Advances every [`Cloth`] by one Verlet step, then runs the constraint
/// solver `solver_iterations` times.
///
/// Settings come from the [`ClothSettings`] resource (defaults if absent).
/// At the start of each frame the resource is sanitized in place, so a bad
/// value is reported once and replaced, not re-reported every frame.
#[derive(Debug, Default)]
pub struct ClothPhysicsSystem;

impl System for ClothPhysicsSystem {
    fn begin_frame(&mut self, world: &mut World) {
        if let Some(settings) = world.get_resource_mut::<ClothSettings>() {
            *settings = settings.sanitized();
        }
    }

    fn update(&mut self, world: &mut World, time: &FrameTime) {
        let settings = world.get_resource::<ClothSettings>().copied().unwrap_or_default();

        for record in world.records_mut() {
            if !record.has_components(ComponentMask::CLOTH) {
                continue;
            }
            let entity = record.entity();
            let Some(cloth) = record.get_mut::<Cloth>() else {
                continue;
            };
            let dt = integrate(cloth, &settings, time.delta);
            if dt == 0.0 {
                continue;
            }
            if dt < time.delta {
                log::trace!("Clamped cloth step for {:?}: {} -> {}", entity, time.delta, dt);
            }
            solve(cloth, settings.solver_iterations);
            log::trace!("{:?} max link error {:.5}", entity, max_link_error(cloth));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloth::{ClothBuilder, PinPattern};
    use crate::math::Vec3;

    #[test]
    fn hanging_cloth_falls_but_pins_hold() {
        let mut world = World::new();
        let cloth = ClothBuilder::new(4, 4).size(1.0, 1.0).build().unwrap();
        let top_left = cloth.particles()[0].position;
        let bottom = cloth.particles()[12].position;
        let e = world.spawn((cloth,));

        let mut system = ClothPhysicsSystem;
        for frame in 0..30 {
            system.begin_frame(&mut world);
            system.update(&mut world, &FrameTime::fixed(frame, 1.0 / 60.0));
        }

        let cloth = world.get::<Cloth>(e).unwrap();
        assert_eq!(cloth.particles()[0].position, top_left);
        assert!(cloth.particles()[12].position.y <= bottom.y);
        assert!(cloth.particles().iter().all(|p| p.position.is_finite()));
    }

    #[test]
    fn uses_settings_resource() {
        let mut world = World::new();
        world.insert_resource(ClothSettings {
            gravity: Vec3::ZERO,
            ..ClothSettings::default()
        });
        let cloth = ClothBuilder::new(2, 2).pins(PinPattern::None).build().unwrap();
        let before: Vec<_> = cloth.particles().iter().map(|p| p.position).collect();
        let e = world.spawn((cloth,));

        ClothPhysicsSystem.update(&mut world, &FrameTime::fixed(0, 1.0 / 60.0));
        let after: Vec<_> = world
            .get::<Cloth>(e)
            .unwrap()
            .particles()
            .iter()
            .map(|p| p.position)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn begin_frame_sanitizes_settings() {
        let mut world = World::new();
        world.insert_resource(ClothSettings {
            solver_iterations: 0,
            ..ClothSettings::default()
        });
        ClothPhysicsSystem.begin_frame(&mut world);
        assert_eq!(world.resource::<ClothSettings>().solver_iterations, 5);
    }

    #[test]
    fn zero_dt_freezes_the_cloth() {
        let mut world = World::new();
        let cloth = ClothBuilder::new(2, 2).pins(PinPattern::None).build().unwrap();
        let e = world.spawn((cloth,));
        ClothPhysicsSystem.update(&mut world, &FrameTime::fixed(0, 0.0));
        let cloth = world.get::<Cloth>(e).unwrap();
        assert!(cloth.particles().iter().all(|p| p.velocity() == Vec3::ZERO));
    }
}
