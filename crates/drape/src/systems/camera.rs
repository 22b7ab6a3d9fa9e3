//! Free-fly keyboard camera.

use crate::ecs::{Entity, System, World};
use crate::input::{Input, KeyCode};
use crate::math::{Transform, Vec3};
use crate::time::FrameTime;

use super::usable_delta;

/// Moves one camera entity with the keyboard:
///
/// - `W` / `S`: along the camera's forward axis
/// - `A` / `D`: along its right axis
/// - `E` / `Q`: up and down world Y
///
/// Orientation is left alone; the camera keeps looking the way it was set up.
#[derive(Debug, Clone)]
pub struct CameraControlSystem {
    pub camera: Entity,
    /// Units per second.
    pub speed: f32,
}

impl CameraControlSystem {
    pub const DEFAULT_SPEED: f32 = 2.0;

    pub fn new(camera: Entity) -> Self {
        Self {
            camera,
            speed: Self::DEFAULT_SPEED,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

impl System for CameraControlSystem {
    fn update(&mut self, world: &mut World, time: &FrameTime) {
        let Some(dt) = usable_delta(time.delta) else {
            return;
        };
        let Some(keys) = world.get_resource::<Input<KeyCode>>() else {
            return;
        };
        let Some(transform) = world.get::<Transform>(self.camera) else {
            return;
        };

        let direction = transform.forward() * keys.axis(KeyCode::KeyS, KeyCode::KeyW)
            + transform.right() * keys.axis(KeyCode::KeyA, KeyCode::KeyD)
            + Vec3::Y * keys.axis(KeyCode::KeyQ, KeyCode::KeyE);
        let Some(direction) = direction.try_normalize() else {
            return;
        };
        let step = direction * self.speed * dt;

        if let Some(transform) = world.get_mut::<Transform>(self.camera) {
            transform.translation += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_camera() -> (World, Entity) {
        let mut world = World::new();
        let camera = world.spawn((Transform::from_xyz(0.0, 0.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),));
        world.insert_resource(Input::<KeyCode>::new());
        (world, camera)
    }

    fn position(world: &World, e: Entity) -> Vec3 {
        world.get::<Transform>(e).unwrap().translation
    }

    #[test]
    fn w_moves_toward_target() {
        let (mut world, camera) = world_with_camera();
        world.resource_mut::<Input<KeyCode>>().press(KeyCode::KeyW);
        let mut system = CameraControlSystem::new(camera).with_speed(1.0);
        system.update(&mut world, &FrameTime::fixed(0, 0.5));
        assert!(position(&world, camera).distance(Vec3::new(0.0, 0.0, 2.5)) < 1e-5);
    }

    #[test]
    fn diagonal_is_not_faster() {
        let (mut world, camera) = world_with_camera();
        {
            let keys = world.resource_mut::<Input<KeyCode>>();
            keys.press(KeyCode::KeyD);
            keys.press(KeyCode::KeyE);
        }
        let mut system = CameraControlSystem::new(camera).with_speed(1.0);
        system.update(&mut world, &FrameTime::fixed(0, 1.0));
        let moved = position(&world, camera) - Vec3::new(0.0, 0.0, 3.0);
        assert!((moved.length() - 1.0).abs() < 1e-5);
        assert!(moved.x > 0.0 && moved.y > 0.0);
    }

    #[test]
    fn no_keys_no_motion() {
        let (mut world, camera) = world_with_camera();
        CameraControlSystem::new(camera).update(&mut world, &FrameTime::fixed(0, 1.0));
        assert_eq!(position(&world, camera), Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn dangling_camera_is_ignored() {
        let (mut world, _) = world_with_camera();
        let not_there = Entity::from_index(42);
        world.resource_mut::<Input<KeyCode>>().press(KeyCode::KeyW);
        CameraControlSystem::new(not_there).update(&mut world, &FrameTime::fixed(0, 1.0));
    }
}
