//! World-axis movement from input.

use crate::components::{MoveInput, WorldSpaceMove};
use crate::ecs::{ComponentMask, System, World};
use crate::math::{Transform, Vec3};
use crate::time::FrameTime;

use super::usable_delta;

/// Moves entities along world X (right) and -Z (forward), ignoring their
/// own rotation. This is what slides the collision sphere around under the
/// cloth with the arrow keys.
#[derive(Debug, Default)]
pub struct WorldSpaceMoveSystem;

impl WorldSpaceMoveSystem {
    const MASK: ComponentMask = ComponentMask::TRANSFORM
        .union(ComponentMask::INPUT)
        .union(ComponentMask::WORLD_SPACE_MOVE);
}

impl System for WorldSpaceMoveSystem {
    fn update(&mut self, world: &mut World, time: &FrameTime) {
        let Some(dt) = usable_delta(time.delta) else {
            return;
        };
        for record in world.records_mut() {
            if !record.has_components(Self::MASK) {
                continue;
            }
            let (Some(input), Some(mover)) = (
                record.get::<MoveInput>().copied(),
                record.get::<WorldSpaceMove>().copied(),
            ) else {
                continue;
            };
            let step = (Vec3::X * input.axis.x - Vec3::Z * input.axis.y) * mover.speed * dt;
            if let Some(transform) = record.get_mut::<Transform>() {
                transform.translation += step;
            }
        }
    }
}
