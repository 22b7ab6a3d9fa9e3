//! Keyboard state to per-entity movement intent.

use crate::components::{InputMap, MoveInput};
use crate::ecs::{ComponentMask, System, World};
use crate::input::{Input, KeyCode, MouseButton};
use crate::math::Vec2;
use crate::time::FrameTime;

/// Writes [`MoveInput::axis`] from each entity's [`InputMap`], and ends every
/// frame by clearing the just-pressed/just-released sets.
#[derive(Debug, Default)]
pub struct InputSystem;

impl InputSystem {
    const MASK: ComponentMask = ComponentMask::INPUT.union(ComponentMask::INPUT_MAP);
}

impl System for InputSystem {
    fn update(&mut self, world: &mut World, _time: &FrameTime) {
        // Extract the resource so records can be borrowed mutably.
        let Some(keys) = world.resource_remove::<Input<KeyCode>>() else {
            return;
        };

        for record in world.records_mut() {
            if !record.has_components(Self::MASK) {
                continue;
            }
            let Some(map) = record.get::<InputMap>().copied() else {
                continue;
            };
            if let Some(input) = record.get_mut::<MoveInput>() {
                input.axis = Vec2::new(
                    keys.axis(map.left, map.right),
                    keys.axis(map.backward, map.forward),
                );
            }
        }

        world.insert_resource(keys);
    }

    fn end_frame(&mut self, world: &mut World) {
        if let Some(keys) = world.get_resource_mut::<Input<KeyCode>>() {
            keys.clear_just();
        }
        if let Some(buttons) = world.get_resource_mut::<Input<MouseButton>>() {
            buttons.clear_just();
        }
    }
}
