//! Hand the simulated cloth to the renderer.

use crate::ecs::{ComponentMask, System, World};
use crate::time::FrameTime;

/// Copies particle positions into each [`ClothMesh`](crate::cloth::ClothMesh)
/// and recomputes its normals. Runs last so the mesh shows resolved positions.
#[derive(Debug, Default)]
pub struct ClothMeshSystem;

impl ClothMeshSystem {
    const MASK: ComponentMask = ComponentMask::CLOTH.union(ComponentMask::CLOTH_MESH);
}

impl System for ClothMeshSystem {
    fn update(&mut self, world: &mut World, _time: &FrameTime) {
        for record in world.records_mut() {
            if !record.has_components(Self::MASK) {
                continue;
            }
            // Both components live on the same record; borrow the slots apart.
            let (_, slots) = record.parts_mut();
            if let (Some(cloth), Some(mesh)) = (slots.cloth.as_ref(), slots.cloth_mesh.as_mut()) {
                mesh.update_from(cloth);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloth::{Cloth, ClothBuilder, ClothMesh};
    use crate::math::Vec3;

    #[test]
    fn mesh_follows_cloth() {
        let mut world = World::new();
        let cloth = ClothBuilder::new(2, 2).build().unwrap();
        let mesh = ClothMesh::for_cloth(&cloth);
        let e = world.spawn((cloth, mesh));

        world.get_mut::<Cloth>(e).unwrap().particles_mut()[2].position = Vec3::new(0.0, -2.0, 0.5);
        ClothMeshSystem.update(&mut world, &FrameTime::fixed(0, 1.0 / 60.0));

        let mesh = world.get::<ClothMesh>(e).unwrap();
        assert_eq!(mesh.vertices()[2].position, [0.0, -2.0, 0.5]);
    }

    #[test]
    fn cloth_without_mesh_is_skipped() {
        let mut world = World::new();
        world.spawn((ClothBuilder::new(2, 2).build().unwrap(),));
        ClothMeshSystem.update(&mut world, &FrameTime::fixed(0, 1.0 / 60.0));
    }
}
