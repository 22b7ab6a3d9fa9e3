//! # Cloth Mesh — Particles as a Vertex Buffer
//!
//! [`ClothMesh`] is the render-side mirror of a [`Cloth`]: one vertex per
//! particle, two triangles per grid cell. The index buffer is built once;
//! positions and normals are rewritten every frame from the simulation.
//!
//! ## Winding and Normals
//!
//! Each cell `(r, c)` becomes
//!
//! ```text
//!   i ──── i+1        triangles (i, i+cols, i+1)
//!   │ ╲     │                   (i+1, i+cols, i+cols+1)
//!   │   ╲   │
//!   i+cols ─ i+cols+1
//! ```
//!
//! which is counter-clockwise seen from the cloth's front: +Z for a hanging
//! cloth, +Y for one lying flat. Vertex normals are the area-weighted sum of
//! the face normals around each particle. Crumpled cloth can produce a zero
//! sum; such a vertex keeps its previous normal.
//!
//! UVs stretch `[0, 1]²` over the whole grid, `u` along columns and `v` down
//! the rows, so a texture covers the cloth exactly once.
//!
//! ## Comparison
//!
//! - **Bevy**: a `Mesh` asset with `ATTRIBUTE_POSITION`/`ATTRIBUTE_NORMAL`
//!   arrays mutated in place, marked changed for re-upload.
//! - **three.js ClothGeometry**: the same grid layout, `computeVertexNormals()`
//!   every frame.

use bytemuck::{Pod, Zeroable};

use super::Cloth;
use crate::math::Vec3;

/// Per-vertex data for the cloth: position, surface normal, texture UV.
///
/// 32 bytes, laid out like every other lit mesh vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ClothVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Render mesh for one cloth. Attach next to the [`Cloth`] component.
#[derive(Debug, Clone, Default)]
pub struct ClothMesh {
    vertices: Vec<ClothVertex>,
    indices: Vec<u32>,
}

impl ClothMesh {
    /// Build the mesh for `cloth`, including initial normals.
    pub fn for_cloth(cloth: &Cloth) -> Self {
        let (rows, cols) = (cloth.rows(), cloth.cols());
        let fraction = |i: usize, n: usize| if n > 1 { i as f32 / (n - 1) as f32 } else { 0.0 };

        let vertices = cloth
            .particles()
            .iter()
            .enumerate()
            .map(|(i, p)| ClothVertex {
                position: p.position.to_array(),
                normal: [0.0, 0.0, 1.0],
                uv: [fraction(i % cols, cols), fraction(i / cols, rows)],
            })
            .collect();

        let mut mesh = Self {
            vertices,
            indices: grid_indices(rows, cols),
        };
        mesh.update_from(cloth);
        mesh
    }

    /// Copy positions from `cloth` and recompute normals.
    ///
    /// If the particle count no longer matches, the mesh is rebuilt.
    pub fn update_from(&mut self, cloth: &Cloth) {
        if self.vertices.len() != cloth.particle_count() {
            *self = Self::for_cloth(cloth);
            return;
        }

        for (v, p) in self.vertices.iter_mut().zip(cloth.particles()) {
            v.position = p.position.to_array();
        }

        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            // Unnormalized: length is twice the triangle's area.
            let face = (pb - pa).cross(pc - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for (v, n) in self.vertices.iter_mut().zip(normals) {
            if let Some(n) = n.try_normalize() {
                v.normal = n.to_array();
            }
        }
    }

    pub fn vertices(&self) -> &[ClothVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex data as raw bytes, ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes (`u32` indices).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Triangle indices for a `rows × cols` particle grid.
pub fn grid_indices(rows: usize, cols: usize) -> Vec<u32> {
    let cells = rows.saturating_sub(1) * cols.saturating_sub(1);
    let mut indices = Vec::with_capacity(cells * 6);
    for r in 0..rows.saturating_sub(1) {
        for c in 0..cols.saturating_sub(1) {
            let i = (r * cols + c) as u32;
            let below = i + cols as u32;
            indices.extend_from_slice(&[i, below, i + 1, i + 1, below, below + 1]);
        }
    }
    indices
}
