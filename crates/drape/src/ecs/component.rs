//! # Component — Capability Masks and Inline Slots
//!
//! Every component kind the simulation knows about gets one bit in a
//! [`ComponentMask`] and one typed `Option` slot in [`ComponentSlots`]. An
//! entity carries a component exactly when its mask bit is set.
//!
//! ```text
//! EntityRecord
//! ├── mask:  TRANSFORM | SPHERE_COLLISION | INPUT | INPUT_MAP | WORLD_SPACE_MOVE
//! └── slots: transform: Some(..), cloth: None, sphere_collision: Some(..), ...
//! ```
//!
//! ## Why Not Archetypes?
//!
//! Archetype storage (hecs, bevy_ecs) groups entities by component signature
//! and pays for it with type-erased columns and moves on insert/remove. A
//! cloth scene has a handful of entities with a fixed, known set of component
//! kinds, so a closed set of typed slots is simpler, needs no `dyn Any`, and
//! makes "skip this entity if it lacks a capability" a single bit test.
//!
//! ## Adding a Component Kind
//!
//! 1. Add a bit to [`ComponentMask`].
//! 2. Add a slot to [`ComponentSlots`].
//! 3. Register it with the `component!` macro at the bottom of this file.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::cloth::Cloth;
use crate::cloth::mesh::ClothMesh;
use crate::components::{Camera, InputMap, MoveInput, SphereCollision, TerrainFollow, WorldSpaceMove};
use crate::math::Transform;
use crate::terrain::Terrain;

/// A set of component kinds, one bit per kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentMask(u32);

impl ComponentMask {
    pub const EMPTY: Self = Self(0);
    pub const TRANSFORM: Self = Self(1 << 0);
    pub const CLOTH: Self = Self(1 << 1);
    pub const CLOTH_MESH: Self = Self(1 << 2);
    pub const SPHERE_COLLISION: Self = Self(1 << 3);
    pub const TERRAIN: Self = Self(1 << 4);
    pub const TERRAIN_FOLLOW: Self = Self(1 << 5);
    pub const INPUT: Self = Self(1 << 6);
    pub const INPUT_MAP: Self = Self(1 << 7);
    pub const WORLD_SPACE_MOVE: Self = Self(1 << 8);
    pub const CAMERA: Self = Self(1 << 9);

    const NAMES: [(Self, &'static str); 10] = [
        (Self::TRANSFORM, "TRANSFORM"),
        (Self::CLOTH, "CLOTH"),
        (Self::CLOTH_MESH, "CLOTH_MESH"),
        (Self::SPHERE_COLLISION, "SPHERE_COLLISION"),
        (Self::TERRAIN, "TERRAIN"),
        (Self::TERRAIN_FOLLOW, "TERRAIN_FOLLOW"),
        (Self::INPUT, "INPUT"),
        (Self::INPUT_MAP, "INPUT_MAP"),
        (Self::WORLD_SPACE_MOVE, "WORLD_SPACE_MOVE"),
        (Self::CAMERA, "CAMERA"),
    ];

    /// Raw bit pattern.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ComponentMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for ComponentMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        let mut first = true;
        for (bit, name) in Self::NAMES {
            if self.contains(bit) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Inline, typed storage for every component kind. Only slots whose bit is
/// set in the owning record's mask are meaningful.
#[derive(Default)]
pub struct ComponentSlots {
    pub(crate) transform: Option<Transform>,
    pub(crate) cloth: Option<Cloth>,
    pub(crate) cloth_mesh: Option<ClothMesh>,
    pub(crate) sphere_collision: Option<SphereCollision>,
    pub(crate) terrain: Option<Terrain>,
    pub(crate) terrain_follow: Option<TerrainFollow>,
    pub(crate) move_input: Option<MoveInput>,
    pub(crate) input_map: Option<InputMap>,
    pub(crate) world_space_move: Option<WorldSpaceMove>,
    pub(crate) camera: Option<Camera>,
}

/// A type that can live in an entity's component slots.
///
/// Implemented for the closed set of component kinds via the `component!`
/// macro; user code doesn't implement this.
pub trait Component: Sized + 'static {
    /// The capability bit for this component kind.
    const MASK: ComponentMask;

    #[doc(hidden)]
    fn slot(slots: &ComponentSlots) -> &Option<Self>;

    #[doc(hidden)]
    fn slot_mut(slots: &mut ComponentSlots) -> &mut Option<Self>;
}

macro_rules! component {
    ($ty:ty, $mask:ident, $field:ident) => {
        impl Component for $ty {
            const MASK: ComponentMask = ComponentMask::$mask;

            fn slot(slots: &ComponentSlots) -> &Option<Self> {
                &slots.$field
            }

            fn slot_mut(slots: &mut ComponentSlots) -> &mut Option<Self> {
                &mut slots.$field
            }
        }
    };
}

component!(Transform, TRANSFORM, transform);
component!(Cloth, CLOTH, cloth);
component!(ClothMesh, CLOTH_MESH, cloth_mesh);
component!(SphereCollision, SPHERE_COLLISION, sphere_collision);
component!(Terrain, TERRAIN, terrain);
component!(TerrainFollow, TERRAIN_FOLLOW, terrain_follow);
component!(MoveInput, INPUT, move_input);
component!(InputMap, INPUT_MAP, input_map);
component!(WorldSpaceMove, WORLD_SPACE_MOVE, world_space_move);
component!(Camera, CAMERA, camera);
