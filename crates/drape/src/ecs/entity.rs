//! # Entity — Stable Handles and Per-Entity Records
//!
//! An [`Entity`] is just a number. It doesn't "contain" anything; the
//! [`World`](super::world::World) maps it to an [`EntityRecord`] that holds the
//! actual component data.
//!
//! ## Design: Static Registry, Stable Indices
//!
//! Scenes in this crate are built once at startup and never shrink: cloth
//! grids, colliders, and cameras live for the lifetime of the app. That lets a
//! handle be a plain index into the registry's `Vec`. Indices never move, so
//! a handle stored in a component (e.g. the terrain an entity follows) stays
//! valid for the whole run.
//!
//! ```text
//! World.records: [ rec0 | rec1 | rec2 | ... ]
//!                   ▲      ▲
//!      Entity(0) ───┘      └─── Entity(1)   (stored in TerrainFollow, etc.)
//! ```
//!
//! Generational indices (as in hecs or bevy_ecs) would only buy us stale
//! handle detection after despawn, and nothing here despawns.
//!
//! ## Records
//!
//! Each [`EntityRecord`] stores its components *inline* in a set of typed
//! optional slots, plus a [`ComponentMask`] saying which of those slots are
//! live. The mask is authoritative: a slot is only visible through
//! [`EntityRecord::get`] when its bit is set.

use std::fmt;

use super::component::{Component, ComponentMask, ComponentSlots};

/// A lightweight handle to an entity in the [`World`](super::world::World).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    pub(crate) index: u32,
}

impl Entity {
    pub(crate) fn from_index(index: usize) -> Self {
        Self {
            index: index as u32,
        }
    }

    /// Returns the raw registry index.
    pub fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.index)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

/// Component storage for a single entity.
pub struct EntityRecord {
    entity: Entity,
    mask: ComponentMask,
    pub(crate) slots: ComponentSlots,
}

impl EntityRecord {
    pub(crate) fn new(entity: Entity) -> Self {
        Self {
            entity,
            mask: ComponentMask::EMPTY,
            slots: ComponentSlots::default(),
        }
    }

    /// The handle of this entity.
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// The set of components this entity currently carries.
    pub fn mask(&self) -> ComponentMask {
        self.mask
    }

    /// Returns `true` if every bit in `mask` is present on this entity.
    pub fn has_components(&self, mask: ComponentMask) -> bool {
        self.mask.contains(mask)
    }

    /// Shared access to a component. `None` if the mask bit is not set.
    pub fn get<T: Component>(&self) -> Option<&T> {
        if !self.mask.contains(T::MASK) {
            return None;
        }
        T::slot(&self.slots).as_ref()
    }

    /// Mutable access to a component. `None` if the mask bit is not set.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        if !self.mask.contains(T::MASK) {
            return None;
        }
        T::slot_mut(&mut self.slots).as_mut()
    }

    /// Insert a component, replacing any existing value of the same kind.
    pub fn insert<T: Component>(&mut self, component: T) {
        *T::slot_mut(&mut self.slots) = Some(component);
        self.mask.insert(T::MASK);
    }

    /// Remove a component, returning it if it was present.
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        let had = self.mask.contains(T::MASK);
        self.mask.remove(T::MASK);
        let value = T::slot_mut(&mut self.slots).take();
        if had { value } else { None }
    }

    /// Split borrow of the mask and the raw slots, for systems that need two
    /// components of the same entity at once. Callers must check the mask.
    pub(crate) fn parts_mut(&mut self) -> (ComponentMask, &mut ComponentSlots) {
        (self.mask, &mut self.slots)
    }
}
