//! # World — The Entity Registry
//!
//! The [`World`] owns all entities, their components, and global resources.
//! It's the single source of truth for the scene, and the only channel through
//! which systems talk to each other.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ World                                               │
//! │                                                     │
//! │  records: Vec<EntityRecord>                         │
//! │    index = Entity handle, insertion order           │
//! │    each record = ComponentMask + inline slots       │
//! │                                                     │
//! │  resources: HashMap<TypeId, Box<dyn Any>>           │
//! │    singleton data not tied to an entity             │
//! │                                                     │
//! │  names: HashMap<String, Entity>                     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Iteration Order
//!
//! Records are never removed or reordered, so iterating `0..entity_count()`
//! visits entities in the order they were spawned, every frame. Systems may
//! rely on an index staying put for the whole run.
//!
//! ## Resources
//!
//! Resources are "global" data: the [`ClothSettings`](crate::cloth::ClothSettings),
//! keyboard/mouse [`Input`](crate::input::Input) state, the cursor position.
//! They're stored as type-erased `Box<dyn Any>` keyed by `TypeId`, which is
//! simpler than making them entities with special components.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::component::{Component, ComponentMask};
use super::entity::{Entity, EntityRecord};

/// The central container for all scene state.
pub struct World {
    records: Vec<EntityRecord>,
    /// Global resources (singletons), keyed by TypeId.
    resources: HashMap<TypeId, Box<dyn Any>>,
    /// Named entity lookup: name → entity.
    names: HashMap<String, Entity>,
}

impl World {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            resources: HashMap::new(),
            names: HashMap::new(),
        }
    }

    // ── Resources ────────────────────────────────────────────────────

    /// Insert a resource (singleton value). Replaces any existing resource of
    /// the same type.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.resources.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a shared reference to a resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted. Systems use
    /// [`get_resource`](Self::get_resource) instead.
    pub fn resource<T: 'static + Send + Sync>(&self) -> &T {
        self.get_resource::<T>().unwrap_or_else(|| {
            panic!(
                "Resource `{}` not found. Did you forget to insert it?",
                std::any::type_name::<T>()
            )
        })
    }

    /// Get a mutable reference to a resource.
    ///
    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> &mut T {
        self.get_resource_mut::<T>().unwrap_or_else(|| {
            panic!(
                "Resource `{}` not found. Did you forget to insert it?",
                std::any::type_name::<T>()
            )
        })
    }

    /// Try to get a shared reference to a resource. Returns `None` if not found.
    pub fn get_resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources
            .get(&TypeId::of::<T>())
            .and_then(|r| r.downcast_ref::<T>())
    }

    /// Try to get a mutable reference to a resource. Returns `None` if not found.
    pub fn get_resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources
            .get_mut(&TypeId::of::<T>())
            .and_then(|r| r.downcast_mut::<T>())
    }

    /// Check if a resource exists.
    pub fn has_resource<T: 'static + Send + Sync>(&self) -> bool {
        self.resources.contains_key(&TypeId::of::<T>())
    }

    /// Remove a resource, taking ownership. Returns `None` if not present.
    ///
    /// Use this for the extract/reinsert pattern when a system needs a
    /// resource while also mutating entity records.
    pub fn resource_remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources
            .remove(&TypeId::of::<T>())
            .and_then(|r| r.downcast::<T>().ok())
            .map(|b| *b)
    }

    // ── Named Entities ─────────────────────────────────────────────

    /// Try to get the entity with the given name.
    pub fn try_named(&self, name: &str) -> Option<Entity> {
        self.names.get(name).copied()
    }

    /// Get the entity with the given name.
    ///
    /// # Panics
    ///
    /// Panics if no entity has that name.
    pub fn named(&self, name: &str) -> Entity {
        self.try_named(name)
            .unwrap_or_else(|| panic!("No entity named \"{}\"", name))
    }

    /// Assign a name to an entity. Returns `false` (and leaves the existing
    /// mapping alone) if the name is already taken.
    pub fn name_entity(&mut self, entity: Entity, name: &str) -> bool {
        if let Some(&existing) = self.names.get(name) {
            log::warn!(
                "Name \"{}\" is already used by {:?}; not assigning it to {:?}",
                name,
                existing,
                entity
            );
            return false;
        }
        self.names.insert(name.to_string(), entity);
        true
    }

    // ── Entity Management ────────────────────────────────────────────

    /// Spawn an entity with no components.
    pub fn spawn_empty(&mut self) -> Entity {
        let entity = Entity::from_index(self.records.len());
        self.records.push(EntityRecord::new(entity));
        entity
    }

    /// Spawn an entity with a bundle (tuple) of components.
    ///
    /// ```ignore
    /// let sphere = world.spawn((Transform::from_xyz(2.0, -1.2, 0.0), SphereCollision { radius: 1.0 }));
    /// ```
    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Entity {
        let entity = self.spawn_empty();
        let record = &mut self.records[entity.index as usize];
        bundle.insert_into(record);
        entity
    }

    /// Returns the number of entities.
    pub fn entity_count(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the handle refers to an entity in this world.
    pub fn contains(&self, entity: Entity) -> bool {
        (entity.index as usize) < self.records.len()
    }

    /// The record at a registry index (insertion order).
    pub fn entity_at(&self, index: usize) -> Option<&EntityRecord> {
        self.records.get(index)
    }

    /// Mutable record at a registry index (insertion order).
    pub fn entity_at_mut(&mut self, index: usize) -> Option<&mut EntityRecord> {
        self.records.get_mut(index)
    }

    /// The record for an entity handle.
    pub fn record(&self, entity: Entity) -> Option<&EntityRecord> {
        self.records.get(entity.index as usize)
    }

    /// Mutable record for an entity handle.
    pub fn record_mut(&mut self, entity: Entity) -> Option<&mut EntityRecord> {
        self.records.get_mut(entity.index as usize)
    }

    /// All records, in insertion order.
    pub fn records(&self) -> std::slice::Iter<'_, EntityRecord> {
        self.records.iter()
    }

    /// All records, mutably, in insertion order.
    pub fn records_mut(&mut self) -> std::slice::IterMut<'_, EntityRecord> {
        self.records.iter_mut()
    }

    /// Returns `true` if the entity exists and carries every component in `mask`.
    pub fn has_components(&self, entity: Entity, mask: ComponentMask) -> bool {
        self.record(entity)
            .is_some_and(|record| record.has_components(mask))
    }

    /// Collect all entities carrying every component in `mask`.
    pub fn entities_with(&self, mask: ComponentMask) -> Vec<Entity> {
        self.records
            .iter()
            .filter(|record| record.has_components(mask))
            .map(EntityRecord::entity)
            .collect()
    }

    /// Get a shared reference to a component on a specific entity.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.record(entity)?.get::<T>()
    }

    /// Get a mutable reference to a component on a specific entity.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.record_mut(entity)?.get_mut::<T>()
    }

    /// Insert a component on an existing entity. Returns `false` if the
    /// entity doesn't exist.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        match self.record_mut(entity) {
            Some(record) => {
                record.insert(component);
                true
            }
            None => false,
        }
    }

    /// Remove a component from an entity, returning it if present.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.record_mut(entity)?.remove::<T>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ── Bundle: spawn with multiple components ──────────────────────────

/// A group of components that can be inserted together.
///
/// Implemented for tuples of up to eight [`Component`]s.
pub trait Bundle {
    fn insert_into(self, record: &mut EntityRecord);
}

macro_rules! impl_bundle {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Bundle for ($($name,)+) {
            #[allow(non_snake_case)]
            fn insert_into(self, record: &mut EntityRecord) {
                let ($($name,)+) = self;
                $(record.insert($name);)+
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{SphereCollision, WorldSpaceMove};
    use crate::math::Transform;

    #[test]
    fn spawn_and_count() {
        let mut world = World::new();
        let a = world.spawn((Transform::from_xyz(1.0, 0.0, 0.0),));
        let b = world.spawn((
            Transform::from_xyz(2.0, 0.0, 0.0),
            SphereCollision { radius: 0.5 },
        ));
        assert_eq!(world.entity_count(), 2);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert!(world.has_components(b, ComponentMask::TRANSFORM | ComponentMask::SPHERE_COLLISION));
        assert!(!world.has_components(a, ComponentMask::SPHERE_COLLISION));
    }

    #[test]
    fn entity_at_follows_insertion_order() {
        let mut world = World::new();
        for i in 0..5 {
            world.spawn((Transform::from_xyz(i as f32, 0.0, 0.0),));
        }
        for i in 0..5 {
            let record = world.entity_at(i).unwrap();
            assert_eq!(record.entity().index() as usize, i);
            assert_eq!(record.get::<Transform>().unwrap().translation.x, i as f32);
        }
        assert!(world.entity_at(5).is_none());
    }

    #[test]
    fn resources() {
        let mut world = World::new();
        world.insert_resource(42u32);
        world.insert_resource(String::from("hello"));

        assert_eq!(*world.resource::<u32>(), 42);
        assert_eq!(world.resource::<String>(), "hello");

        *world.resource_mut::<u32>() = 99;
        assert_eq!(*world.resource::<u32>(), 99);
    }

    #[test]
    fn resource_remove_and_reinsert() {
        let mut world = World::new();
        world.insert_resource(String::from("hello"));

        let taken = world.resource_remove::<String>();
        assert_eq!(taken, Some(String::from("hello")));
        assert!(!world.has_resource::<String>());

        world.insert_resource(taken.unwrap());
        assert_eq!(world.resource::<String>(), "hello");

        assert_eq!(world.resource_remove::<u64>(), None);
    }

    #[test]
    fn get_and_get_mut_component() {
        let mut world = World::new();
        let e = world.spawn((Transform::default(), WorldSpaceMove { speed: 2.0 }));
        world.get_mut::<Transform>(e).unwrap().translation.x = 5.0;
        assert_eq!(world.get::<Transform>(e).unwrap().translation.x, 5.0);
        assert_eq!(world.get::<WorldSpaceMove>(e).unwrap().speed, 2.0);
        assert!(world.get::<SphereCollision>(e).is_none());
    }

    #[test]
    fn insert_and_remove_component() {
        let mut world = World::new();
        let e = world.spawn_empty();
        assert!(world.insert(e, SphereCollision { radius: 1.0 }));
        assert!(world.has_components(e, ComponentMask::SPHERE_COLLISION));
        let removed = world.remove::<SphereCollision>(e);
        assert_eq!(removed.map(|s| s.radius), Some(1.0));
        assert!(!world.has_components(e, ComponentMask::SPHERE_COLLISION));
    }

    #[test]
    fn unknown_entity_is_handled() {
        let mut world = World::new();
        let ghost = Entity::from_index(12);
        assert!(!world.contains(ghost));
        assert!(world.get::<Transform>(ghost).is_none());
        assert!(!world.insert(ghost, Transform::default()));
        assert!(!world.has_components(ghost, ComponentMask::EMPTY));
    }

    #[test]
    fn entities_with_mask() {
        let mut world = World::new();
        world.spawn((Transform::default(),));
        let sphere = world.spawn((Transform::default(), SphereCollision { radius: 1.0 }));
        world.spawn((SphereCollision { radius: 2.0 },));
        let found = world.entities_with(ComponentMask::TRANSFORM | ComponentMask::SPHERE_COLLISION);
        assert_eq!(found, vec![sphere]);
    }

    #[test]
    fn named_entity_lookup() {
        let mut world = World::new();
        let e = world.spawn_empty();
        assert!(world.name_entity(e, "cloth"));
        assert_eq!(world.named("cloth"), e);
        assert_eq!(world.try_named("missing"), None);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut world = World::new();
        let a = world.spawn_empty();
        let b = world.spawn_empty();
        assert!(world.name_entity(a, "sphere"));
        assert!(!world.name_entity(b, "sphere"));
        assert_eq!(world.named("sphere"), a);
    }

    #[test]
    #[should_panic(expected = "No entity named")]
    fn named_panics_on_missing() {
        let world = World::new();
        world.named("nope");
    }
}
