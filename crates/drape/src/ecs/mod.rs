//! # Capability-Mask ECS
//!
//! A deliberately small Entity Component System for static scenes. Entities
//! are stable indices; each one stores its components inline, guarded by a
//! bitmask of capabilities. Systems run in a fixed order over the shared
//! [`World`].
//!
//! ## Module Overview
//!
//! - [`entity`] — Stable entity handles and per-entity records
//! - [`component`] — Capability masks and typed component slots
//! - [`world`] — Central registry (entities + resources)
//! - [`system`] — System trait and the fixed-order schedule

pub mod component;
pub mod entity;
pub mod system;
pub mod world;

pub use component::{Component, ComponentMask};
pub use entity::{Entity, EntityRecord};
pub use system::{Schedule, System};
pub use world::{Bundle, World};
