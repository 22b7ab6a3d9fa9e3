//! # System — Passes That Operate on the World
//!
//! A system is a unit of per-frame behaviour with three lifecycle hooks:
//! `begin_frame`, `update`, and `end_frame`. Systems own no entities. They
//! read and write component data in the [`World`] and nothing else; two
//! systems never hold references to each other.
//!
//! ## Schedule
//!
//! A [`Schedule`] is an ordered `Vec` of systems. One call to
//! [`run_frame`](Schedule::run_frame) drives one frame, phase by phase:
//!
//! ```text
//! begin_frame:  A ─► B ─► C
//! update:       A ─► B ─► C      (each receives the FrameTime)
//! end_frame:    A ─► B ─► C
//! ```
//!
//! Every `begin_frame` finishes before any `update` starts, and every
//! `update` finishes before any `end_frame` starts. Within a phase, systems
//! run in the order they were added.
//!
//! ## Order Is the Concurrency Model
//!
//! Everything runs on one thread with no locks. The only thing that keeps a
//! reader from seeing stale data is that its writer was registered earlier:
//! cloth physics before cloth collision before the mesh hand-off. Reordering
//! systems changes behaviour.
//!
//! ## Closures
//!
//! Any `FnMut(&mut World, &FrameTime)` is a system with no-op begin/end
//! hooks, handy for tests and one-off glue.

use super::world::World;
use crate::time::FrameTime;

/// A unit of per-frame behaviour executed by a [`Schedule`].
pub trait System {
    /// Called once per frame, before any system's `update`.
    fn begin_frame(&mut self, _world: &mut World) {}

    /// Called once per frame with the frame's timing.
    fn update(&mut self, world: &mut World, time: &FrameTime);

    /// Called once per frame, after every system's `update`.
    fn end_frame(&mut self, _world: &mut World) {}
}

/// Blanket impl: any `FnMut(&mut World, &FrameTime)` is a `System`.
impl<F: FnMut(&mut World, &FrameTime)> System for F {
    fn update(&mut self, world: &mut World, time: &FrameTime) {
        (self)(world, time);
    }
}

/// A boxed [`System`] with a short name for logs and diagnostics.
struct NamedSystem {
    name: String,
    system: Box<dyn System>,
}

/// Per-system timing recorded during a single frame (all three phases).
#[cfg(feature = "diagnostics")]
#[derive(Debug, Clone)]
pub struct SystemTiming {
    pub name: String,
    pub duration_us: f64,
}

/// An ordered list of systems to run every frame.
pub struct Schedule {
    systems: Vec<NamedSystem>,
    /// Per-system timings from the most recent `run_frame()` call.
    #[cfg(feature = "diagnostics")]
    timings: Vec<SystemTiming>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            #[cfg(feature = "diagnostics")]
            timings: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        let name = short_system_name(std::any::type_name::<S>());
        log::debug!("Registered system #{} `{}`", self.systems.len(), name);
        self.systems.push(NamedSystem {
            name,
            system: Box::new(system),
        });
    }

    /// Builder form of [`add_system`](Self::add_system).
    pub fn with_system<S: System + 'static>(mut self, system: S) -> Self {
        self.add_system(system);
        self
    }

    /// Run one frame: every system's `begin_frame`, then every `update`,
    /// then every `end_frame`, each phase in registration order.
    pub fn run_frame(&mut self, world: &mut World, time: &FrameTime) {
        #[cfg(feature = "diagnostics")]
        {
            use std::time::{Duration, Instant};

            let mut elapsed = vec![Duration::ZERO; self.systems.len()];
            for (ns, spent) in self.systems.iter_mut().zip(elapsed.iter_mut()) {
                let start = Instant::now();
                ns.system.begin_frame(world);
                *spent += start.elapsed();
            }
            for (ns, spent) in self.systems.iter_mut().zip(elapsed.iter_mut()) {
                let start = Instant::now();
                ns.system.update(world, time);
                *spent += start.elapsed();
            }
            for (ns, spent) in self.systems.iter_mut().zip(elapsed.iter_mut()) {
                let start = Instant::now();
                ns.system.end_frame(world);
                *spent += start.elapsed();
            }

            self.timings.clear();
            for (ns, spent) in self.systems.iter().zip(elapsed) {
                self.timings.push(SystemTiming {
                    name: ns.name.clone(),
                    duration_us: spent.as_secs_f64() * 1_000_000.0,
                });
            }
        }
        #[cfg(not(feature = "diagnostics"))]
        {
            for ns in &mut self.systems {
                ns.system.begin_frame(world);
            }
            for ns in &mut self.systems {
                ns.system.update(world, time);
            }
            for ns in &mut self.systems {
                ns.system.end_frame(world);
            }
        }
    }

    /// Per-system timings from the most recent frame.
    #[cfg(feature = "diagnostics")]
    pub fn timings(&self) -> &[SystemTiming] {
        &self.timings
    }

    /// System names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|ns| ns.name.as_str()).collect()
    }

    /// Returns the number of systems in this schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip the module path from a fully-qualified type name, keeping only the
/// last meaningful segment (e.g. `drape::systems::cloth::ClothPhysicsSystem`
/// → `ClothPhysicsSystem`, `{{closure}}` → `<closure>`).
fn short_system_name(full: &str) -> String {
    let name = full.rsplit("::").next().unwrap_or(full);
    if name.contains("closure") {
        "<closure>".to_string()
    } else {
        name.to_string()
    }
}
