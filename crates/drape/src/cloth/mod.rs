//! # Cloth — Particles Held Together by Distance Links
//!
//! A cloth is a `rows × cols` grid of point masses ([`Particle`]) joined by
//! distance constraints ([`Link`]). There are no springs with stiffness
//! constants and no velocities: each frame the simulation
//!
//! 1. **integrates** every free particle with a damped Verlet step
//!    ([`integrate`]),
//! 2. **relaxes** every link back toward its rest length a fixed number of
//!    times ([`solver`]),
//! 3. **resolves** particles against rigid colliders ([`collide`]), and
//! 4. hands the positions to the renderer as a vertex buffer ([`mesh`]).
//!
//! ## Topology
//!
//! ```text
//!  (0,0)───(0,1)───(0,2)      ─  structural (horizontal, vertical)
//!    │ ╲   ╱ │ ╲   ╱ │        ╲╱ shear (both diagonals)
//!    │  ╳    │  ╳    │        bend links skip one particle (optional)
//!    │ ╱   ╲ │ ╱   ╲ │
//!  (1,0)───(1,1)───(1,2)
//! ```
//!
//! Links are generated once, row-major, by [`builder::ClothBuilder`]. Their
//! rest length is the distance between the two particles at creation time
//! and never changes. Particles and links are never added or removed after
//! creation.
//!
//! ## Pinning
//!
//! A particle with `inv_mass == 0` is pinned: the integrator skips it, the
//! solver hands all of a link's correction to its partner, and the collision
//! resolver leaves it alone.
//!
//! ## Comparison
//!
//! - **Jakobsen, "Advanced Character Physics" (2001)**: the same Verlet +
//!   relaxation scheme; we add mass weighting and an explicit dt clamp.
//! - **XPBD**: adds per-constraint compliance so stiffness is independent of
//!   iteration count. Here the iteration count *is* the stiffness knob.

pub mod builder;
pub mod collide;
pub mod integrate;
pub mod mesh;
pub mod solver;

use serde::{Deserialize, Serialize};

use crate::math::{Vec2, Vec3};

pub use builder::{ClothBuilder, ClothOrientation, PinPattern};
pub use collide::Collider;
pub use mesh::{ClothMesh, ClothVertex};

/// Gravitational acceleration, in world units per second squared.
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Fraction of the implicit velocity kept from one frame to the next.
pub const DEFAULT_DAMPING: f32 = 0.99;

/// Relaxation passes per frame. More passes make the cloth stiffer and cost
/// proportionally more.
pub const DEFAULT_SOLVER_ITERATIONS: usize = 5;

/// Largest timestep the integrator will take, in seconds. Longer frames
/// (hitches, debugger pauses) are simulated as this much time.
pub const DEFAULT_MAX_TIMESTEP: f32 = 1.0 / 30.0;

/// Upper bound accepted for `max_timestep`.
pub const MAX_TIMESTEP_CEILING: f32 = 0.1;

/// Upper bound accepted for `solver_iterations`.
pub const MAX_SOLVER_ITERATIONS: usize = 64;

/// Skin distance kept between particles and collider surfaces.
pub const DEFAULT_COLLISION_EPSILON: f32 = 0.01;

/// Tunables shared by every cloth in the world, stored as a resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothSettings {
    pub gravity: Vec3,
    pub damping: f32,
    pub solver_iterations: usize,
    pub max_timestep: f32,
    pub collision_epsilon: f32,
}

impl Default for ClothSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            damping: DEFAULT_DAMPING,
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            max_timestep: DEFAULT_MAX_TIMESTEP,
            collision_epsilon: DEFAULT_COLLISION_EPSILON,
        }
    }
}

impl ClothSettings {
    /// Replace out-of-range values with their defaults, logging each one.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut out = self;
        if !out.gravity.is_finite() {
            log::warn!("Cloth gravity {:?} is not finite; using {:?}", out.gravity, defaults.gravity);
            out.gravity = defaults.gravity;
        }
        if !(0.0..=1.0).contains(&out.damping) {
            log::warn!("Cloth damping {} outside [0, 1]; using {}", out.damping, defaults.damping);
            out.damping = defaults.damping;
        }
        if !(1..=MAX_SOLVER_ITERATIONS).contains(&out.solver_iterations) {
            log::warn!(
                "Cloth solver_iterations {} outside [1, {}]; using {}",
                out.solver_iterations,
                MAX_SOLVER_ITERATIONS,
                defaults.solver_iterations
            );
            out.solver_iterations = defaults.solver_iterations;
        }
        if !(out.max_timestep > 0.0 && out.max_timestep <= MAX_TIMESTEP_CEILING) {
            log::warn!(
                "Cloth max_timestep {} outside (0, {}]; using {}",
                out.max_timestep,
                MAX_TIMESTEP_CEILING,
                defaults.max_timestep
            );
            out.max_timestep = defaults.max_timestep;
        }
        if !(out.collision_epsilon.is_finite() && out.collision_epsilon >= 0.0) {
            log::warn!(
                "Cloth collision_epsilon {} is invalid; using {}",
                out.collision_epsilon,
                defaults.collision_epsilon
            );
            out.collision_epsilon = defaults.collision_epsilon;
        }
        out
    }
}

/// A point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Position one step ago. `position - previous` is the implicit velocity.
    pub previous: Vec3,
    /// `1 / mass`, or zero for a pinned particle.
    pub inv_mass: f32,
    /// External force accumulated for the next step, cleared by the integrator.
    pub force: Vec3,
}

impl Particle {
    /// A free particle at rest.
    pub fn new(position: Vec3, inv_mass: f32) -> Self {
        Self {
            position,
            previous: position,
            inv_mass,
            force: Vec3::ZERO,
        }
    }

    /// A pinned particle.
    pub fn pinned(position: Vec3) -> Self {
        Self::new(position, 0.0)
    }

    pub fn is_pinned(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Displacement over the last step.
    pub fn velocity(&self) -> Vec3 {
        self.position - self.previous
    }

    /// Teleport the particle and discard its velocity.
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
        self.previous = position;
    }
}

/// What a link stands for in the weave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Horizontal or vertical neighbour.
    Structural,
    /// Diagonal neighbour.
    Shear,
    /// Neighbour two steps away along a row or column.
    Bend,
}

/// A distance constraint between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub rest_length: f32,
    pub kind: LinkKind,
}

/// The cloth component: a particle grid plus its constraint graph.
#[derive(Debug, Clone)]
pub struct Cloth {
    rows: usize,
    cols: usize,
    spacing: Vec2,
    particles: Vec<Particle>,
    links: Vec<Link>,
}

impl Cloth {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Rest spacing between neighbouring columns (`x`) and rows (`y`).
    pub fn spacing(&self) -> Vec2 {
        self.spacing
    }

    /// Index of the particle at `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable particle access. Topology is fixed, so this is a slice.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn particle_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Add an external force to one particle for the next step.
    pub fn apply_force(&mut self, index: usize, force: Vec3) {
        if let Some(p) = self.particles.get_mut(index) {
            p.force += force;
        }
    }

    /// Add the same external force (e.g. wind) to every particle.
    pub fn apply_force_all(&mut self, force: Vec3) {
        for p in &mut self.particles {
            p.force += force;
        }
    }

    pub fn pinned_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_pinned()).count()
    }

    /// Axis-aligned bounds of all particle positions.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.particles.first()?.position;
        Some(self.particles.iter().fold((first, first), |(lo, hi), p| {
            (lo.min(p.position), hi.max(p.position))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults_are_sane() {
        let s = ClothSettings::default();
        assert_eq!(s.solver_iterations, DEFAULT_SOLVER_ITERATIONS);
        assert_eq!(s.sanitized(), s);
    }

    #[test]
    fn sanitize_replaces_invalid_values() {
        let s = ClothSettings {
            gravity: Vec3::new(f32::NAN, 0.0, 0.0),
            damping: 1.5,
            solver_iterations: 0,
            max_timestep: -1.0,
            collision_epsilon: f32::INFINITY,
        }
        .sanitized();
        assert_eq!(s, ClothSettings::default());
    }

    #[test]
    fn sanitize_bounds_timestep_and_iterations() {
        let s = ClothSettings {
            max_timestep: 1e6,
            solver_iterations: usize::MAX,
            ..ClothSettings::default()
        }
        .sanitized();
        assert_eq!(s.max_timestep, DEFAULT_MAX_TIMESTEP);
        assert_eq!(s.solver_iterations, DEFAULT_SOLVER_ITERATIONS);

        let edge = ClothSettings {
            max_timestep: MAX_TIMESTEP_CEILING,
            solver_iterations: MAX_SOLVER_ITERATIONS,
            ..ClothSettings::default()
        };
        assert_eq!(edge.sanitized(), edge);

        let nan = ClothSettings {
            max_timestep: f32::NAN,
            ..ClothSettings::default()
        };
        assert_eq!(nan.sanitized().max_timestep, DEFAULT_MAX_TIMESTEP);
    }

    #[test]
    fn settings_deserialize_with_partial_fields() {
        let s: ClothSettings = serde_json::from_str(r#"{ "solver_iterations": 12 }"#).unwrap();
        assert_eq!(s.solver_iterations, 12);
        assert_eq!(s.damping, DEFAULT_DAMPING);
        assert_eq!(s.gravity, GRAVITY);
    }

    #[test]
    fn particle_place_discards_velocity() {
        let mut p = Particle::new(Vec3::ZERO, 1.0);
        p.position = Vec3::X;
        assert_eq!(p.velocity(), Vec3::X);
        p.place(Vec3::Y);
        assert_eq!(p.velocity(), Vec3::ZERO);
        assert!(!p.is_pinned());
        assert!(Particle::pinned(Vec3::ZERO).is_pinned());
    }

    #[test]
    fn grid_indexing() {
        let cloth = ClothBuilder::new(3, 4).size(3.0, 2.0).build().unwrap();
        assert_eq!(cloth.index(0, 0), Some(0));
        assert_eq!(cloth.index(2, 3), Some(11));
        assert_eq!(cloth.index(3, 0), None);
        assert_eq!(cloth.index(0, 4), None);
        assert_eq!(cloth.particle_count(), 12);
    }

    #[test]
    fn forces_accumulate() {
        let mut cloth = ClothBuilder::new(1, 2).size(1.0, 0.0).build().unwrap();
        cloth.apply_force(1, Vec3::X);
        cloth.apply_force_all(Vec3::Y);
        assert_eq!(cloth.particles()[0].force, Vec3::Y);
        assert_eq!(cloth.particles()[1].force, Vec3::new(1.0, 1.0, 0.0));
        cloth.apply_force(99, Vec3::X);
    }
}
