//! Particle-versus-collider resolution.
//!
//! Collision is positional: a particle found inside a collider is moved
//! to the surface plus a small skin (`epsilon`). Its `previous` position is
//! then rewritten so the part of its velocity pointing into the surface is
//! dropped while the tangential part survives. Without that step Verlet
//! would read the push-out as velocity and the cloth would bounce.

use super::{Cloth, Particle};
use crate::math::{Transform, Vec2, Vec3};
use crate::terrain::Terrain;

/// A rigid shape the cloth can rest on, captured for one frame.
#[derive(Debug, Clone)]
pub enum Collider {
    Sphere { center: Vec3, radius: f32 },
    Terrain { terrain: Terrain, transform: Transform },
}

/// Push `p` out of a sphere. Returns `true` if it was inside.
pub fn resolve_sphere(p: &mut Particle, center: Vec3, radius: f32, epsilon: f32) -> bool {
    let offset = p.position - center;
    let distance = offset.length();
    let surface = radius + epsilon;
    if distance >= surface {
        return false;
    }
    // At the exact center any direction is as good as another.
    let normal = if distance > 1e-6 { offset / distance } else { Vec3::Y };

    let mut velocity = p.velocity();
    let inward = velocity.dot(normal);
    if inward < 0.0 {
        velocity -= normal * inward;
    }
    p.position = center + normal * surface;
    p.previous = p.position - velocity;
    true
}

/// Lift `p` above a terrain surface. Returns `true` if it was below.
///
/// Particles outside the terrain's footprint are left alone.
pub fn resolve_terrain(p: &mut Particle, terrain: &Terrain, transform: &Transform, epsilon: f32) -> bool {
    let Some(height) = terrain.sample_height(transform, Vec2::new(p.position.x, p.position.z)) else {
        return false;
    };
    let floor = height + epsilon;
    if p.position.y >= floor {
        return false;
    }
    let mut velocity = p.velocity();
    if velocity.y < 0.0 {
        velocity.y = 0.0;
    }
    p.position.y = floor;
    p.previous = p.position - velocity;
    true
}

/// Resolve every free particle against every collider, in order.
/// Returns the number of contacts fixed up.
pub fn resolve_collisions(cloth: &mut Cloth, colliders: &[Collider], epsilon: f32) -> usize {
    let mut contacts = 0;
    for p in cloth.particles.iter_mut().filter(|p| !p.is_pinned()) {
        for collider in colliders {
            let hit = match collider {
                Collider::Sphere { center, radius } => resolve_sphere(p, *center, *radius, epsilon),
                Collider::Terrain { terrain, transform } => resolve_terrain(p, terrain, transform, epsilon),
            };
            contacts += usize::from(hit);
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloth::{ClothBuilder, PinPattern};
    use crate::terrain::HeightField;

    const EPS: f32 = 0.01;

    #[test]
    fn outside_sphere_is_untouched() {
        let mut p = Particle::new(Vec3::new(0.0, 2.0, 0.0), 1.0);
        assert!(!resolve_sphere(&mut p, Vec3::ZERO, 1.0, EPS));
        assert_eq!(p.position.y, 2.0);
    }

    #[test]
    fn inside_sphere_is_pushed_to_skin() {
        let mut p = Particle::new(Vec3::new(0.0, 0.5, 0.0), 1.0);
        p.previous = Vec3::new(0.1, 0.6, 0.0);
        assert!(resolve_sphere(&mut p, Vec3::ZERO, 1.0, EPS));
        assert!((p.position.length() - (1.0 + EPS)).abs() < 1e-6);
        // Inward (downward) motion removed, sideways motion kept.
        let v = p.velocity();
        assert!(v.y.abs() < 1e-6);
        assert!((v.x - -0.1).abs() < 1e-6);
    }

    #[test]
    fn outward_velocity_is_kept() {
        let mut p = Particle::new(Vec3::new(0.0, 0.9, 0.0), 1.0);
        p.previous = Vec3::new(0.0, 0.8, 0.0);
        resolve_sphere(&mut p, Vec3::ZERO, 1.0, EPS);
        assert!((p.velocity().y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn particle_at_center_goes_up() {
        let c = Vec3::new(2.0, -1.2, 0.0);
        let mut p = Particle::new(c, 1.0);
        assert!(resolve_sphere(&mut p, c, 1.0, EPS));
        assert!(p.position.distance(c + Vec3::Y * (1.0 + EPS)) < 1e-6);
    }

    #[test]
    fn terrain_lifts_and_kills_downward_motion() {
        let terrain = Terrain::new(HeightField::flat(4, 4, 0.5));
        let transform = Transform::IDENTITY.with_scale(10.0);
        let mut p = Particle::new(Vec3::new(1.0, 0.0, 1.0), 1.0);
        p.previous = Vec3::new(0.9, 0.2, 1.0);
        assert!(resolve_terrain(&mut p, &terrain, &transform, EPS));
        let expected = 0.5 * 10.0 + EPS;
        assert!((p.position.y - expected).abs() < 1e-5);
        assert!(p.velocity().y.abs() < 1e-6);
        assert!((p.velocity().x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn terrain_ignores_particles_outside_footprint() {
        let terrain = Terrain::new(HeightField::flat(4, 4, 1.0));
        let mut p = Particle::new(Vec3::new(50.0, -10.0, 0.0), 1.0);
        assert!(!resolve_terrain(&mut p, &terrain, &Transform::IDENTITY, EPS));
        assert_eq!(p.position.y, -10.0);
    }

    #[test]
    fn pinned_particles_are_skipped() {
        let mut cloth = ClothBuilder::new(1, 2)
            .size(1.0, 0.0)
            .origin(Vec3::new(-0.5, 0.0, 0.0))
            .pins(PinPattern::Explicit(vec![[0, 0]]))
            .build()
            .unwrap();
        let colliders = [Collider::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        }];
        let contacts = resolve_collisions(&mut cloth, &colliders, EPS);
        assert_eq!(contacts, 1);
        assert_eq!(cloth.particles()[0].position, Vec3::new(-0.5, 0.0, 0.0));
        assert!((cloth.particles()[1].position.length() - (1.0 + EPS)).abs() < 1e-5);
    }
}
