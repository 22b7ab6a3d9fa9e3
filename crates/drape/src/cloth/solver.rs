//! Gauss-Seidel relaxation of distance links.
//!
//! Each link is projected in turn, and each projection sees the positions
//! left by the ones before it. One pass over all links is one iteration.
//! Convergence is not guaranteed in a fixed number of passes, so the cloth
//! stretches a little under load; more iterations means less stretch.
//!
//! The correction for a link is split by inverse mass, so a pinned end
//! (`inv_mass == 0`) never moves and a heavier particle moves less.

use super::{Cloth, Link, Particle};

/// Distance below which a link's direction is undefined and it is skipped.
const DEGENERATE_LENGTH: f32 = 1e-6;

/// Move the two ends of `link` so their distance equals its rest length.
pub fn project_link(particles: &mut [Particle], link: &Link) {
    let (pa, pb) = (particles[link.a], particles[link.b]);
    let w = pa.inv_mass + pb.inv_mass;
    if w == 0.0 {
        return;
    }
    let delta = pb.position - pa.position;
    let length = delta.length();
    if length < DEGENERATE_LENGTH {
        return;
    }
    let correction = delta * ((length - link.rest_length) / (length * w));
    particles[link.a].position += correction * pa.inv_mass;
    particles[link.b].position -= correction * pb.inv_mass;
}

/// Run `iterations` passes over every link, in creation order.
pub fn solve(cloth: &mut Cloth, iterations: usize) {
    let Cloth { particles, links, .. } = cloth;
    for _ in 0..iterations {
        for link in links.iter() {
            project_link(particles, link);
        }
    }
}

/// Largest `|distance - rest_length|` over all links.
pub fn max_link_error(cloth: &Cloth) -> f32 {
    cloth
        .links
        .iter()
        .map(|link| {
            let d = cloth.particles[link.a]
                .position
                .distance(cloth.particles[link.b].position);
            (d - link.rest_length).abs()
        })
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloth::{ClothBuilder, LinkKind, PinPattern};
    use crate::math::Vec3;

    fn link(a: usize, b: usize, rest_length: f32) -> Link {
        Link {
            a,
            b,
            rest_length,
            kind: LinkKind::Structural,
        }
    }

    #[test]
    fn equal_masses_split_correction() {
        let mut ps = [Particle::new(Vec3::ZERO, 1.0), Particle::new(Vec3::new(2.0, 0.0, 0.0), 1.0)];
        project_link(&mut ps, &link(0, 1, 1.0));
        assert!((ps[0].position.x - 0.5).abs() < 1e-6);
        assert!((ps[1].position.x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn pinned_end_takes_no_correction() {
        let mut ps = [Particle::pinned(Vec3::ZERO), Particle::new(Vec3::new(2.0, 0.0, 0.0), 1.0)];
        project_link(&mut ps, &link(0, 1, 1.0));
        assert_eq!(ps[0].position, Vec3::ZERO);
        assert!((ps[1].position.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn heavier_particle_moves_less() {
        // inv masses 1 and 3: the lighter end takes three quarters.
        let mut ps = [Particle::new(Vec3::ZERO, 1.0), Particle::new(Vec3::new(2.0, 0.0, 0.0), 3.0)];
        project_link(&mut ps, &link(0, 1, 1.0));
        assert!((ps[0].position.x - 0.25).abs() < 1e-6);
        assert!((ps[1].position.x - 1.25).abs() < 1e-6);
    }

    #[test]
    fn both_pinned_is_a_no_op() {
        let mut ps = [Particle::pinned(Vec3::ZERO), Particle::pinned(Vec3::new(2.0, 0.0, 0.0))];
        project_link(&mut ps, &link(0, 1, 1.0));
        assert_eq!(ps[1].position.x, 2.0);
    }

    #[test]
    fn coincident_particles_are_skipped() {
        let mut ps = [Particle::new(Vec3::ONE, 1.0), Particle::new(Vec3::ONE, 1.0)];
        project_link(&mut ps, &link(0, 1, 1.0));
        assert!(ps.iter().all(|p| p.position == Vec3::ONE));
    }

    fn stretched_chain() -> Cloth {
        let mut cloth = ClothBuilder::new(4, 1)
            .size(0.0, 3.0)
            .pins(PinPattern::TopRow)
            .build()
            .unwrap();
        for p in cloth.particles_mut() {
            p.position.y *= 1.5;
        }
        cloth
    }

    #[test]
    fn more_iterations_converge_further() {
        let mut last = f32::INFINITY;
        for iterations in [1, 2, 4, 8, 16, 64] {
            let mut cloth = stretched_chain();
            solve(&mut cloth, iterations);
            let err = max_link_error(&cloth);
            assert!(err <= last + 1e-6, "{} iterations: {} > {}", iterations, err, last);
            last = err;
        }
        assert!(last < 1e-4);
    }

    #[test]
    fn solve_keeps_pinned_particles() {
        let mut cloth = stretched_chain();
        solve(&mut cloth, 8);
        assert_eq!(cloth.particles()[0].position, Vec3::ZERO);
    }

    #[test]
    fn fresh_cloth_has_no_error() {
        let cloth = ClothBuilder::new(5, 5).bend(true).build().unwrap();
        assert!(max_link_error(&cloth) < 1e-6);
    }
}
