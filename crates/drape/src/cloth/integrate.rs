//! Damped position Verlet.
//!
//! ```text
//! next = x + (x - x_prev) * damping + (gravity + force * inv_mass) * dt²
//! ```
//!
//! Velocity is never stored; it lives in the gap between `position` and
//! `previous`. Teleporting a particle (collision push-out, a grab) changes
//! its velocity unless `previous` is moved too.

use super::{Cloth, ClothSettings};

/// The step the integrator actually takes for a frame of `dt` seconds.
///
/// Returns `None` for a non-finite or non-positive `dt`, otherwise `dt`
/// clamped to `max`.
pub fn clamp_timestep(dt: f32, max: f32) -> Option<f32> {
    if !dt.is_finite() || dt <= 0.0 {
        return None;
    }
    Some(dt.min(max))
}

/// Advance every free particle by one Verlet step and clear accumulated
/// forces. Returns the timestep used, or `0.0` if the frame was skipped.
pub fn integrate(cloth: &mut Cloth, settings: &ClothSettings, dt: f32) -> f32 {
    let Some(dt) = clamp_timestep(dt, settings.max_timestep) else {
        if dt != 0.0 {
            log::warn!("Skipping cloth integration for invalid timestep {}", dt);
        }
        return 0.0;
    };
    let dt2 = dt * dt;

    for p in &mut cloth.particles {
        if !p.is_pinned() {
            let acceleration = settings.gravity + p.force * p.inv_mass;
            let next = p.position + (p.position - p.previous) * settings.damping + acceleration * dt2;
            p.previous = p.position;
            p.position = next;
        }
        p.force = crate::math::Vec3::ZERO;
    }
    dt
}
