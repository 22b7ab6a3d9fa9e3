//! # Mouse Picking — Grabbing the Cloth
//!
//! Left-click casts a ray from the camera through the cursor and grabs the
//! free cloth particle closest to that ray (within [`pick_radius`]). While
//! the button is held, the particle is dragged along with the cursor, kept
//! at the depth where it was picked up:
//!
//! ```text
//!   camera ●─────────────── ray ─────────────►
//!           ╲           depth
//!            ╲ ├──────────────────┤
//!             ╲                   ◉ grabbed particle follows point_at(depth)
//! ```
//!
//! A grabbed particle is temporarily pinned (`inv_mass = 0`) so the solver
//! pulls the rest of the cloth toward it rather than the other way around.
//! Its own mass comes back on release. Particles that are already pinned are
//! never picked; releasing them would un-pin them.
//!
//! The ray is built by unprojecting the cursor's NDC position at the near
//! and far planes through the inverse view-projection matrix, the same
//! matrices a renderer builds for the camera.
//!
//! [`pick_radius`]: MousePickingSystem::pick_radius

use crate::cloth::Cloth;
use crate::components::Camera;
use crate::ecs::{ComponentMask, Entity, System, World};
use crate::input::{CursorPosition, Input, MouseButton, Viewport};
use crate::math::{Mat4, Ray, Transform, Vec3};
use crate::time::FrameTime;

/// The particle currently held by the mouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub cloth: Entity,
    pub particle: usize,
    /// Distance along the pick ray at which the particle was picked up.
    pub depth: f32,
    /// The particle's own inverse mass, restored on release.
    pub inv_mass: f32,
}

/// Drag cloth particles with the left mouse button.
#[derive(Debug, Clone)]
pub struct MousePickingSystem {
    pub camera: Entity,
    /// Largest distance between the ray and a particle that still grabs it.
    pub pick_radius: f32,
    grab: Option<Grab>,
}

impl MousePickingSystem {
    pub const DEFAULT_PICK_RADIUS: f32 = 0.1;

    pub fn new(camera: Entity) -> Self {
        Self {
            camera,
            pick_radius: Self::DEFAULT_PICK_RADIUS,
            grab: None,
        }
    }

    pub fn with_pick_radius(mut self, radius: f32) -> Self {
        self.pick_radius = radius;
        self
    }

    /// The particle being dragged, if any.
    pub fn grab(&self) -> Option<Grab> {
        self.grab
    }

    /// World-space ray under the cursor, or `None` if the camera or its
    /// matrices are unusable.
    pub fn cursor_ray(&self, world: &World) -> Option<Ray> {
        let transform = world.get::<Transform>(self.camera)?;
        let camera = world.get::<Camera>(self.camera).copied().unwrap_or_default();
        let viewport = world.get_resource::<Viewport>().copied().unwrap_or_default();
        let cursor = world.get_resource::<CursorPosition>().copied().unwrap_or_default();
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }

        let view = Mat4::from_rotation_translation(transform.rotation, transform.translation).inverse();
        let projection = Mat4::perspective_rh(camera.fov_y.to_radians(), viewport.aspect(), camera.near, camera.far);
        let unproject = (projection * view).inverse();
        if !unproject.is_finite() {
            return None;
        }

        let ndc_x = 2.0 * cursor.x / viewport.width - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.y / viewport.height;
        let near = unproject.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = unproject.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, far - near)
    }

    fn pick(&self, world: &World, ray: &Ray) -> Option<Grab> {
        let mut best: Option<(f32, Grab)> = None;
        for record in world.records() {
            if !record.has_components(ComponentMask::CLOTH) {
                continue;
            }
            let Some(cloth) = record.get::<Cloth>() else {
                continue;
            };
            for (index, p) in cloth.particles().iter().enumerate() {
                if p.is_pinned() {
                    continue;
                }
                let depth = ray.closest_t(p.position);
                if depth <= 0.0 {
                    continue;
                }
                let miss = ray.distance_to_point(p.position);
                if miss > self.pick_radius {
                    continue;
                }
                if best.is_none_or(|(d, _)| miss < d) {
                    best = Some((
                        miss,
                        Grab {
                            cloth: record.entity(),
                            particle: index,
                            depth,
                            inv_mass: p.inv_mass,
                        },
                    ));
                }
            }
        }
        best.map(|(_, grab)| grab)
    }

    fn release(&mut self, world: &mut World) {
        let Some(grab) = self.grab.take() else {
            return;
        };
        if let Some(p) = world
            .get_mut::<Cloth>(grab.cloth)
            .and_then(|cloth| cloth.particle_mut(grab.particle))
        {
            p.inv_mass = grab.inv_mass;
        }
        log::debug!("Released particle {} of {:?}", grab.particle, grab.cloth);
    }
}

impl System for MousePickingSystem {
    fn update(&mut self, world: &mut World, _time: &FrameTime) {
        let Some(buttons) = world.get_resource::<Input<MouseButton>>() else {
            return;
        };
        let held = buttons.pressed(MouseButton::Left);
        let clicked = buttons.just_pressed(MouseButton::Left);

        if !held {
            self.release(world);
            return;
        }

        let Some(ray) = self.cursor_ray(world) else {
            return;
        };

        if self.grab.is_none() && clicked {
            self.grab = self.pick(world, &ray);
            if let Some(grab) = self.grab {
                log::debug!(
                    "Grabbed particle {} of {:?} at depth {:.3}",
                    grab.particle,
                    grab.cloth,
                    grab.depth
                );
            }
        }

        let Some(grab) = self.grab else {
            return;
        };
        match world
            .get_mut::<Cloth>(grab.cloth)
            .and_then(|cloth| cloth.particle_mut(grab.particle))
        {
            Some(p) => {
                p.inv_mass = 0.0;
                p.place(ray.point_at(grab.depth));
            }
            // The cloth went away under us.
            None => self.grab = None,
        }
    }
}
