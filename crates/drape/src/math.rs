//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. [`Transform`] is the position/rotation/scale
//! component; [`Ray`] is what mouse picking casts into the scene.

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// A 3D transform: position, rotation, and scale in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Rotate the transform so it looks at `target` from its current position.
    ///
    /// `Transform::from_xyz(0.0, 0.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y)`
    /// is the default scene camera.
    ///
    /// If `up` is parallel to the view direction (a camera straight above its
    /// target with `Vec3::Y` up), another world axis is used as up instead.
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        let Some(dir) = (target - self.translation).try_normalize() else {
            return self;
        };
        let up = [up, Vec3::Z, Vec3::X]
            .into_iter()
            .find(|axis| dir.cross(*axis).length_squared() > 1e-6)
            .unwrap_or(Vec3::Y);
        let look = Mat4::look_at_rh(self.translation, target, up);
        let (_, rot, _) = look.inverse().to_scale_rotation_translation();
        self.rotation = rot;
        self
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Local -Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Local +X in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Compute the 4x4 model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A half-line with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; `None` if the direction can't be normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// The point `t` units along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Parameter of the point on the (infinite) line closest to `point`.
    pub fn closest_t(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction)
    }

    /// Perpendicular distance from `point` to the line through the ray.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        point.distance(self.point_at(self.closest_t(point)))
    }
}
