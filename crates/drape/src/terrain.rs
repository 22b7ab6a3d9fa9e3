//! # Terrain — Heightfield Ground
//!
//! A [`HeightField`] is a regular grid of normalized heights in `[0, 1]`,
//! usually loaded from a grayscale image. The [`Terrain`] component shares
//! one field (behind an `Arc`) and places it in the world with the entity's
//! [`Transform`]:
//!
//! ```text
//!            scale.x
//!   ├───────────────────────┤
//!   ┌───────────────────────┐ ┬
//!   │                       │ │
//!   │       translation     │ │ scale.z      world height =
//!   │           ●           │ │                translation.y
//!   │                       │ │                + sample * scale.y
//!   └───────────────────────┘ ┴
//! ```
//!
//! The footprint is centered on the translation. Rotation is ignored.
//! Outside the footprint there is no ground: queries return `None`.
//!
//! ## Comparison
//!
//! - **Unity Terrain**: anchored at a corner, heights in `[0, 1]` scaled by
//!   the terrain size. Same sampling, different anchor.
//! - **Godot HeightMapShape3D**: raw heights, no normalization.

use std::path::Path;
use std::sync::Arc;

use image::GrayImage;

use crate::error::SceneError;
use crate::math::{Transform, Vec2};

/// A `width × depth` grid of normalized heights. `x` runs along width,
/// `z` along depth; row-major by `z`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    depth: usize,
    heights: Vec<f32>,
}

impl HeightField {
    /// Build a field from a function of grid coordinates.
    pub fn from_fn(width: usize, depth: usize, f: impl Fn(usize, usize) -> f32) -> Result<Self, SceneError> {
        let heights = (0..depth)
            .flat_map(|z| (0..width).map(move |x| (x, z)))
            .map(|(x, z)| f(x, z))
            .collect();
        Self::from_heights(width, depth, heights)
    }

    /// Build a field from raw row-major samples.
    pub fn from_heights(width: usize, depth: usize, heights: Vec<f32>) -> Result<Self, SceneError> {
        if width < 2 || depth < 2 {
            return Err(SceneError::InvalidTerrain(format!(
                "a heightfield needs at least 2x2 samples, got {}x{}",
                width, depth
            )));
        }
        if heights.len() != width * depth {
            return Err(SceneError::InvalidTerrain(format!(
                "expected {} samples for {}x{}, got {}",
                width * depth,
                width,
                depth,
                heights.len()
            )));
        }
        if heights.iter().any(|h| !h.is_finite()) {
            return Err(SceneError::InvalidTerrain("heights must be finite".into()));
        }
        Ok(Self { width, depth, heights })
    }

    /// A level field at `height`. Sizes below 2 are raised to 2.
    pub fn flat(width: usize, depth: usize, height: f32) -> Self {
        let (width, depth) = (width.max(2), depth.max(2));
        Self {
            width,
            depth,
            heights: vec![height; width * depth],
        }
    }

    /// Load a heightmap image. Luminance 0 maps to 0, 255 to 1.
    pub fn from_image(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| SceneError::Heightmap {
                path: path.to_owned(),
                source,
            })?
            .to_luma8();
        let field = Self::from_luma(&img)?;
        log::info!("Loaded heightmap '{}' ({}x{})", path.display(), field.width, field.depth);
        Ok(field)
    }

    /// Convert an 8-bit grayscale image.
    pub fn from_luma(img: &GrayImage) -> Result<Self, SceneError> {
        let (w, h) = img.dimensions();
        let heights = img.pixels().map(|p| f32::from(p.0[0]) / 255.0).collect();
        Self::from_heights(w as usize, h as usize, heights)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The sample at grid point `(x, z)`.
    pub fn height_at(&self, x: usize, z: usize) -> Option<f32> {
        (x < self.width && z < self.depth).then(|| self.heights[z * self.width + x])
    }

    /// Bilinear sample at normalized coordinates `u, v ∈ [0, 1]`.
    pub fn sample(&self, u: f32, v: f32) -> Option<f32> {
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }
        let fx = u * (self.width - 1) as f32;
        let fz = v * (self.depth - 1) as f32;
        let x0 = (fx.floor() as usize).min(self.width - 2);
        let z0 = (fz.floor() as usize).min(self.depth - 2);
        let (tx, tz) = (fx - x0 as f32, fz - z0 as f32);

        let h00 = self.heights[z0 * self.width + x0];
        let h10 = self.heights[z0 * self.width + x0 + 1];
        let h01 = self.heights[(z0 + 1) * self.width + x0];
        let h11 = self.heights[(z0 + 1) * self.width + x0 + 1];
        let near = h00 + (h10 - h00) * tx;
        let far = h01 + (h11 - h01) * tx;
        Some(near + (far - near) * tz)
    }
}

/// Terrain component: a shared heightfield placed by the entity's transform.
#[derive(Debug, Clone)]
pub struct Terrain {
    field: Arc<HeightField>,
}

impl Terrain {
    pub fn new(field: HeightField) -> Self {
        Self { field: Arc::new(field) }
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// World-space ground height under the world point `xz`, or `None`
    /// outside the footprint (or for a degenerate transform).
    pub fn sample_height(&self, transform: &Transform, xz: Vec2) -> Option<f32> {
        let size = Vec2::new(transform.scale.x, transform.scale.z);
        if size.x == 0.0 || size.y == 0.0 {
            return None;
        }
        let center = Vec2::new(transform.translation.x, transform.translation.z);
        let uv = (xz - center) / size + Vec2::splat(0.5);
        let h = self.field.sample(uv.x, uv.y)?;
        let height = transform.translation.y + h * transform.scale.y;
        height.is_finite().then_some(height)
    }
}

impl From<HeightField> for Terrain {
    fn from(field: HeightField) -> Self {
        Self::new(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn ramp() -> HeightField {
        // Height rises linearly with x: 0, 0.5, 1.
        HeightField::from_fn(3, 3, |x, _| x as f32 * 0.5).unwrap()
    }

    #[test]
    fn corner_samples_are_exact() {
        let field = ramp();
        assert_eq!(field.sample(0.0, 0.0), Some(0.0));
        assert_eq!(field.sample(1.0, 1.0), Some(1.0));
        assert_eq!(field.height_at(1, 2), Some(0.5));
        assert_eq!(field.height_at(3, 0), None);
    }

    #[test]
    fn bilinear_interpolates_between_samples() {
        let field = HeightField::from_heights(2, 2, vec![0.0, 1.0, 1.0, 2.0]).unwrap();
        let h = field.sample(0.5, 0.5).unwrap();
        assert!((h - 1.0).abs() < 1e-6);
        let h = field.sample(0.25, 0.0).unwrap();
        assert!((h - 0.25).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_samples_are_none() {
        let field = ramp();
        assert_eq!(field.sample(-0.01, 0.5), None);
        assert_eq!(field.sample(0.5, 1.01), None);
        assert_eq!(field.sample(f32::NAN, 0.5), None);
    }

    #[test]
    fn rejects_bad_fields() {
        assert!(HeightField::from_heights(1, 5, vec![0.0; 5]).is_err());
        assert!(HeightField::from_heights(2, 2, vec![0.0; 3]).is_err());
        assert!(HeightField::from_heights(2, 2, vec![0.0, f32::NAN, 0.0, 0.0]).is_err());
    }

    #[test]
    fn transform_places_footprint() {
        let terrain = Terrain::new(ramp());
        let transform = Transform {
            translation: Vec3::new(10.0, -2.0, 0.0),
            scale: Vec3::new(4.0, 3.0, 4.0),
            ..Transform::IDENTITY
        };
        // Left edge (u = 0), middle (u = 0.5), right edge (u = 1).
        assert_eq!(terrain.sample_height(&transform, Vec2::new(8.0, 0.0)), Some(-2.0));
        let mid = terrain.sample_height(&transform, Vec2::new(10.0, 0.0)).unwrap();
        assert!((mid - -0.5).abs() < 1e-6);
        assert_eq!(terrain.sample_height(&transform, Vec2::new(12.0, 0.0)), Some(1.0));
        assert_eq!(terrain.sample_height(&transform, Vec2::new(12.5, 0.0)), None);
    }

    #[test]
    fn zero_scale_has_no_footprint() {
        let terrain = Terrain::new(HeightField::flat(2, 2, 0.0));
        let transform = Transform::IDENTITY.with_scale(0.0);
        assert_eq!(terrain.sample_height(&transform, Vec2::ZERO), None);
    }

    #[test]
    fn loads_grayscale_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.png");
        let img = GrayImage::from_fn(4, 2, |x, _| image::Luma([if x < 2 { 0 } else { 255 }]));
        img.save(&path).unwrap();

        let field = HeightField::from_image(&path).unwrap();
        assert_eq!((field.width(), field.depth()), (4, 2));
        assert_eq!(field.height_at(0, 0), Some(0.0));
        assert_eq!(field.height_at(3, 1), Some(1.0));
    }

    #[test]
    fn missing_image_reports_path() {
        let err = HeightField::from_image("/nonexistent/height.png").unwrap_err();
        assert!(matches!(err, SceneError::Heightmap { .. }));
        assert!(err.to_string().contains("/nonexistent/height.png"));
    }
}
