//! Cloth factory: lays out a particle grid and derives its constraint graph.
//!
//! ```ignore
//! let cloth = ClothBuilder::new(20, 20)
//!     .size(2.0, 2.0)
//!     .origin(Vec3::new(-1.0, 1.0, 0.0))
//!     .pins(PinPattern::TopCorners)
//!     .build()?;
//! ```
//!
//! Row 0 is the top edge. Links are emitted row-major, and for each particle
//! in the order right, down, down-right, down-left, then the two bend links.
//! The solver walks them in exactly this order every iteration.

use serde::{Deserialize, Serialize};

use super::{Cloth, Link, LinkKind, Particle};
use crate::error::SceneError;
use crate::math::{Vec2, Vec3};

/// Which particles start pinned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinPattern {
    /// Nothing pinned; the cloth falls freely.
    None,
    /// Every particle of row 0.
    TopRow,
    /// The two ends of row 0.
    #[default]
    TopCorners,
    /// `n` particles spread evenly along row 0 (one hook sits in the middle).
    Hooks(usize),
    /// Explicit `[row, col]` pairs.
    Explicit(Vec<[usize; 2]>),
}

/// The plane the grid is laid out in, relative to `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClothOrientation {
    /// Columns along +X, rows along -Y: a hanging curtain facing +Z.
    #[default]
    Vertical,
    /// Columns along +X, rows along +Z: a sheet lying flat, facing +Y.
    Horizontal,
}

/// Builder for a [`Cloth`] grid.
#[derive(Debug, Clone)]
pub struct ClothBuilder {
    rows: usize,
    cols: usize,
    width: f32,
    height: f32,
    origin: Vec3,
    orientation: ClothOrientation,
    pins: PinPattern,
    particle_mass: f32,
    shear: bool,
    bend: bool,
}

impl ClothBuilder {
    /// A `rows × cols` grid, 1×1 units, top corners pinned, shear links on.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            width: 1.0,
            height: 1.0,
            origin: Vec3::ZERO,
            orientation: ClothOrientation::Vertical,
            pins: PinPattern::TopCorners,
            particle_mass: 1.0,
            shear: true,
            bend: false,
        }
    }

    /// Total extent along columns (`width`) and rows (`height`).
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// World position of particle `(0, 0)`.
    pub fn origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn orientation(mut self, orientation: ClothOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn pins(mut self, pins: PinPattern) -> Self {
        self.pins = pins;
        self
    }

    /// Mass of each free particle.
    pub fn particle_mass(mut self, mass: f32) -> Self {
        self.particle_mass = mass;
        self
    }

    /// Emit diagonal shear links.
    pub fn shear(mut self, enabled: bool) -> Self {
        self.shear = enabled;
        self
    }

    /// Emit skip-one bend links.
    pub fn bend(mut self, enabled: bool) -> Self {
        self.bend = enabled;
        self
    }

    /// Rest spacing implied by the size and resolution.
    pub fn spacing(&self) -> Vec2 {
        let step = |extent: f32, count: usize| {
            if count > 1 { extent / (count - 1) as f32 } else { 0.0 }
        };
        Vec2::new(step(self.width, self.cols), step(self.height, self.rows))
    }

    /// Lay out the particles, pin them, and derive the links.
    pub fn build(&self) -> Result<Cloth, SceneError> {
        self.validate()?;

        let spacing = self.spacing();
        let (col_axis, row_axis) = match self.orientation {
            ClothOrientation::Vertical => (Vec3::X, Vec3::NEG_Y),
            ClothOrientation::Horizontal => (Vec3::X, Vec3::Z),
        };

        let inv_mass = 1.0 / self.particle_mass;
        let mut particles = Vec::with_capacity(self.rows * self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let position = self.origin
                    + col_axis * (col as f32 * spacing.x)
                    + row_axis * (row as f32 * spacing.y);
                particles.push(Particle::new(position, inv_mass));
            }
        }

        for [row, col] in self.pinned_cells()? {
            particles[row * self.cols + col].inv_mass = 0.0;
        }

        let links = self.links(&particles);
        Ok(Cloth {
            rows: self.rows,
            cols: self.cols,
            spacing,
            particles,
            links,
        })
    }

    fn validate(&self) -> Result<(), SceneError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SceneError::InvalidCloth(format!(
                "a cloth needs at least one row and one column, got {}x{}",
                self.rows, self.cols
            )));
        }
        if !(self.width.is_finite() && self.width >= 0.0 && self.height.is_finite() && self.height >= 0.0) {
            return Err(SceneError::InvalidCloth(format!(
                "size must be finite and non-negative, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.particle_mass.is_finite() && self.particle_mass > 0.0) {
            return Err(SceneError::InvalidCloth(format!(
                "particle mass must be positive, got {}",
                self.particle_mass
            )));
        }
        if !self.origin.is_finite() {
            return Err(SceneError::InvalidCloth(format!(
                "origin must be finite, got {:?}",
                self.origin
            )));
        }
        Ok(())
    }

    fn pinned_cells(&self) -> Result<Vec<[usize; 2]>, SceneError> {
        let last = self.cols - 1;
        let cells = match &self.pins {
            PinPattern::None => Vec::new(),
            PinPattern::TopRow => (0..self.cols).map(|col| [0, col]).collect(),
            PinPattern::TopCorners => {
                let mut cells = vec![[0, 0]];
                if last > 0 {
                    cells.push([0, last]);
                }
                cells
            }
            PinPattern::Hooks(count) => {
                let count = if *count > self.cols {
                    log::warn!(
                        "Requested {} hooks on a cloth {} columns wide; pinning the whole top row",
                        count,
                        self.cols
                    );
                    self.cols
                } else {
                    *count
                };
                match count {
                    0 => Vec::new(),
                    1 => vec![[0, last / 2]],
                    n => (0..n)
                        .map(|i| [0, ((i * last) as f32 / (n - 1) as f32).round() as usize])
                        .collect(),
                }
            }
            PinPattern::Explicit(cells) => {
                if let Some(bad) = cells.iter().find(|[r, c]| *r >= self.rows || *c >= self.cols) {
                    return Err(SceneError::InvalidCloth(format!(
                        "pin {:?} is outside the {}x{} grid",
                        bad, self.rows, self.cols
                    )));
                }
                cells.clone()
            }
        };
        Ok(cells)
    }

    fn links(&self, particles: &[Particle]) -> Vec<Link> {
        let (rows, cols) = (self.rows, self.cols);
        let link = |a: usize, b: usize, kind: LinkKind| Link {
            a,
            b,
            rest_length: particles[a].position.distance(particles[b].position),
            kind,
        };

        let mut links = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let i = row * cols + col;
                if col + 1 < cols {
                    links.push(link(i, i + 1, LinkKind::Structural));
                }
                if row + 1 < rows {
                    links.push(link(i, i + cols, LinkKind::Structural));
                    if self.shear {
                        if col + 1 < cols {
                            links.push(link(i, i + cols + 1, LinkKind::Shear));
                        }
                        if col > 0 {
                            links.push(link(i, i + cols - 1, LinkKind::Shear));
                        }
                    }
                }
                if self.bend {
                    if col + 2 < cols {
                        links.push(link(i, i + 2, LinkKind::Bend));
                    }
                    if row + 2 < rows {
                        links.push(link(i, i + 2 * cols, LinkKind::Bend));
                    }
                }
            }
        }
        links
    }
}
