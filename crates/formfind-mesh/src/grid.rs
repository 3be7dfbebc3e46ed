//! Planar grid specification.
//!
//! Vertices are laid out row-major: `index = row * columns + col`, with
//! `x = col * width / (columns - 1)`, `y = row * length / (rows - 1)`, `z = 0`.

use formfind_types::constants::{DEFAULT_GRID_EXTENT, DEFAULT_RESOLUTION};
use formfind_types::{FormFindError, FormFindResult, Vec3};
use serde::{Deserialize, Serialize};

/// Resolution and physical extent of a planar grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Vertices along X (`numW`).
    pub columns: usize,
    /// Vertices along Y (`numH`).
    pub rows: usize,
    /// Total extent along X.
    pub width: f32,
    /// Total extent along Y.
    pub length: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::square(DEFAULT_RESOLUTION)
    }
}

impl GridSpec {
    /// A `resolution × resolution` grid with the default extent.
    pub fn square(resolution: usize) -> Self {
        Self {
            columns: resolution,
            rows: resolution,
            width: DEFAULT_GRID_EXTENT,
            length: DEFAULT_GRID_EXTENT,
        }
    }

    /// Overrides the physical extent.
    pub fn with_extent(mut self, width: f32, length: f32) -> Self {
        self.width = width;
        self.length = length;
        self
    }

    /// Checks that the grid has at least one cell and a finite, positive extent.
    pub fn validate(&self) -> FormFindResult<()> {
        if self.columns < 2 || self.rows < 2 {
            return Err(FormFindError::InvalidGrid(format!(
                "resolution {}x{} needs at least 2 vertices per side",
                self.columns, self.rows
            )));
        }
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.length.is_finite() && self.length > 0.0)
        {
            return Err(FormFindError::InvalidGrid(format!(
                "extent {}x{} must be finite and positive",
                self.width, self.length
            )));
        }
        Ok(())
    }

    /// Number of lattice vertices (`columns * rows`).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Number of quad cells.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.columns.saturating_sub(1) * self.rows.saturating_sub(1)
    }

    /// Row-major index of the lattice vertex at `(col, row)`.
    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.columns + col
    }

    /// Spacing between neighbouring vertices along X and Y.
    pub fn spacing(&self) -> (f32, f32) {
        (
            self.width / self.columns.saturating_sub(1).max(1) as f32,
            self.length / self.rows.saturating_sub(1).max(1) as f32,
        )
    }

    /// The four corner vertices, pinned by default.
    pub fn corner_indices(&self) -> [usize; 4] {
        let n = self.vertex_count();
        [
            0,
            self.columns.saturating_sub(1),
            self.columns * self.rows.saturating_sub(1),
            n.saturating_sub(1),
        ]
    }

    /// Maps fractional load coordinates `(u, v) ∈ [0, 1]²` to a lattice vertex.
    ///
    /// Coordinates are clamped; the cell index is truncated toward the origin.
    pub fn vertex_at_fraction(&self, u: f32, v: f32) -> usize {
        let col = (self.columns.saturating_sub(1) as f32 * u.clamp(0.0, 1.0)) as usize;
        let row = (self.rows.saturating_sub(1) as f32 * v.clamp(0.0, 1.0)) as usize;
        self.index(col, row)
    }

    /// Lattice positions in row-major order, all at `z = 0`.
    pub fn lattice_positions(&self) -> Vec<Vec3> {
        let (step_w, step_l) = self.spacing();
        let mut positions = Vec::with_capacity(self.vertex_count());
        for row in 0..self.rows {
            for col in 0..self.columns {
                positions.push(Vec3::new(col as f32 * step_w, row as f32 * step_l, 0.0));
            }
        }
        positions
    }
}
