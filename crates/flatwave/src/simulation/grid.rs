//! Simulation grid with SoA field planes.
//!
//! The grid frames a rectangular interior domain with one ring of dead
//! cells and, when absorption is enabled, a graded stack of PML rings.
//! Field planes use a Structure of Arrays layout in row-major order for
//! cache-friendly sequential access; pressure is double-buffered for
//! in-place time-stepping.

use crate::error::{FlatwaveError, Result};
use crate::simulation::cells::CellKind;

/// The simulation grid: cell kinds, field planes, and depth planes.
///
/// Row 0 is the top of the frame. `Vx[r, c]` lives on the right face of
/// cell (r, c) and `Vy[r, c]` on its top face.
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Dead ring plus PML rings; the interior domain starts here.
    margin: usize,

    /// Pressure at cell centers, double-buffered.
    pub(crate) p: Vec<f32>,
    pub(crate) p_next: Vec<f32>,
    /// Velocity on right faces.
    pub(crate) vx: Vec<f32>,
    /// Velocity on top faces.
    pub(crate) vy: Vec<f32>,

    kinds: Vec<CellKind>,

    /// Out-of-plane depth factors for the 2.5D correction; all 1.0 in
    /// pure 2D mode.
    pub(crate) depth_x: Vec<f32>,
    pub(crate) depth_y: Vec<f32>,
    pub(crate) depth_p: Vec<f32>,
}

impl Grid {
    /// Create a grid whose interior domain is `domain_h` x `domain_w`
    /// cells, framed by one dead ring and `pml_layers` absorbing rings
    /// (zero layers when `pml_layers` is `None`).
    ///
    /// The PML rings are graded from the outside in: the ring touching the
    /// dead border is `Pml(layers - 1)`, the innermost ring `Pml(0)`.
    pub fn new(domain_h: usize, domain_w: usize, pml_layers: Option<u8>) -> Result<Self> {
        if domain_h < 2 || domain_w < 2 {
            return Err(FlatwaveError::config(format!(
                "domain must be at least 2x2 cells, got {domain_h}x{domain_w}"
            )));
        }

        let layers = pml_layers.map(usize::from).unwrap_or(0);
        let margin = 1 + layers;
        let rows = domain_h + 2 * margin;
        let cols = domain_w + 2 * margin;
        let size = rows * cols;

        let mut kinds = vec![CellKind::Air; size];
        for r in 0..rows {
            for c in 0..cols {
                // Distance to the nearest frame border.
                let border = r.min(c).min(rows - 1 - r).min(cols - 1 - c);
                kinds[r * cols + c] = if border == 0 {
                    CellKind::Dead
                } else if border <= layers {
                    CellKind::Pml((layers - border) as u8)
                } else {
                    CellKind::Air
                };
            }
        }

        Ok(Self {
            rows,
            cols,
            margin,
            p: vec![0.0; size],
            p_next: vec![0.0; size],
            vx: vec![0.0; size],
            vy: vec![0.0; size],
            kinds,
            depth_x: vec![1.0; size],
            depth_y: vec![1.0; size],
            depth_p: vec![1.0; size],
        })
    }

    /// Total frame rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total frame columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Width of the dead + PML frame around the interior domain.
    pub fn margin(&self) -> usize {
        self.margin
    }

    /// Interior domain height.
    pub fn domain_h(&self) -> usize {
        self.rows - 2 * self.margin
    }

    /// Interior domain width.
    pub fn domain_w(&self) -> usize {
        self.cols - 2 * self.margin
    }

    /// Convert (row, col) to a linear index.
    #[inline(always)]
    pub fn idx(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    /// Kind of the cell at (r, c).
    #[inline]
    pub fn kind(&self, r: usize, c: usize) -> CellKind {
        self.kinds[self.idx(r, c)]
    }

    /// Overwrite the kind of a cell. Geometry wins over PML assignments;
    /// only the outermost dead ring is protected.
    pub fn set_kind(&mut self, r: usize, c: usize, kind: CellKind) -> Result<()> {
        if r == 0 || c == 0 || r == self.rows - 1 || c == self.cols - 1 {
            return Err(FlatwaveError::config(format!(
                "cell ({r}, {c}) is on the dead border and cannot be restamped"
            )));
        }
        let idx = self.idx(r, c);
        self.kinds[idx] = kind;
        Ok(())
    }

    /// The full cell-kind plane, row-major.
    pub fn kinds(&self) -> &[CellKind] {
        &self.kinds
    }

    /// Pressure at a cell (current buffer).
    #[inline]
    pub fn pressure(&self, r: usize, c: usize) -> f32 {
        self.p[self.idx(r, c)]
    }

    /// The full pressure plane, row-major (current buffer).
    pub fn pressure_plane(&self) -> &[f32] {
        &self.p
    }

    /// Add to the pressure at a cell. Used by tests to seed fields.
    pub fn inject_pressure(&mut self, r: usize, c: usize, amplitude: f32) {
        let idx = self.idx(r, c);
        self.p[idx] += amplitude;
    }

    /// Swap the pressure buffers. O(1) pointer swap, no copy.
    pub(crate) fn swap_pressure(&mut self) {
        std::mem::swap(&mut self.p, &mut self.p_next);
    }

    /// Assign the 2.5D depth profile from a per-column depth in cells.
    ///
    /// Cell and y-face depths take the column's value; x-face depths take
    /// the smaller of the two columns sharing the face.
    pub fn set_depth_profile(&mut self, profile: &[f32]) {
        debug_assert_eq!(profile.len(), self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                let idx = r * self.cols + c;
                let here = profile[c].max(1.0);
                let right = if c + 1 < self.cols {
                    profile[c + 1].max(1.0)
                } else {
                    here
                };
                self.depth_p[idx] = here;
                self.depth_y[idx] = here;
                self.depth_x[idx] = here.min(right);
            }
        }
    }

    /// Sum of squared pressure over the interior domain (excludes dead and
    /// PML rings).
    pub fn interior_pressure_energy(&self) -> f32 {
        let mut energy = 0.0;
        for r in self.margin..self.rows - self.margin {
            let row = &self.p[r * self.cols + self.margin..r * self.cols + self.cols - self.margin];
            energy += row.iter().map(|p| p * p).sum::<f32>();
        }
        energy
    }

    /// Largest absolute pressure anywhere in the frame.
    pub fn max_pressure(&self) -> f32 {
        self.p.iter().map(|p| p.abs()).fold(0.0, f32::max)
    }

    /// True if any field plane holds a non-finite value.
    pub fn has_non_finite(&self) -> bool {
        self.p.iter().any(|v| !v.is_finite())
            || self.vx.iter().any(|v| !v.is_finite())
            || self.vy.iter().any(|v| !v.is_finite())
    }
}
