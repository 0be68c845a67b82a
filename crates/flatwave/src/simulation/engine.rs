//! The FDTD step pipeline.
//!
//! One step advances pressure first, then velocity, in a fixed phase
//! order: the velocity update consumes the pressure written earlier in the
//! same step. Within each phase the cell updates are independent, so rows
//! are processed in parallel on large grids; the result is identical to
//! the serial pipeline because no phase reduces across cells.

use rayon::prelude::*;

use crate::simulation::coeffs::FaceCoeffs;
use crate::simulation::grid::Grid;

/// Grids with a side at or above this many cells use the rayon path.
const PARALLEL_THRESHOLD: usize = 512;

/// Executes the per-step update over a finished grid.
pub struct Engine {
    grid: Grid,
    coeffs: FaceCoeffs,
}

impl Engine {
    /// Wrap a built grid and its derived coefficients.
    pub fn new(grid: Grid, coeffs: FaceCoeffs) -> Self {
        Self { grid, coeffs }
    }

    /// The underlying grid. After [`step`](Self::step) returns, the
    /// current pressure plane holds the step's published field.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for seeding fields in tests and scenarios.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// The derived face coefficients.
    pub fn coeffs(&self) -> &FaceCoeffs {
        &self.coeffs
    }

    /// Advance one time step, feeding `drive` (the source sample for this
    /// step) into the excitation faces.
    pub fn step(&mut self, drive: f32) {
        let rows = self.grid.rows();
        let cols = self.grid.cols();
        let parallel = rows >= PARALLEL_THRESHOLD || cols >= PARALLEL_THRESHOLD;

        if parallel {
            self.update_pressure_parallel(rows, cols);
        } else {
            self.update_pressure_serial(rows, cols);
        }

        for &idx in &self.coeffs.dirichlet {
            self.grid.p_next[idx] = 0.0;
        }

        if parallel {
            self.update_velocity_parallel(rows, cols, drive);
        } else {
            self.update_velocity_serial(rows, cols, drive);
        }

        self.wipe_border(rows, cols);
        self.grid.swap_pressure();
    }

    /// Phases 1-2: velocity divergence into the pressure update.
    fn update_pressure_serial(&mut self, rows: usize, cols: usize) {
        let grid = &mut self.grid;
        let coeffs = &self.coeffs;
        for r in 1..rows - 1 {
            let base = r * cols;
            for c in 1..cols - 1 {
                let i = base + c;
                grid.p_next[i] = pressure_cell(
                    i,
                    cols,
                    &grid.p,
                    &grid.vx,
                    &grid.vy,
                    &grid.depth_x,
                    &grid.depth_y,
                    &grid.depth_p,
                    &coeffs.sigma_p,
                    coeffs.p_scale,
                );
            }
        }
    }

    fn update_pressure_parallel(&mut self, rows: usize, cols: usize) {
        let p = &self.grid.p;
        let vx = &self.grid.vx;
        let vy = &self.grid.vy;
        let depth_x = &self.grid.depth_x;
        let depth_y = &self.grid.depth_y;
        let depth_p = &self.grid.depth_p;
        let sigma_p = &self.coeffs.sigma_p;
        let p_scale = self.coeffs.p_scale;

        let interior = &mut self.grid.p_next[cols..(rows - 1) * cols];
        interior
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row_offset, out_row)| {
                let base = (row_offset + 1) * cols;
                for c in 1..cols - 1 {
                    out_row[c] = pressure_cell(
                        base + c,
                        cols,
                        p,
                        vx,
                        vy,
                        depth_x,
                        depth_y,
                        depth_p,
                        sigma_p,
                        p_scale,
                    );
                }
            });
    }

    /// Phases 4-8: pressure gradient, velocity pre-update, source
    /// injection, locally-reacting boundary velocity, normalization.
    fn update_velocity_serial(&mut self, rows: usize, cols: usize, drive: f32) {
        let grid = &mut self.grid;
        let coeffs = &self.coeffs;
        for r in 1..rows - 1 {
            let base = r * cols;
            for c in 1..cols - 1 {
                let i = base + c;
                grid.vx[i] = velocity_x_cell(i, grid.vx[i], &grid.p_next, coeffs, drive);
            }
        }
        for r in 1..rows - 1 {
            let base = r * cols;
            for c in 1..cols - 1 {
                let i = base + c;
                grid.vy[i] = velocity_y_cell(i, cols, grid.vy[i], &grid.p_next, coeffs, drive);
            }
        }
    }

    fn update_velocity_parallel(&mut self, rows: usize, cols: usize, drive: f32) {
        let p_next = &self.grid.p_next;
        let coeffs = &self.coeffs;

        let vx_interior = &mut self.grid.vx[cols..(rows - 1) * cols];
        vx_interior
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row_offset, row)| {
                let base = (row_offset + 1) * cols;
                for c in 1..cols - 1 {
                    row[c] = velocity_x_cell(base + c, row[c], p_next, coeffs, drive);
                }
            });

        let vy_interior = &mut self.grid.vy[cols..(rows - 1) * cols];
        vy_interior
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row_offset, row)| {
                let base = (row_offset + 1) * cols;
                for c in 1..cols - 1 {
                    row[c] = velocity_y_cell(base + c, cols, row[c], p_next, coeffs, drive);
                }
            });
    }

    /// Phase 9: force the outermost ring of every field plane to zero.
    fn wipe_border(&mut self, rows: usize, cols: usize) {
        let grid = &mut self.grid;
        for plane in [&mut grid.p_next, &mut grid.vx, &mut grid.vy] {
            plane[..cols].fill(0.0);
            plane[(rows - 1) * cols..].fill(0.0);
            for r in 1..rows - 1 {
                plane[r * cols] = 0.0;
                plane[r * cols + cols - 1] = 0.0;
            }
        }
    }
}

/// Pressure update for one cell: divergence of the depth-weighted
/// velocities, scaled and damped.
#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn pressure_cell(
    i: usize,
    cols: usize,
    p: &[f32],
    vx: &[f32],
    vy: &[f32],
    depth_x: &[f32],
    depth_y: &[f32],
    depth_p: &[f32],
    sigma_p: &[f32],
    p_scale: f32,
) -> f32 {
    let cx_vx = vx[i] * depth_x[i] - vx[i - 1] * depth_x[i - 1];
    // Vy sits on top faces, so the downward difference uses the row below.
    let cy_vy = vy[i] * depth_y[i] - vy[i + cols] * depth_y[i + cols];
    (p[i] * depth_p[i] - p_scale * (cx_vx + cy_vy)) / ((1.0 + sigma_p[i]) * depth_p[i])
}

#[inline(always)]
fn velocity_x_cell(i: usize, vx: f32, p_next: &[f32], coeffs: &FaceCoeffs, drive: f32) -> f32 {
    let grad = (p_next[i + 1] - p_next[i]) * coeffs.inv_dx;
    let v = coeffs.min_beta_x[i] * vx - coeffs.beta_dt_rho_x[i] * grad
        + drive * coeffs.excite_x[i]
        + coeffs.wall_self_x[i] * p_next[i]
        + coeffs.wall_nb_x[i] * p_next[i + 1];
    v / coeffs.norm_x[i]
}

#[inline(always)]
fn velocity_y_cell(
    i: usize,
    cols: usize,
    vy: f32,
    p_next: &[f32],
    coeffs: &FaceCoeffs,
    drive: f32,
) -> f32 {
    let grad = (p_next[i - cols] - p_next[i]) * coeffs.inv_dx;
    let v = coeffs.min_beta_y[i] * vy - coeffs.beta_dt_rho_y[i] * grad
        + drive * coeffs.excite_y[i]
        + coeffs.wall_self_y[i] * p_next[i]
        + coeffs.wall_nb_y[i] * p_next[i - cols];
    v / coeffs.norm_y[i]
}
