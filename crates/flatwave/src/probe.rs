//! Observers: the listener probe and the field snapshot sink.

use crate::simulation::cells::CellKind;
use crate::simulation::grid::Grid;

/// Sentinel written over solid cells in snapshot pressure fields so
/// renderers can distinguish them from valid pressure.
pub const WALL_SENTINEL: f32 = 1.0e9;

/// Records the pressure at one cell, one sample per step.
#[derive(Debug, Clone)]
pub struct Listener {
    row: usize,
    col: usize,
    samples: Vec<f32>,
}

impl Listener {
    /// Probe the cell at (row, col), frame coordinates.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            samples: Vec::new(),
        }
    }

    /// The probed cell.
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Append the current pressure at the probed cell.
    pub fn record(&mut self, grid: &Grid) -> f32 {
        let sample = grid.pressure(self.row, self.col);
        self.samples.push(sample);
        sample
    }

    /// All samples recorded so far.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// A copy of the pressure field at one step, with solid cells replaced by
/// [`WALL_SENTINEL`] and the cell-kind plane attached as an overlay.
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    /// The step this frame was captured after.
    pub step: u64,
    /// Frame rows.
    pub rows: usize,
    /// Frame columns.
    pub cols: usize,
    /// Row-major pressure values; solid cells hold the sentinel.
    pub pressure: Vec<f32>,
    /// Row-major cell kinds.
    pub kinds: Vec<CellKind>,
}

impl FieldSnapshot {
    /// Capture the grid's published pressure field.
    pub fn capture(grid: &Grid, step: u64) -> Self {
        let kinds = grid.kinds().to_vec();
        let pressure = grid
            .pressure_plane()
            .iter()
            .zip(&kinds)
            .map(|(&p, &kind)| match kind {
                CellKind::Wall | CellKind::Dead | CellKind::Excitation => WALL_SENTINEL,
                _ => p,
            })
            .collect();

        Self {
            step,
            rows: grid.rows(),
            cols: grid.cols(),
            pressure,
            kinds,
        }
    }

    /// Pressure at (row, col); the sentinel on solid cells.
    pub fn pressure(&self, row: usize, col: usize) -> f32 {
        self.pressure[row * self.cols + col]
    }
}

/// Receives a field snapshot every K steps.
pub trait SnapshotSink {
    /// Called with each captured frame.
    fn on_snapshot(&mut self, snapshot: &FieldSnapshot);
}

/// A sink that keeps every frame in memory.
#[derive(Debug, Default)]
pub struct SnapshotRecorder {
    frames: Vec<FieldSnapshot>,
}

impl SnapshotRecorder {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded frames, oldest first.
    pub fn frames(&self) -> &[FieldSnapshot] {
        &self.frames
    }

    /// The most recent frame, if any.
    pub fn last(&self) -> Option<&FieldSnapshot> {
        self.frames.last()
    }
}

impl SnapshotSink for SnapshotRecorder {
    fn on_snapshot(&mut self, snapshot: &FieldSnapshot) {
        self.frames.push(snapshot.clone());
    }
}
