//! Scene construction.
//!
//! Each builder populates a fresh grid with geometry, picks the listener
//! cell, and selects the injection direction for the source region. The
//! grid comes back ready for coefficient derivation; nothing here is
//! mutated after the build.

pub mod area_function;
mod tube;
mod vowel;

use tracing::info;

use crate::config::{Mode, SceneKind, SimulationConfig};
use crate::error::{FlatwaveError, Result};
use crate::physics::AcousticParams;
use crate::simulation::cells::CellKind;
use crate::simulation::grid::Grid;
use crate::source::SourceDirection;

pub use vowel::VOWEL_LENGTH_ERROR_BUDGET;

/// Facts about the built geometry worth reporting.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Axial tube length in cells, for tube-like scenes.
    pub tube_cells: Option<usize>,
    /// Relative error between the true tract length and its snapped cell
    /// count, for the vowel scene.
    pub length_error: Option<f32>,
}

/// A built scene: geometry, listener, and source orientation.
pub struct Scene {
    /// The populated grid.
    pub grid: Grid,
    /// Cell probed by the listener, frame coordinates.
    pub listener: (usize, usize),
    /// Face weights for source injection.
    pub direction: SourceDirection,
    /// Build diagnostics.
    pub report: BuildReport,
}

/// Build the scene selected by the configuration.
pub fn build(config: &SimulationConfig, params: &AcousticParams) -> Result<Scene> {
    let scene = match config.scene {
        SceneKind::OpenAir => open_air(config),
        SceneKind::VerticalWall => vertical_wall(config),
        SceneKind::ClosedTube => tube::closed_tube(config),
        SceneKind::OpenTube => tube::open_tube(config),
        SceneKind::Vowel => {
            let vowel = config
                .vowel
                .ok_or_else(|| FlatwaveError::config("scene 'vowel' requires a vowel"))?;
            vowel::vowel_tract(vowel, config, params)
        }
    }?;

    info!(
        rows = scene.grid.rows(),
        cols = scene.grid.cols(),
        listener_row = scene.listener.0,
        listener_col = scene.listener.1,
        "scene built"
    );
    Ok(scene)
}

/// Empty interior with a single excitation cell at the center; the
/// listener sits on the source.
fn open_air(config: &SimulationConfig) -> Result<Scene> {
    let mut grid = Grid::new(
        config.domain_h,
        config.domain_w,
        config.pml.active_layers(),
    )?;
    let center = (grid.rows() / 2, grid.cols() / 2);
    grid.set_kind(center.0, center.1, CellKind::Excitation)?;

    Ok(Scene {
        grid,
        listener: center,
        direction: SourceDirection::omni(),
        report: BuildReport::default(),
    })
}

/// Open air plus a short vertical wall segment to the right of the
/// source, for reflection tests.
fn vertical_wall(config: &SimulationConfig) -> Result<Scene> {
    let mut grid = Grid::new(
        config.domain_h,
        config.domain_w,
        config.pml.active_layers(),
    )?;
    let center = (grid.rows() / 2, grid.cols() / 2);
    grid.set_kind(center.0, center.1, CellKind::Excitation)?;

    // Wall a quarter-domain to the right, spanning a third of the height.
    let wall_c = center.1 + config.domain_w / 4;
    let half_span = (config.domain_h / 6).max(2);
    if wall_c >= grid.cols() - 1 {
        return Err(FlatwaveError::config(
            "vertical wall does not fit to the right of the source",
        ));
    }
    for r in center.0.saturating_sub(half_span).max(1)..=(center.0 + half_span).min(grid.rows() - 2) {
        grid.set_kind(r, wall_c, CellKind::Wall)?;
    }

    Ok(Scene {
        grid,
        listener: center,
        direction: SourceDirection::omni(),
        report: BuildReport::default(),
    })
}

/// Assign 2.5D depth planes from a per-column tube height profile, or
/// leave them at 1.0 in pure 2D mode.
fn apply_depth(grid: &mut Grid, mode: Mode, profile: &[f32]) {
    if mode == Mode::TwoPointFiveD {
        grid.set_depth_profile(profile);
    }
}
