//! Straight-tube scenes.
//!
//! Both builders lay a horizontal air channel against the left edge of the
//! interior domain: an excitation column at the glottal end, wall rows
//! above and below, and a Dirichlet column one cell past the open end.
//! The closed variant adds a wall column behind the excitation.

use crate::config::SimulationConfig;
use crate::error::{FlatwaveError, Result};
use crate::simulation::cells::CellKind;
use crate::simulation::grid::Grid;
use crate::source::SourceDirection;

use super::{apply_depth, BuildReport, Scene};

/// Tube closed at the glottal (left) end.
pub fn closed_tube(config: &SimulationConfig) -> Result<Scene> {
    build_tube(config, true)
}

/// Tube open at both ends. The excitation column height comes from
/// `tube_width`, which is required for this scene.
pub fn open_tube(config: &SimulationConfig) -> Result<Scene> {
    build_tube(config, false)
}

fn build_tube(config: &SimulationConfig, closed: bool) -> Result<Scene> {
    let length = config.tube_length;
    let width = config.tube_width;

    let mut grid = Grid::new(
        config.domain_h,
        config.domain_w,
        config.pml.active_layers(),
    )?;
    let margin = grid.margin();

    // Air rows of the channel, centered on the frame.
    let center_r = grid.rows() / 2;
    let r_top = center_r - (width - 1) / 2;
    let r_bot = r_top + width - 1;

    // Columns: optional left wall, excitation, `length` air cells, then
    // the Dirichlet column one past the open end.
    let c_wall = margin;
    let c_excite = c_wall + 1;
    let c_open = c_excite + length + 1;

    if r_top <= margin || r_bot >= margin + grid.domain_h() - 1 {
        return Err(FlatwaveError::config(format!(
            "tube width {width} does not fit a domain of height {}",
            grid.domain_h()
        )));
    }
    if c_open > margin + grid.domain_w() - 1 {
        return Err(FlatwaveError::config(format!(
            "tube length {length} does not fit a domain of width {}",
            grid.domain_w()
        )));
    }

    // Wall rows above and below the channel, spanning the full tube.
    for c in c_wall..=c_open {
        grid.set_kind(r_top - 1, c, CellKind::Wall)?;
        grid.set_kind(r_bot + 1, c, CellKind::Wall)?;
    }

    if closed {
        for r in r_top - 1..=r_bot + 1 {
            grid.set_kind(r, c_wall, CellKind::Wall)?;
        }
    }

    for r in r_top..=r_bot {
        grid.set_kind(r, c_excite, CellKind::Excitation)?;
    }

    for r in r_top - 1..=r_bot + 1 {
        grid.set_kind(r, c_open, CellKind::NoPressure)?;
    }

    // 2.5D: the channel's vertical extent, per column.
    let mut profile = vec![1.0; grid.cols()];
    for p in profile.iter_mut().take(c_open + 1).skip(c_wall) {
        *p = width as f32;
    }
    apply_depth(&mut grid, config.mode, &profile);

    Ok(Scene {
        grid,
        listener: (center_r, c_open - 1),
        direction: SourceDirection::rightward(),
        report: BuildReport {
            tube_cells: Some(length),
            length_error: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, SceneKind};

    fn tube_config(scene: SceneKind) -> SimulationConfig {
        SimulationConfig {
            scene,
            tube_length: 20,
            tube_width: 5,
            domain_w: 40,
            domain_h: 20,
            ..Default::default()
        }
    }

    #[test]
    fn closed_tube_has_sealed_glottal_end() {
        let config = tube_config(SceneKind::ClosedTube);
        let scene = closed_tube(&config).unwrap();
        let grid = &scene.grid;
        let margin = grid.margin();
        let center_r = grid.rows() / 2;

        // Left wall column seals the glottal end.
        assert_eq!(grid.kind(center_r, margin), CellKind::Wall);
        // Excitation column sits just inside.
        assert_eq!(grid.kind(center_r, margin + 1), CellKind::Excitation);
        // Channel interior is air.
        assert_eq!(grid.kind(center_r, margin + 2), CellKind::Air);
    }

    #[test]
    fn open_tube_has_no_glottal_wall() {
        let config = tube_config(SceneKind::OpenTube);
        let scene = open_tube(&config).unwrap();
        let grid = &scene.grid;
        let margin = grid.margin();
        let center_r = grid.rows() / 2;

        assert_eq!(grid.kind(center_r, margin), CellKind::Air);
        assert_eq!(grid.kind(center_r, margin + 1), CellKind::Excitation);
    }

    #[test]
    fn open_end_is_dirichlet_one_cell_past_the_tube() {
        let config = tube_config(SceneKind::ClosedTube);
        let scene = closed_tube(&config).unwrap();
        let grid = &scene.grid;
        let margin = grid.margin();
        let center_r = grid.rows() / 2;

        let c_open = margin + 1 + config.tube_length + 1;
        assert_eq!(grid.kind(center_r, c_open), CellKind::NoPressure);
        // Listener is the last interior air cell.
        assert_eq!(scene.listener, (center_r, c_open - 1));
        assert_eq!(grid.kind(center_r, c_open - 1), CellKind::Air);
    }

    #[test]
    fn walls_flank_the_channel_over_its_whole_length() {
        let config = tube_config(SceneKind::ClosedTube);
        let scene = closed_tube(&config).unwrap();
        let grid = &scene.grid;
        let margin = grid.margin();
        let center_r = grid.rows() / 2;
        let r_top = center_r - 2;
        let r_bot = r_top + 4;

        for c in margin..=margin + 1 + config.tube_length + 1 {
            assert_eq!(grid.kind(r_top - 1, c), CellKind::Wall, "top wall at col {c}");
            assert_eq!(grid.kind(r_bot + 1, c), CellKind::Wall, "bottom wall at col {c}");
        }
    }

    #[test]
    fn depth_profile_tracks_the_channel_in_2_5d() {
        let config = SimulationConfig {
            mode: Mode::TwoPointFiveD,
            ..tube_config(SceneKind::ClosedTube)
        };
        let scene = closed_tube(&config).unwrap();
        let grid = &scene.grid;
        let margin = grid.margin();

        let inside = grid.idx(grid.rows() / 2, margin + 3);
        assert_eq!(grid.depth_p[inside], 5.0);
        let outside = grid.idx(grid.rows() / 2, grid.cols() - margin - 1);
        assert_eq!(grid.depth_p[outside], 1.0);
    }

    #[test]
    fn too_wide_tube_is_a_config_error() {
        let config = SimulationConfig {
            tube_width: 19,
            ..tube_config(SceneKind::ClosedTube)
        };
        assert!(closed_tube(&config).is_err());
    }
}
