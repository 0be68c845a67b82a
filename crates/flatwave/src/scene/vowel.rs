//! Vocal-tract scene built from an area function.
//!
//! The 44 section areas become equivalent diameters, snapped to odd cell
//! counts so the tract keeps a single center row. Walking the tube left to
//! right, each column stamps a wall pair at the current section's radius;
//! vertical jumps between sections are filled so the tract is fluid-tight.

use tracing::{info, warn};

use crate::config::{SimulationConfig, Vowel};
use crate::error::Result;
use crate::physics::AcousticParams;
use crate::simulation::cells::CellKind;
use crate::simulation::grid::Grid;
use crate::source::SourceDirection;

use super::area_function::{self, SECTIONS, SECTION_LEN_M};
use super::{apply_depth, BuildReport, Scene};

/// Relative length-rounding error above which the build warns.
pub const VOWEL_LENGTH_ERROR_BUDGET: f32 = 0.02;

/// Snap a fractional diameter in cells to the nearest odd count: when
/// plain rounding went up, step down, otherwise step up. Floor of one cell.
fn odd_cells(raw: f32) -> usize {
    let n = raw.round().max(1.0) as usize;
    if n % 2 == 1 {
        n
    } else if (n as f32) > raw {
        n - 1
    } else {
        n + 1
    }
}

/// Wall offset from the center row for a section of `n` air cells.
fn wall_offset(n: usize) -> usize {
    (n - 1) / 2 + 1
}

/// Build the tract for a vowel. The frame is derived from the area
/// function; `domain_w`/`domain_h` in the config are ignored.
pub fn vowel_tract(
    vowel: Vowel,
    config: &SimulationConfig,
    params: &AcousticParams,
) -> Result<Scene> {
    let ds = params.dx;
    let diameters = area_function::diameters_m(vowel);
    let cells: Vec<usize> = diameters.iter().map(|&d| odd_cells(d / ds)).collect();

    // Axial length in cells, and the rounding error against the true
    // tract length.
    let true_len = SECTIONS as f32 * SECTION_LEN_M;
    let tube_cells = (true_len / ds).round().max(1.0) as usize;
    let snapped_len = tube_cells as f32 * ds;
    let length_error = (true_len - snapped_len).abs() / true_len;
    if length_error > VOWEL_LENGTH_ERROR_BUDGET {
        warn!(
            vowel = ?vowel,
            error_percent = length_error * 100.0,
            "tract length rounding exceeds budget; continuing"
        );
    } else {
        info!(vowel = ?vowel, tube_cells, error_percent = length_error * 100.0, "tract sized");
    }

    let max_offset = cells.iter().map(|&n| wall_offset(n)).max().unwrap_or(1);
    let domain_h = 2 * max_offset + 5;
    let domain_w = tube_cells + 8;
    let mut grid = Grid::new(domain_h, domain_w, config.pml.active_layers())?;

    let margin = grid.margin();
    let center_r = grid.rows() / 2;
    let c_start = margin + 1;
    let c_end = c_start + tube_cells;

    // Cumulative section end positions along the axis.
    let cum: Vec<f32> = (1..=SECTIONS).map(|i| i as f32 * SECTION_LEN_M).collect();

    let mut depth = vec![1.0f32; grid.cols()];
    let mut section = 0usize;
    // Seed with the glottal radius so a section change at the very first
    // column still gets its step filled.
    let mut prev_offset: Option<usize> = Some(wall_offset(cells[0]));

    for j in 0..tube_cells {
        let c = c_start + j;
        let axial = (j + 1) as f32 * ds;
        while section < SECTIONS - 1 && axial > cum[section] + 0.5 * ds {
            section += 1;
        }

        let offset = wall_offset(cells[section]);
        grid.set_kind(center_r - offset, c, CellKind::Wall)?;
        grid.set_kind(center_r + offset, c, CellKind::Wall)?;

        // Fill the vertical step between neighboring sections.
        if let Some(prev) = prev_offset {
            let (lo, hi) = (prev.min(offset), prev.max(offset));
            if hi - lo > 1 {
                for k in lo..hi {
                    grid.set_kind(center_r - k, c, CellKind::Wall)?;
                    grid.set_kind(center_r + k, c, CellKind::Wall)?;
                }
            }
        }
        prev_offset = Some(offset);
        depth[c] = cells[section] as f32;
    }

    // Glottal end: excitation spanning the first section, walled above and
    // below.
    let glottis_half = (cells[0] - 1) / 2;
    for r in center_r - glottis_half..=center_r + glottis_half {
        grid.set_kind(r, c_start, CellKind::Excitation)?;
    }
    grid.set_kind(center_r - glottis_half - 1, c_start, CellKind::Wall)?;
    grid.set_kind(center_r + glottis_half + 1, c_start, CellKind::Wall)?;

    // Lip end: Dirichlet column one past the tube, spanning the last
    // section's diameter plus the wall rows.
    let lip_offset = wall_offset(cells[SECTIONS - 1]);
    for r in center_r - lip_offset..=center_r + lip_offset {
        grid.set_kind(r, c_end, CellKind::NoPressure)?;
    }
    depth[c_end] = cells[SECTIONS - 1] as f32;

    apply_depth(&mut grid, config.mode, &depth);

    Ok(Scene {
        grid,
        listener: (center_r, c_end - 1),
        direction: SourceDirection::rightward(),
        report: BuildReport {
            tube_cells: Some(tube_cells),
            length_error: Some(length_error),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneKind;

    fn vowel_config(vowel: Vowel, multiplier: u32) -> (SimulationConfig, AcousticParams) {
        let config = SimulationConfig {
            scene: SceneKind::Vowel,
            vowel: Some(vowel),
            srate_multiplier: multiplier,
            ..Default::default()
        };
        let params = AcousticParams::from_multiplier(multiplier);
        (config, params)
    }

    #[test]
    fn odd_snapping_follows_the_rounding_direction() {
        // 1.74 rounds up to 2, so it steps down to 1.
        assert_eq!(odd_cells(1.74), 1);
        // 2.3 rounds down to 2, so it steps up to 3.
        assert_eq!(odd_cells(2.3), 3);
        // Odd results are kept.
        assert_eq!(odd_cells(3.2), 3);
        assert_eq!(odd_cells(4.9), 5);
        // Floor of one cell.
        assert_eq!(odd_cells(0.1), 1);
    }

    #[test]
    fn length_error_is_within_budget_at_double_rate() {
        for vowel in [Vowel::A, Vowel::U, Vowel::I] {
            let (config, params) = vowel_config(vowel, 2);
            let scene = vowel_tract(vowel, &config, &params).unwrap();
            let error = scene.report.length_error.unwrap();
            assert!(
                error < VOWEL_LENGTH_ERROR_BUDGET,
                "{vowel:?}: length error {error}"
            );
        }
    }

    #[test]
    fn glottal_end_is_excited_and_walled() {
        let (config, params) = vowel_config(Vowel::A, 2);
        let scene = vowel_tract(Vowel::A, &config, &params).unwrap();
        let grid = &scene.grid;
        let center_r = grid.rows() / 2;
        let c_start = grid.margin() + 1;

        assert_eq!(grid.kind(center_r, c_start), CellKind::Excitation);

        // Walk up from the center: excitation cells, then a wall.
        let mut r = center_r;
        while grid.kind(r, c_start) == CellKind::Excitation {
            r -= 1;
        }
        assert_eq!(grid.kind(r, c_start), CellKind::Wall);
    }

    #[test]
    fn lip_end_is_dirichlet() {
        let (config, params) = vowel_config(Vowel::I, 2);
        let scene = vowel_tract(Vowel::I, &config, &params).unwrap();
        let grid = &scene.grid;
        let center_r = grid.rows() / 2;
        let (listener_r, listener_c) = scene.listener;

        assert_eq!(listener_r, center_r);
        assert_eq!(grid.kind(center_r, listener_c + 1), CellKind::NoPressure);
        assert_eq!(grid.kind(center_r, listener_c), CellKind::Air);
    }

    #[test]
    fn tract_interior_is_sealed_except_at_the_lips() {
        // Flood-fill air from just inside the glottis, blocked by the
        // Dirichlet column at the lips. Every reached cell must lie inside
        // the wall envelope; an escape means the walls leak.
        let (config, params) = vowel_config(Vowel::U, 2);
        let scene = vowel_tract(Vowel::U, &config, &params).unwrap();
        let grid = &scene.grid;
        let center_r = grid.rows() / 2;
        let c_start = grid.margin() + 1;
        let tube_cells = scene.report.tube_cells.unwrap();
        let c_end = c_start + tube_cells;

        let mut seen = vec![false; grid.rows() * grid.cols()];
        let mut stack = vec![(center_r, c_start + 1)];
        seen[grid.idx(center_r, c_start + 1)] = true;

        while let Some((r, c)) = stack.pop() {
            assert!(
                c > c_start - 1 && c < c_end,
                "flood escaped the tube axially at ({r}, {c})"
            );
            let max_offset = (grid.domain_h() - 5) / 2;
            assert!(
                r.abs_diff(center_r) <= max_offset,
                "flood escaped through a wall at ({r}, {c})"
            );
            for (nr, nc) in [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)] {
                let idx = grid.idx(nr, nc);
                if !seen[idx] && grid.kind(nr, nc) == CellKind::Air {
                    seen[idx] = true;
                    stack.push((nr, nc));
                }
            }
        }
    }

    #[test]
    fn every_air_cell_is_reachable() {
        // No isolated pockets anywhere in the frame: one flood fill over
        // fluid cells starting outside the tract must reach every air
        // cell (the tract connects through its open lip end).
        let (config, params) = vowel_config(Vowel::A, 2);
        let scene = vowel_tract(Vowel::A, &config, &params).unwrap();
        let grid = &scene.grid;

        let fluid =
            |k: CellKind| matches!(k, CellKind::Air | CellKind::NoPressure | CellKind::Pml(_));

        let margin = grid.margin();
        let start = (margin, margin);
        assert!(fluid(grid.kind(start.0, start.1)));

        let mut seen = vec![false; grid.rows() * grid.cols()];
        let mut stack = vec![start];
        seen[grid.idx(start.0, start.1)] = true;
        while let Some((r, c)) = stack.pop() {
            for (nr, nc) in [(r.wrapping_sub(1), c), (r + 1, c), (r, c.wrapping_sub(1)), (r, c + 1)]
            {
                if nr >= grid.rows() || nc >= grid.cols() {
                    continue;
                }
                let idx = grid.idx(nr, nc);
                if !seen[idx] && fluid(grid.kind(nr, nc)) {
                    seen[idx] = true;
                    stack.push((nr, nc));
                }
            }
        }

        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                if grid.kind(r, c) == CellKind::Air {
                    assert!(seen[grid.idx(r, c)], "unreachable air cell at ({r}, {c})");
                }
            }
        }
    }
}
