//! Per-face coefficient derivation.
//!
//! After geometry is final, one pass over the interior folds the cell-kind
//! plane into per-face constants so the step loop is pure arithmetic:
//! wall cells kill neighboring velocities through the MIN(β) policy, PML
//! cells damp them through MAX(σ′Δt), and the excitation and impedance
//! terms become precomputed per-face weights.

use crate::physics::AcousticParams;
use crate::physics::constants;
use crate::simulation::cells::{CellKind, CellRegistry};
use crate::simulation::grid::Grid;
use crate::source::SourceDirection;

/// Precomputed per-face and per-cell constants consumed by the engine.
///
/// All planes are frame-sized and indexed like the grid. X entries refer to
/// the face shared with the right neighbor (r, c+1), Y entries to the face
/// shared with the upper neighbor (r-1, c).
pub struct FaceCoeffs {
    /// min(β) across each x face.
    pub min_beta_x: Vec<f32>,
    /// min(β) across each y face.
    pub min_beta_y: Vec<f32>,
    /// max(σ′Δt) across each x face.
    pub max_sigma_x: Vec<f32>,
    /// max(σ′Δt) across each y face.
    pub max_sigma_y: Vec<f32>,
    /// σ′Δt of the cell itself, used by the pressure update.
    pub sigma_p: Vec<f32>,

    /// Fused velocity constant minβ²·Δt/ρ per x face.
    pub beta_dt_rho_x: Vec<f32>,
    /// Fused velocity constant minβ²·Δt/ρ per y face.
    pub beta_dt_rho_y: Vec<f32>,
    /// Velocity normalization denominator minβ + maxσ′Δt per x face.
    pub norm_x: Vec<f32>,
    /// Velocity normalization denominator minβ + maxσ′Δt per y face.
    pub norm_y: Vec<f32>,

    /// Source injection weight per x face: direction weight scaled by the
    /// face's maxσ′Δt; zero on faces not touching exactly one excitation
    /// cell.
    pub excite_x: Vec<f32>,
    /// Source injection weight per y face.
    pub excite_y: Vec<f32>,

    /// Locally-reacting wall coefficient multiplying the cell's own
    /// pressure, per x face.
    pub wall_self_x: Vec<f32>,
    /// Wall coefficient multiplying the right neighbor's pressure.
    pub wall_nb_x: Vec<f32>,
    /// Wall coefficient multiplying the cell's own pressure, per y face.
    pub wall_self_y: Vec<f32>,
    /// Wall coefficient multiplying the upper neighbor's pressure.
    pub wall_nb_y: Vec<f32>,

    /// Linear indices of Dirichlet (no-pressure) cells.
    pub dirichlet: Vec<usize>,

    /// Fused pressure constant ρc²Δt/Δx.
    pub p_scale: f32,
    /// 1/Δx for the pressure gradient.
    pub inv_dx: f32,
}

impl FaceCoeffs {
    /// Derive all planes from the finished grid.
    pub fn derive(
        grid: &Grid,
        registry: &CellRegistry,
        params: &AcousticParams,
        direction: SourceDirection,
    ) -> Self {
        let (rows, cols) = (grid.rows(), grid.cols());
        let size = rows * cols;
        let dt_rho = params.dt / constants::AIR_DENSITY;
        let z_inv = params.wall_admittance();

        let mut coeffs = Self {
            min_beta_x: vec![0.0; size],
            min_beta_y: vec![0.0; size],
            max_sigma_x: vec![0.0; size],
            max_sigma_y: vec![0.0; size],
            sigma_p: vec![0.0; size],
            beta_dt_rho_x: vec![0.0; size],
            beta_dt_rho_y: vec![0.0; size],
            norm_x: vec![1.0; size],
            norm_y: vec![1.0; size],
            excite_x: vec![0.0; size],
            excite_y: vec![0.0; size],
            wall_self_x: vec![0.0; size],
            wall_nb_x: vec![0.0; size],
            wall_self_y: vec![0.0; size],
            wall_nb_y: vec![0.0; size],
            dirichlet: Vec::new(),
            p_scale: params.pressure_scale(),
            inv_dx: 1.0 / params.dx,
        };

        for r in 1..rows - 1 {
            for c in 1..cols - 1 {
                let idx = grid.idx(r, c);
                let here = grid.kind(r, c);
                let right = grid.kind(r, c + 1);
                let above = grid.kind(r - 1, c);

                let own = registry.coefficients(here);
                let rc = registry.coefficients(right);
                let ac = registry.coefficients(above);

                coeffs.sigma_p[idx] = own.sigma_dt;
                if here == CellKind::NoPressure {
                    coeffs.dirichlet.push(idx);
                }

                // Face coefficients: MIN over β, MAX over σ′Δt.
                let min_bx = own.beta.min(rc.beta);
                let min_by = own.beta.min(ac.beta);
                let max_sx = own.sigma_dt.max(rc.sigma_dt);
                let max_sy = own.sigma_dt.max(ac.sigma_dt);

                coeffs.min_beta_x[idx] = min_bx;
                coeffs.min_beta_y[idx] = min_by;
                coeffs.max_sigma_x[idx] = max_sx;
                coeffs.max_sigma_y[idx] = max_sy;
                coeffs.beta_dt_rho_x[idx] = min_bx * min_bx * dt_rho;
                coeffs.beta_dt_rho_y[idx] = min_by * min_by * dt_rho;
                coeffs.norm_x[idx] = min_bx + max_sx;
                coeffs.norm_y[idx] = min_by + max_sy;

                // Source injection weights. A face receives the sample only
                // when exactly one of its two cells is the excitation.
                let wx = match (here == CellKind::Excitation, right == CellKind::Excitation) {
                    (true, false) => direction.right as f32,
                    (false, true) => direction.left as f32,
                    _ => 0.0,
                };
                let wy = match (here == CellKind::Excitation, above == CellKind::Excitation) {
                    (true, false) => direction.up as f32,
                    (false, true) => direction.down as f32,
                    _ => 0.0,
                };
                coeffs.excite_x[idx] = wx * max_sx;
                coeffs.excite_y[idx] = wy * max_sy;

                // Locally-reacting impedance on air/boundary faces. Faces
                // touching the excitation or an absorbing layer carry no
                // boundary term.
                if impedance_face(here, right) {
                    let n = corner_factor(grid, r, if here == CellKind::Air { c } else { c + 1 }, Axis::X);
                    let gain = z_inv * n * max_sx;
                    coeffs.wall_self_x[idx] = gain * rc.beta * (1.0 - own.beta);
                    coeffs.wall_nb_x[idx] = -gain * own.beta * (1.0 - rc.beta);
                }
                if impedance_face(here, above) {
                    let n = corner_factor(grid, if here == CellKind::Air { r } else { r - 1 }, c, Axis::Y);
                    let gain = z_inv * n * max_sy;
                    coeffs.wall_self_y[idx] = gain * ac.beta * (1.0 - own.beta);
                    coeffs.wall_nb_y[idx] = -gain * own.beta * (1.0 - ac.beta);
                }
            }
        }

        coeffs
    }
}

enum Axis {
    X,
    Y,
}

/// True for faces between an air cell and a non-air, non-PML cell, with
/// excitation faces excluded.
fn impedance_face(a: CellKind, b: CellKind) -> bool {
    if a == CellKind::Excitation || b == CellKind::Excitation {
        return false;
    }
    let boundary = |k: CellKind| !matches!(k, CellKind::Air | CellKind::Pml(_));
    (a == CellKind::Air && boundary(b)) || (b == CellKind::Air && boundary(a))
}

/// 1/√2 when the face's air cell also touches a wall along the other axis,
/// 1 otherwise.
fn corner_factor(grid: &Grid, air_r: usize, air_c: usize, axis: Axis) -> f32 {
    let hit = match axis {
        Axis::X => {
            grid.kind(air_r - 1, air_c) == CellKind::Wall
                || grid.kind(air_r + 1, air_c) == CellKind::Wall
        }
        Axis::Y => {
            grid.kind(air_r, air_c - 1) == CellKind::Wall
                || grid.kind(air_r, air_c + 1) == CellKind::Wall
        }
    };
    if hit {
        std::f32::consts::FRAC_1_SQRT_2
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::AcousticParams;

    fn setup(stamp: impl FnOnce(&mut Grid)) -> (Grid, CellRegistry, AcousticParams) {
        let params = AcousticParams::from_multiplier(1);
        let mut grid = Grid::new(8, 8, None).unwrap();
        stamp(&mut grid);
        let registry = CellRegistry::new(0, params.dt);
        (grid, registry, params)
    }

    #[test]
    fn wall_kills_face_beta() {
        let (grid, registry, params) = setup(|g| {
            g.set_kind(4, 5, CellKind::Wall).unwrap();
        });
        let coeffs = FaceCoeffs::derive(&grid, &registry, &params, SourceDirection::omni());

        // Face between air (4,4) and wall (4,5).
        let idx = grid.idx(4, 4);
        assert_eq!(coeffs.min_beta_x[idx], 0.0);
        assert_eq!(coeffs.max_sigma_x[idx], params.dt);
        assert_eq!(coeffs.beta_dt_rho_x[idx], 0.0);
        // An air-air face nearby is untouched.
        let open = grid.idx(2, 2);
        assert_eq!(coeffs.min_beta_x[open], 1.0);
        assert_eq!(coeffs.max_sigma_x[open], 0.0);
    }

    #[test]
    fn velocity_denominator_is_positive_everywhere() {
        let (grid, registry, params) = setup(|g| {
            g.set_kind(3, 3, CellKind::Wall).unwrap();
            g.set_kind(4, 4, CellKind::Excitation).unwrap();
            g.set_kind(5, 5, CellKind::NoPressure).unwrap();
        });
        let coeffs = FaceCoeffs::derive(&grid, &registry, &params, SourceDirection::omni());

        for r in 1..grid.rows() - 1 {
            for c in 1..grid.cols() - 1 {
                let idx = grid.idx(r, c);
                assert!(coeffs.norm_x[idx] > 0.0, "norm_x zero at ({r}, {c})");
                assert!(coeffs.norm_y[idx] > 0.0, "norm_y zero at ({r}, {c})");
            }
        }
    }

    #[test]
    fn excitation_weights_follow_direction() {
        let (grid, registry, params) = setup(|g| {
            g.set_kind(4, 4, CellKind::Excitation).unwrap();
        });
        let dir = SourceDirection::omni();
        let coeffs = FaceCoeffs::derive(&grid, &registry, &params, dir);

        // Right face of the excitation cell.
        assert_eq!(coeffs.excite_x[grid.idx(4, 4)], params.dt);
        // Left face: owned by the air cell at (4,3), weighted by dir.left.
        assert_eq!(coeffs.excite_x[grid.idx(4, 3)], -params.dt);
        // Top face of the excitation cell.
        assert_eq!(coeffs.excite_y[grid.idx(4, 4)], params.dt);
        // Bottom face: owned by the air cell at (5,4), weighted by dir.down.
        assert_eq!(coeffs.excite_y[grid.idx(5, 4)], -params.dt);
    }

    #[test]
    fn excitation_to_excitation_faces_get_nothing() {
        let (grid, registry, params) = setup(|g| {
            g.set_kind(4, 4, CellKind::Excitation).unwrap();
            g.set_kind(4, 5, CellKind::Excitation).unwrap();
        });
        let coeffs = FaceCoeffs::derive(&grid, &registry, &params, SourceDirection::omni());
        assert_eq!(coeffs.excite_x[grid.idx(4, 4)], 0.0);
    }

    #[test]
    fn impedance_applies_on_air_wall_faces_only() {
        let (grid, registry, params) = setup(|g| {
            g.set_kind(4, 5, CellKind::Wall).unwrap();
            g.set_kind(6, 6, CellKind::Excitation).unwrap();
        });
        let coeffs = FaceCoeffs::derive(&grid, &registry, &params, SourceDirection::omni());

        // Air (4,4) | wall (4,5): the neighbor pressure drives the face.
        let idx = grid.idx(4, 4);
        assert_eq!(coeffs.wall_self_x[idx], 0.0);
        assert!(coeffs.wall_nb_x[idx] < 0.0);

        // Air-air face: no boundary term.
        assert_eq!(coeffs.wall_nb_x[grid.idx(2, 2)], 0.0);
        // Faces touching the excitation: no boundary term.
        assert_eq!(coeffs.wall_nb_x[grid.idx(6, 5)], 0.0);
        assert_eq!(coeffs.wall_nb_x[grid.idx(6, 6)], 0.0);
    }

    #[test]
    fn corner_faces_are_scaled_down() {
        let (grid, registry, params) = setup(|g| {
            // Air cell at (4,4) walled on the right and below.
            g.set_kind(4, 5, CellKind::Wall).unwrap();
            g.set_kind(5, 4, CellKind::Wall).unwrap();
        });
        let coeffs = FaceCoeffs::derive(&grid, &registry, &params, SourceDirection::omni());

        let corner = coeffs.wall_nb_x[grid.idx(4, 4)];
        // Same shape without the orthogonal wall.
        let (grid2, registry2, _) = setup(|g| {
            g.set_kind(4, 5, CellKind::Wall).unwrap();
        });
        let flat = FaceCoeffs::derive(&grid2, &registry2, &params, SourceDirection::omni())
            .wall_nb_x[grid2.idx(4, 4)];

        let ratio = corner / flat;
        assert!(
            (ratio - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6,
            "corner face should be scaled by 1/sqrt(2), ratio {ratio}"
        );
    }

    #[test]
    fn dirichlet_cells_are_collected() {
        let (grid, registry, params) = setup(|g| {
            g.set_kind(3, 6, CellKind::NoPressure).unwrap();
            g.set_kind(4, 6, CellKind::NoPressure).unwrap();
        });
        let coeffs = FaceCoeffs::derive(&grid, &registry, &params, SourceDirection::omni());
        assert_eq!(coeffs.dirichlet.len(), 2);
        assert!(coeffs.dirichlet.contains(&grid.idx(3, 6)));
    }
}
