//! Cell kinds and their propagation coefficients.
//!
//! Every cell in the grid carries a kind, and each kind maps to a pair
//! (β, σ′·Δt): β is the fluidity (1 for air, 0 for solid), σ′·Δt the
//! damping applied per step. The mapping is built once at startup and
//! consulted by index everywhere else; no other module knows the numeric
//! values.

use crate::physics::constants;

/// Kind of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    /// Free air - waves propagate unimpeded.
    #[default]
    Air,
    /// Rigid wall with locally-reacting impedance.
    Wall,
    /// Source cell injecting velocity on its outward faces.
    Excitation,
    /// Frozen outer-ring cell anchoring the frame border.
    Dead,
    /// Dirichlet cell whose pressure is forced to zero (open end).
    NoPressure,
    /// Absorbing layer, graded from 0 (innermost) to `layers - 1`.
    Pml(u8),
}

impl CellKind {
    /// True for kinds the wave passes through (β = 1).
    pub fn is_fluid(&self) -> bool {
        matches!(self, CellKind::Air | CellKind::NoPressure | CellKind::Pml(_))
    }

    /// Dense index into the coefficient table.
    fn code(&self) -> usize {
        match *self {
            CellKind::Air => 0,
            CellKind::Wall => 1,
            CellKind::Excitation => 2,
            CellKind::Dead => 3,
            CellKind::NoPressure => 4,
            CellKind::Pml(i) => 5 + i as usize,
        }
    }
}

/// Per-kind propagation coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellCoefficients {
    /// Fluidity: 1 for air-like cells, 0 for solid ones.
    pub beta: f32,
    /// Damping term σ′·Δt.
    pub sigma_dt: f32,
}

/// The one coefficient table, built once per run.
///
/// Adding a new kind means extending [`CellKind`] and the match in
/// [`CellRegistry::new`]; nothing else changes.
#[derive(Debug, Clone)]
pub struct CellRegistry {
    table: Vec<CellCoefficients>,
    layers: u8,
}

impl CellRegistry {
    /// Damping assigned to dead cells; large enough to freeze them.
    const DEAD_SIGMA_DT: f32 = 1.0e6;

    /// Build the table for a run with `layers` absorbing layers and time
    /// step `dt`.
    pub fn new(layers: u8, dt: f32) -> Self {
        let kinds = 5 + layers as usize;
        let mut table = Vec::with_capacity(kinds);

        for code in 0..kinds {
            let coeffs = match code {
                0 | 4 => CellCoefficients {
                    beta: 1.0,
                    sigma_dt: 0.0,
                },
                1 | 2 => CellCoefficients {
                    beta: 0.0,
                    sigma_dt: dt,
                },
                3 => CellCoefficients {
                    beta: 0.0,
                    sigma_dt: Self::DEAD_SIGMA_DT,
                },
                _ => {
                    let i = (code - 5) as f32;
                    let grade = if layers > 1 {
                        i / (layers - 1) as f32
                    } else {
                        1.0
                    };
                    CellCoefficients {
                        beta: 1.0,
                        sigma_dt: grade * constants::PML_SIGMA_MAX * dt,
                    }
                }
            };
            table.push(coeffs);
        }

        Self { table, layers }
    }

    /// Number of absorbing layers this table was built for.
    pub fn layers(&self) -> u8 {
        self.layers
    }

    /// Look up the coefficients for a kind.
    #[inline]
    pub fn coefficients(&self, kind: CellKind) -> CellCoefficients {
        self.table[kind.code()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 44_100.0;

    #[test]
    fn air_and_no_pressure_are_transparent() {
        let registry = CellRegistry::new(6, DT);
        for kind in [CellKind::Air, CellKind::NoPressure] {
            let c = registry.coefficients(kind);
            assert_eq!(c.beta, 1.0);
            assert_eq!(c.sigma_dt, 0.0);
        }
    }

    #[test]
    fn wall_and_excitation_are_solid() {
        let registry = CellRegistry::new(6, DT);
        for kind in [CellKind::Wall, CellKind::Excitation] {
            let c = registry.coefficients(kind);
            assert_eq!(c.beta, 0.0);
            assert_eq!(c.sigma_dt, DT);
        }
    }

    #[test]
    fn pml_grading_ramps_from_zero_to_sigma_max() {
        let registry = CellRegistry::new(6, DT);

        let innermost = registry.coefficients(CellKind::Pml(0));
        assert_eq!(innermost.sigma_dt, 0.0);

        let outermost = registry.coefficients(CellKind::Pml(5));
        assert!((outermost.sigma_dt - constants::PML_SIGMA_MAX * DT).abs() < 1e-12);

        for i in 1..6 {
            let prev = registry.coefficients(CellKind::Pml(i - 1)).sigma_dt;
            let next = registry.coefficients(CellKind::Pml(i)).sigma_dt;
            assert!(next > prev, "grading must increase outward");
        }
    }

    #[test]
    fn single_layer_pml_uses_full_damping() {
        let registry = CellRegistry::new(1, DT);
        let c = registry.coefficients(CellKind::Pml(0));
        assert!((c.sigma_dt - constants::PML_SIGMA_MAX * DT).abs() < 1e-12);
    }

    #[test]
    fn every_kind_keeps_the_velocity_denominator_positive() {
        // The engine divides by (minβ + maxσ′Δt); this holds as long as no
        // kind has both β = 0 and σ′Δt = 0.
        let registry = CellRegistry::new(6, DT);
        let mut kinds = vec![
            CellKind::Air,
            CellKind::Wall,
            CellKind::Excitation,
            CellKind::Dead,
            CellKind::NoPressure,
        ];
        kinds.extend((0..6).map(CellKind::Pml));

        for kind in kinds {
            let c = registry.coefficients(kind);
            assert!(
                c.beta > 0.0 || c.sigma_dt > 0.0,
                "{kind:?} would zero the denominator"
            );
        }
    }
}
