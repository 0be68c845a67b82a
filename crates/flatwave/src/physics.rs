//! Acoustic parameters and physical constants.

/// Physical constants used throughout the simulation.
pub mod constants {
    /// Density of air in the tract (kg/m³).
    pub const AIR_DENSITY: f32 = 1.140;

    /// Speed of sound (m/s).
    pub const SPEED_OF_SOUND: f32 = 350.0;

    /// Wall reflection coefficient for the locally-reacting impedance.
    pub const WALL_REFLECTION: f32 = 0.008;

    /// Maximum damping of the outermost absorbing layer.
    pub const PML_SIGMA_MAX: f32 = 0.5;

    /// Base audio sample rate (Hz). The simulation rate is an integer
    /// multiple of this.
    pub const BASE_SAMPLE_RATE: u32 = 44_100;
}

/// Derived time/space discretization for a simulation run.
///
/// The time step is the audio sampling period and the cell size follows
/// from the 2D CFL condition at the stability limit: Δx = c·Δt·√2, which
/// puts the Courant number at exactly 1/√2.
#[derive(Debug, Clone, Copy)]
pub struct AcousticParams {
    /// Simulation (and output) sample rate in Hz.
    pub sample_rate: u32,
    /// Time step in seconds (1 / sample_rate).
    pub dt: f32,
    /// Cell size in meters (Δx = Δy).
    pub dx: f32,
}

impl AcousticParams {
    /// Build parameters from a sample-rate multiplier.
    pub fn from_multiplier(multiplier: u32) -> Self {
        let sample_rate = constants::BASE_SAMPLE_RATE * multiplier.max(1);
        let dt = 1.0 / sample_rate as f32;
        let dx = constants::SPEED_OF_SOUND * dt * std::f32::consts::SQRT_2;
        Self {
            sample_rate,
            dt,
            dx,
        }
    }

    /// Courant number c·Δt/Δx. Always 1/√2 by construction.
    pub fn courant_number(&self) -> f32 {
        constants::SPEED_OF_SOUND * self.dt / self.dx
    }

    /// Number of whole cells covering a physical length in meters.
    pub fn cells_for_length(&self, meters: f32) -> usize {
        (meters / self.dx).round() as usize
    }

    /// Number of steps covering a duration in milliseconds.
    pub fn steps_for_duration_ms(&self, duration_ms: f32) -> u64 {
        (duration_ms * 1e-3 * self.sample_rate as f32).round() as u64
    }

    /// Inverse of the locally-reacting wall impedance
    /// Z_n = ρc·(1+√(1−α)) / (1−√(1−α)).
    pub fn wall_admittance(&self) -> f32 {
        let root = (1.0 - constants::WALL_REFLECTION).sqrt();
        let z_n = constants::AIR_DENSITY * constants::SPEED_OF_SOUND * (1.0 + root) / (1.0 - root);
        1.0 / z_n
    }

    /// Fused pressure-update constant ρc²Δt/Δx.
    pub fn pressure_scale(&self) -> f32 {
        constants::AIR_DENSITY * constants::SPEED_OF_SOUND * constants::SPEED_OF_SOUND * self.dt
            / self.dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_scales_rate_and_refines_grid() {
        let base = AcousticParams::from_multiplier(1);
        let fine = AcousticParams::from_multiplier(4);

        assert_eq!(base.sample_rate, 44_100);
        assert_eq!(fine.sample_rate, 176_400);
        assert!(fine.dx < base.dx);
        assert!((fine.dx - base.dx / 4.0).abs() < 1e-6);
    }

    #[test]
    fn courant_number_is_at_the_2d_limit() {
        let params = AcousticParams::from_multiplier(1);
        let limit = 1.0 / std::f32::consts::SQRT_2;
        assert!((params.courant_number() - limit).abs() < 1e-6);
    }

    #[test]
    fn wall_admittance_is_small_and_positive() {
        let params = AcousticParams::from_multiplier(1);
        let y = params.wall_admittance();
        assert!(y > 0.0);
        // alpha = 0.008 makes the wall nearly rigid
        assert!(y < 1.0 / (constants::AIR_DENSITY * constants::SPEED_OF_SOUND));
    }

    #[test]
    fn zero_multiplier_clamps_to_base_rate() {
        let params = AcousticParams::from_multiplier(0);
        assert_eq!(params.sample_rate, 44_100);
    }
}
