//! The simulation driver.
//!
//! Wires a validated configuration into a scene, derived coefficients, a
//! rendered source, and the step loop. The loop is the only place the
//! NumericError contract is enforced: a non-finite sample stops the run
//! and the offending step's output is discarded.

use tracing::{error, info};

use crate::config::SimulationConfig;
use crate::error::{FlatwaveError, Result};
use crate::physics::AcousticParams;
use crate::probe::{FieldSnapshot, Listener, SnapshotSink};
use crate::scene::{self, BuildReport};
use crate::simulation::cells::CellRegistry;
use crate::simulation::coeffs::FaceCoeffs;
use crate::simulation::engine::Engine;
use crate::simulation::grid::Grid;
use crate::source::SourceSignal;

/// A fully built simulation, ready to step.
pub struct Simulation {
    engine: Engine,
    source: SourceSignal,
    listener: Listener,
    report: BuildReport,
    params: AcousticParams,
    snapshot_every: Option<u32>,
    step: u64,
    total_steps: u64,
}

impl Simulation {
    /// Validate the configuration and build everything the loop needs.
    /// Geometry and coefficient tables are fixed from here on.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let params = AcousticParams::from_multiplier(config.srate_multiplier);
        let total_steps = params.steps_for_duration_ms(config.duration_ms);
        if total_steps == 0 {
            return Err(FlatwaveError::config(
                "duration_ms is shorter than one step",
            ));
        }

        let scene = scene::build(config, &params)?;
        let layers = config.pml.active_layers().unwrap_or(0);
        let registry = CellRegistry::new(layers, params.dt);
        let coeffs = FaceCoeffs::derive(&scene.grid, &registry, &params, scene.direction);
        let source = SourceSignal::render(&config.source, params.dt, total_steps);

        info!(
            sample_rate = params.sample_rate,
            dx_mm = params.dx * 1e3,
            total_steps,
            "simulation ready"
        );

        Ok(Self {
            engine: Engine::new(scene.grid, coeffs),
            source,
            listener: Listener::new(scene.listener.0, scene.listener.1),
            report: scene.report,
            params,
            snapshot_every: config.snapshot_every,
            step: 0,
            total_steps,
        })
    }

    /// Advance one step and return the listener sample.
    pub fn advance(&mut self) -> Result<f32> {
        let drive = self.source.sample(self.step);
        self.engine.step(drive);

        let (row, col) = self.listener.position();
        let sample = self.engine.grid().pressure(row, col);
        if !sample.is_finite() {
            error!(step = self.step, "non-finite listener sample; stopping");
            return Err(FlatwaveError::Numeric { step: self.step });
        }

        self.listener.record(self.engine.grid());
        self.step += 1;
        Ok(sample)
    }

    /// Run to the configured duration.
    pub fn run(&mut self) -> Result<()> {
        while self.step < self.total_steps {
            self.advance()?;
        }
        Ok(())
    }

    /// Run to the configured duration, delivering snapshots to `sink`
    /// every `snapshot_every` steps. Each snapshot boundary also scans the
    /// full field planes for non-finite values.
    pub fn run_with_sink(&mut self, sink: &mut dyn SnapshotSink) -> Result<()> {
        let every = self.snapshot_every.unwrap_or(0);
        while self.step < self.total_steps {
            self.advance()?;
            if every > 0 && self.step % every as u64 == 0 {
                if self.engine.grid().has_non_finite() {
                    error!(step = self.step, "non-finite field plane; stopping");
                    return Err(FlatwaveError::Numeric { step: self.step - 1 });
                }
                sink.on_snapshot(&FieldSnapshot::capture(self.engine.grid(), self.step));
            }
        }
        Ok(())
    }

    /// Steps completed so far.
    pub fn completed_steps(&self) -> u64 {
        self.step
    }

    /// Steps the configured duration spans.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Listener samples recorded so far, one per completed step.
    pub fn samples(&self) -> &[f32] {
        self.listener.samples()
    }

    /// The rendered excitation sequence.
    pub fn source_samples(&self) -> &[f32] {
        self.source.samples()
    }

    /// Geometry diagnostics from the scene build.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Discretization parameters of this run.
    pub fn params(&self) -> &AcousticParams {
        &self.params
    }

    /// The grid, with the latest published pressure field.
    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    /// The listener cell, frame coordinates.
    pub fn listener_position(&self) -> (usize, usize) {
        self.listener.position()
    }
}
