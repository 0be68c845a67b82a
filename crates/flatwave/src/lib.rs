//! # flatwave
//!
//! Two-dimensional FDTD simulation of acoustic wave propagation in wind
//! instruments and vocal tracts, after Allen & Raghuvanshi's interactive
//! aerophone method with Zappi/Fels-style absorbing layers and
//! area-function-driven tract geometry.
//!
//! A staggered pressure/velocity field is advanced over a classified cell
//! grid: each cell's kind (air, wall, absorbing layer, excitation,
//! zero-pressure, dead) selects its propagation and damping coefficients,
//! and a locally-reacting impedance couples air cells to walls. The output
//! is the pressure series at a listener cell, sampled at audio rate.
//!
//! ## Example
//!
//! ```no_run
//! use flatwave::{Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::default();
//! let mut sim = Simulation::from_config(&config)?;
//! sim.run()?;
//! let signal: &[f32] = sim.samples();
//! # Ok::<(), flatwave::FlatwaveError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod physics;
pub mod probe;
pub mod runner;
pub mod scene;
pub mod simulation;
pub mod source;

pub use config::{Mode, PmlSettings, SceneKind, SimulationConfig, Vowel};
pub use error::{FlatwaveError, Result};
pub use physics::AcousticParams;
pub use probe::{FieldSnapshot, Listener, SnapshotRecorder, SnapshotSink, WALL_SENTINEL};
pub use runner::Simulation;
pub use scene::{BuildReport, Scene};
pub use simulation::{CellKind, CellRegistry, Engine, FaceCoeffs, Grid};
pub use source::{SourceDirection, SourceKind, SourceSignal, SourceSpec};
