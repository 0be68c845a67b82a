//! Error types for the simulator.

use thiserror::Error;

/// Result type for flatwave operations.
pub type Result<T> = std::result::Result<T, FlatwaveError>;

/// Errors surfaced by the driver.
///
/// Geometry rounding overruns are not errors: they are reported as a
/// warning in the scene's [`BuildReport`](crate::scene::BuildReport) and
/// the run continues.
#[derive(Error, Debug)]
pub enum FlatwaveError {
    /// Out-of-range selector, non-positive dimension, or a geometry that
    /// does not fit in the frame after PML padding. Reported before any
    /// simulation runs.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A non-finite value appeared in a field plane. Fatal; the offending
    /// step's output is discarded and the driver stops.
    #[error("non-finite field value at step {step}")]
    Numeric {
        /// The step whose output was discarded.
        step: u64,
    },
}

impl FlatwaveError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
