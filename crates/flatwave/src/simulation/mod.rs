//! Simulation core: cell registry, grid, derived coefficients, and the
//! FDTD step engine.

pub mod cells;
pub mod coeffs;
pub mod engine;
pub mod grid;

pub use cells::{CellCoefficients, CellKind, CellRegistry};
pub use coeffs::FaceCoeffs;
pub use engine::Engine;
pub use grid::Grid;
