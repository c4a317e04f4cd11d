//! Read-time model: converting raw readings into weight with fitted factors.
//!
//! Kept separate from `fit` so estimation never depends on the solver.

pub mod estimator;

pub use estimator::*;
