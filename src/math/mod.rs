//! Small dense linear algebra: the 4×4 solve and determinant.

pub mod linsolve;

pub use linsolve::{determinant4, solve4};
