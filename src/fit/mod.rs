//! Calibration fitting.
//!
//! Responsibilities:
//!
//! - build the least-squares normal equations from a dataset (optionally ridge-regularized)
//! - solve them for the per-channel scale factors
//! - fit many independent datasets in parallel

pub mod calibrate;
pub mod normal;

pub use calibrate::*;
pub use normal::*;
