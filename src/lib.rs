//! `loadcell-cal` library crate.
//!
//! Estimates per-channel scale factors of a 4-channel load-cell array from
//! five calibration placements, and converts raw readings into weight.
//!
//! The binary (`lcal`) is a thin wrapper around this library so that the
//! numeric core is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{CalibrationDataset, CalibrationFit, Diagnostics, FitOptions, NormalSystem, ScaleFactors};
pub use error::CalibrationError;
pub use fit::{build_normal_system, fit_calibration};
pub use math::{determinant4, solve4};
pub use models::estimate_weight;
pub use report::evaluate_diagnostics;
