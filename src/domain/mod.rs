//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - calibration inputs (`CalibrationDataset`, `Placement`, `Channels`)
//! - solver intermediates and outputs (`NormalSystem`, `ScaleFactors`, `CalibrationFit`)
//! - fit quality and persisted results (`Diagnostics`, `CalibrationResult`)

pub mod types;

pub use types::*;
