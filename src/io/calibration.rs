//! Read/write calibration dataset JSON files.
//!
//! Schema (all vectors have exactly four channels):
//!
//! ```json
//! {
//!   "calibration_weight": 100.0,
//!   "zero": [1020, 1018, 1005, 1009],
//!   "on_cell_0": [...], "on_cell_1": [...], "on_cell_2": [...], "on_cell_3": [...],
//!   "on_center": [...]
//! }
//! ```

use std::fs::File;
use std::path::Path;

use tracing::warn;

use crate::domain::CalibrationDataset;
use crate::error::AppError;

/// Read a calibration dataset.
pub fn read_calibration_json(path: &Path) -> Result<CalibrationDataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to read calibration file '{}': {e}", path.display()))
    })?;
    let dataset: CalibrationDataset = serde_json::from_reader(file).map_err(|e| {
        AppError::new(2, format!("Invalid calibration JSON '{}': {e}", path.display()))
    })?;

    if !(dataset.calibration_weight.is_finite() && dataset.calibration_weight > 0.0) {
        warn!(
            weight = dataset.calibration_weight,
            path = %path.display(),
            "calibration weight is not a positive number"
        );
    }

    Ok(dataset)
}

/// Write a calibration dataset (used by `lcal simulate`).
pub fn write_calibration_json(path: &Path, dataset: &CalibrationDataset) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create calibration file '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, dataset)
        .map_err(|e| AppError::new(2, format!("Failed to write calibration JSON: {e}")))?;
    Ok(())
}
