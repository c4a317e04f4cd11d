//! Persisted calibration results (JSON).
//!
//! Schema: `{factors[4], residual_variance, rss, det_A, error_det,
//! calibration_weight, calibration_ok}`.

use std::fs::File;
use std::path::Path;

use crate::domain::CalibrationResult;
use crate::error::AppError;

/// Write a calibration result file.
pub fn write_result_json(path: &Path, result: &CalibrationResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, result)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;
    Ok(())
}

/// Read a calibration result file.
pub fn read_result_json(path: &Path) -> Result<CalibrationResult, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    let result: CalibrationResult = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))?;
    Ok(result)
}
