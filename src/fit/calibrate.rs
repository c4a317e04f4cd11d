//! Calibration solve: normal equations in, scale factors out.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{CalibrationDataset, CalibrationFit, FitOptions, ScaleFactors};
use crate::error::CalibrationError;
use crate::fit::normal::build_normal_system;
use crate::math::solve4;

/// Fit per-channel scale factors to one calibration dataset.
///
/// The normal system is returned alongside the factors so callers can print
/// or persist it. A singular system is a fatal calibration failure: it is
/// returned unchanged and never retried here.
pub fn fit_calibration(
    dataset: &CalibrationDataset,
    options: &FitOptions,
) -> Result<CalibrationFit, CalibrationError> {
    let system = build_normal_system(dataset, options);
    debug!(a = ?system.a, b = ?system.b, ridge = options.ridge, "normal equations");

    let solution = solve4(&system.a, &system.b)?;
    let factors = ScaleFactors::from(solution);
    info!(factors = ?factors.as_array(), "calibration solved");

    Ok(CalibrationFit { factors, system })
}

/// Fit several independent datasets in parallel.
///
/// Results keep the input order; one failure does not affect the others.
pub fn fit_batch(
    datasets: &[CalibrationDataset],
    options: &FitOptions,
) -> Vec<Result<CalibrationFit, CalibrationError>> {
    datasets
        .par_iter()
        .map(|dataset| fit_calibration(dataset, options))
        .collect()
}
