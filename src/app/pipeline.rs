//! Shared calibration pipeline used by the `fit`, `weigh` and `batch` commands.
//!
//! calibration file -> normal equations -> factors -> diagnostics + per-row residuals
//!
//! The command handlers can then focus on presentation.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::domain::{
    CalibrationDataset, CalibrationFit, CalibrationResult, Diagnostics, FitOptions, PLACEMENTS,
    RowResidual, RunConfig,
};
use crate::error::AppError;
use crate::fit::{fit_batch, fit_calibration};
use crate::io::read_calibration_json;
use crate::report::{evaluate_diagnostics, row_residuals};

/// All computed outputs of a single calibration.
#[derive(Debug, Clone)]
pub struct CalibrationRun {
    pub dataset: CalibrationDataset,
    pub fit: CalibrationFit,
    pub diagnostics: Diagnostics,
    pub rows: [RowResidual; PLACEMENTS],
}

impl CalibrationRun {
    /// The persisted form of this run.
    pub fn result(&self) -> CalibrationResult {
        CalibrationResult::new(&self.dataset, &self.fit, &self.diagnostics)
    }
}

/// One file's outcome in a batch.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub outcome: Result<(CalibrationFit, Diagnostics), AppError>,
}

/// Load the configured calibration file and run the fit.
pub fn run_calibration(config: &RunConfig) -> Result<CalibrationRun, AppError> {
    let dataset = read_calibration_json(&config.calibration_path)?;
    run_calibration_with_dataset(dataset, &config.options)
}

/// Run the fit on an in-memory dataset.
pub fn run_calibration_with_dataset(
    dataset: CalibrationDataset,
    options: &FitOptions,
) -> Result<CalibrationRun, AppError> {
    let fit = fit_calibration(&dataset, options)?;
    let diagnostics = evaluate_diagnostics(&dataset, &fit.factors, &fit.system.a);
    let rows = row_residuals(&dataset, &fit.factors);
    info!(
        rss = diagnostics.rss,
        det_a = diagnostics.det_a,
        ok = diagnostics.ok,
        "calibration evaluated"
    );

    Ok(CalibrationRun {
        dataset,
        fit,
        diagnostics,
        rows,
    })
}

/// Fit every file independently. Files are read in order, the fits run in
/// parallel, and the entries come back in input order.
pub fn run_batch(paths: &[PathBuf], options: &FitOptions) -> Vec<BatchEntry> {
    let loaded: Vec<Result<CalibrationDataset, AppError>> =
        paths.iter().map(|p| read_calibration_json(p)).collect();
    let datasets: Vec<CalibrationDataset> = loaded.iter().filter_map(|r| r.as_ref().ok().copied()).collect();
    let mut fits = fit_batch(&datasets, options).into_iter().zip(datasets);

    paths
        .iter()
        .zip(loaded)
        .map(|(path, loaded)| {
            let outcome = match loaded {
                Err(e) => Err(e),
                Ok(_) => match fits.next() {
                    Some((Ok(fit), dataset)) => {
                        let diagnostics = evaluate_diagnostics(&dataset, &fit.factors, &fit.system.a);
                        Ok((fit, diagnostics))
                    }
                    Some((Err(e), _)) => {
                        warn!(path = %path.display(), error = %e, "batch calibration failed");
                        Err(AppError::from(e))
                    }
                    None => Err(AppError::new(4, "Batch fit produced fewer results than inputs.")),
                },
            };
            BatchEntry {
                path: path.clone(),
                outcome,
            }
        })
        .collect()
}
