//! Fit diagnostics against the calibration rows.
//!
//! - `RSS = Σ (W - ŵ_k)²` over the five placements
//! - residual variance `RSS / (rows - params)`, or `RSS` when there are no
//!   degrees of freedom left
//! - `det(A)` of the (possibly ridged) normal matrix
//! - `error_det = det(A) · residual variance`, a heuristic figure of merit
//!
//! None of these feed back into the factors.

use nalgebra::Matrix4;
use tracing::warn;

use crate::domain::{
    CalibrationDataset, Diagnostics, Placement, RowResidual, ScaleFactors, CHANNELS,
    CONVERGENCE_THRESHOLD, PLACEMENTS,
};
use crate::math::determinant4;
use crate::models::WeightEstimator;

/// Estimated weight and residual for each calibration placement.
pub fn row_residuals(dataset: &CalibrationDataset, factors: &ScaleFactors) -> [RowResidual; PLACEMENTS] {
    let estimator = WeightEstimator::for_dataset(dataset, factors);
    Placement::ALL.map(|placement| {
        let estimated = estimator.estimate(&dataset.measurement(placement));
        RowResidual {
            placement,
            estimated,
            residual: dataset.calibration_weight - estimated,
        }
    })
}

/// `rss / (rows - params)`, falling back to `rss` itself when `rows <= params`.
pub fn residual_variance(rss: f64, rows: usize, params: usize) -> f64 {
    let df = rows.saturating_sub(params);
    if df > 0 { rss / df as f64 } else { rss }
}

/// Compute all diagnostics for a fitted calibration.
///
/// `a` is the normal matrix the factors were solved from (after ridge).
pub fn evaluate_diagnostics(
    dataset: &CalibrationDataset,
    factors: &ScaleFactors,
    a: &Matrix4<f64>,
) -> Diagnostics {
    let rss: f64 = row_residuals(dataset, factors)
        .iter()
        .map(|r| r.residual * r.residual)
        .sum();
    let residual_variance = residual_variance(rss, PLACEMENTS, CHANNELS);
    let det_a = determinant4(a);
    let error_det = det_a * residual_variance;
    let ok = residual_variance < CONVERGENCE_THRESHOLD;

    if !ok {
        warn!(residual_variance, "calibration residual variance above threshold");
    }

    Diagnostics {
        rss,
        residual_variance,
        det_a,
        error_det,
        ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitOptions;
    use crate::fit::fit_calibration;

    fn grid_dataset() -> CalibrationDataset {
        CalibrationDataset {
            calibration_weight: 100.0,
            zero: [0.0; 4],
            on_cell_0: [100.0, 0.0, 0.0, 0.0],
            on_cell_1: [0.0, 100.0, 0.0, 0.0],
            on_cell_2: [0.0, 0.0, 100.0, 0.0],
            on_cell_3: [0.0, 0.0, 0.0, 100.0],
            on_center: [25.0, 25.0, 25.0, 25.0],
        }
    }

    #[test]
    fn exact_fit_converges() {
        let cal = grid_dataset();
        let fit = fit_calibration(&cal, &FitOptions::default()).unwrap();
        let diag = evaluate_diagnostics(&cal, &fit.factors, &fit.system.a);
        assert!(diag.rss < 1e-12, "rss = {}", diag.rss);
        assert!(diag.ok);
        assert!(diag.det_a > 0.0);
        assert_eq!(diag.error_det, diag.det_a * diag.residual_variance);
    }

    #[test]
    fn residuals_use_known_weight_minus_estimate() {
        let cal = grid_dataset();
        let factors = ScaleFactors::new([1.1, 1.0, 1.0, 1.0]);
        let rows = row_residuals(&cal, &factors);
        assert_eq!(rows[0].placement, Placement::Cell0);
        assert!((rows[0].estimated - 110.0).abs() < 1e-12);
        assert!((rows[0].residual + 10.0).abs() < 1e-12);
        assert_eq!(rows[1].residual, 0.0);
        assert!((rows[4].residual + 2.5).abs() < 1e-12);
    }

    #[test]
    fn poor_factors_fail_convergence() {
        let cal = grid_dataset();
        let factors = ScaleFactors::new([1.1, 1.0, 1.0, 1.0]);
        let a = Matrix4::identity();
        let diag = evaluate_diagnostics(&cal, &factors, &a);
        // 10² + 2.5² with one degree of freedom.
        assert!((diag.rss - 106.25).abs() < 1e-9);
        assert!((diag.residual_variance - 106.25).abs() < 1e-9);
        assert_eq!(diag.det_a, 1.0);
        assert!(!diag.ok);
    }

    #[test]
    fn residual_variance_divides_by_degrees_of_freedom() {
        assert_eq!(residual_variance(9.0, 5, 4), 9.0);
        assert_eq!(residual_variance(9.0, 7, 4), 3.0);
    }

    #[test]
    fn residual_variance_without_degrees_of_freedom_is_rss() {
        assert_eq!(residual_variance(9.0, 4, 4), 9.0);
        assert_eq!(residual_variance(9.0, 3, 4), 9.0);
    }
}
