//! Normal equations for the calibration least-squares problem.
//!
//! Each of the five placements contributes one design row
//! `x_k = measurement_k - zero` and one observation `y_k = W` (the known
//! calibration weight). The scale factors `f` minimize `Σ (y_k - x_k·f)²`,
//! whose normal equations are:
//!
//! ```text
//! (XᵗX + λI) f = Xᵗy
//! ```
//!
//! `λ` is the optional ridge term. It only touches the diagonal of `A`;
//! `b` is left as-is.

use nalgebra::{Matrix4, Matrix5x4, Vector5};

use crate::domain::{CalibrationDataset, FitOptions, NormalSystem, Placement, CHANNELS};

/// Design matrix: one zero-referenced row per placement, in `Placement::ALL` order.
pub fn design_matrix(dataset: &CalibrationDataset) -> Matrix5x4<f64> {
    let rows = Placement::ALL.map(|p| dataset.delta(p));
    Matrix5x4::from_fn(|k, j| rows[k][j])
}

/// Observation vector: the calibration weight broadcast to every placement.
pub fn observations(dataset: &CalibrationDataset) -> Vector5<f64> {
    Vector5::repeat(dataset.calibration_weight)
}

/// Build `A = XᵗX (+ ridge·I)` and `b = Xᵗy`.
///
/// Total: ill-conditioning only surfaces once `A` reaches the solver.
pub fn build_normal_system(dataset: &CalibrationDataset, options: &FitOptions) -> NormalSystem {
    let x = design_matrix(dataset);
    let y = observations(dataset);

    let mut a: Matrix4<f64> = x.tr_mul(&x);
    let b = x.tr_mul(&y);

    if options.ridge != 0.0 {
        for i in 0..CHANNELS {
            a[(i, i)] += options.ridge;
        }
    }

    NormalSystem { a, b }
}
