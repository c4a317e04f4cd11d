//! Dense 4×4 linear solver.
//!
//! The normal equations of a calibration are always 4×4, so instead of a
//! general decomposition we run Gaussian elimination with partial pivoting
//! directly on fixed-size nalgebra matrices:
//!
//! - pivot selection picks the largest `|m[row][col]|` among rows `col..4`
//! - only rows are swapped (no column pivoting, no scaling/equilibration)
//! - `solve4` works on the augmented matrix `[A | b]` and back-substitutes
//! - `determinant4` stops at upper-triangular form and tracks the swap sign
//!
//! A zero pivot is a hard failure for `solve4` but simply means `det = 0`
//! for `determinant4`, which is only ever used as a diagnostic.

use nalgebra::{Matrix4, Matrix4x5, SMatrix, Vector4};
use tracing::trace;

use crate::error::CalibrationError;

const N: usize = 4;

/// Solve `A x = b`.
///
/// Returns `CalibrationError::ZeroPivot` when a column has no non-zero pivot
/// candidate, and `CalibrationError::ZeroDiagonal` if a zero diagonal entry
/// is met during back substitution.
pub fn solve4(a: &Matrix4<f64>, b: &Vector4<f64>) -> Result<Vector4<f64>, CalibrationError> {
    let mut aug = Matrix4x5::from_fn(|r, c| if c < N { a[(r, c)] } else { b[r] });
    forward_eliminate(&mut aug)?;
    back_substitute(&aug)
}

/// Determinant of `a` via the same pivoted elimination as [`solve4`].
///
/// Never fails: a singular matrix yields exactly `0.0`.
pub fn determinant4(a: &Matrix4<f64>) -> f64 {
    let mut m = *a;
    let mut det = 1.0;
    let mut sign = 1.0;

    for col in 0..N {
        let (pivot, max_abs) = select_pivot(&m, col);
        if max_abs == 0.0 {
            return 0.0;
        }
        if pivot != col {
            m.swap_rows(col, pivot);
            sign = -sign;
        }
        det *= m[(col, col)];
        eliminate_below(&mut m, col);
    }

    det * sign
}

/// Reduce the augmented matrix `[A | b]` to upper-triangular form in place.
pub(crate) fn forward_eliminate(aug: &mut Matrix4x5<f64>) -> Result<(), CalibrationError> {
    for col in 0..N {
        let (pivot, max_abs) = select_pivot(aug, col);
        if max_abs == 0.0 {
            return Err(CalibrationError::ZeroPivot { column: col });
        }
        if pivot != col {
            trace!(col, pivot, "swapping pivot row");
            aug.swap_rows(col, pivot);
        }
        eliminate_below(aug, col);
    }
    Ok(())
}

/// Solve an upper-triangular augmented system from the last row up.
///
/// Checks every diagonal entry on its own, independent of whether
/// [`forward_eliminate`] produced the matrix.
pub(crate) fn back_substitute(aug: &Matrix4x5<f64>) -> Result<Vector4<f64>, CalibrationError> {
    let mut x = Vector4::zeros();
    for i in (0..N).rev() {
        let diag = aug[(i, i)];
        if diag == 0.0 {
            return Err(CalibrationError::ZeroDiagonal { row: i });
        }
        let mut sum = aug[(i, N)];
        for j in i + 1..N {
            sum -= aug[(i, j)] * x[j];
        }
        x[i] = sum / diag;
    }
    Ok(x)
}

/// Row index and magnitude of the largest entry in `col`, rows `col..4`.
fn select_pivot<const C: usize>(m: &SMatrix<f64, N, C>, col: usize) -> (usize, f64) {
    let mut pivot = col;
    let mut max_abs = m[(col, col)].abs();
    for r in col + 1..N {
        let v = m[(r, col)].abs();
        if v > max_abs {
            max_abs = v;
            pivot = r;
        }
    }
    (pivot, max_abs)
}

/// Zero out `col` below the pivot row by row subtraction.
fn eliminate_below<const C: usize>(m: &mut SMatrix<f64, N, C>, col: usize) {
    let pivot = m[(col, col)];
    for r in col + 1..N {
        let factor = m[(r, col)] / pivot;
        for c in col..C {
            let sub = factor * m[(col, c)];
            m[(r, c)] -= sub;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spd() -> Matrix4<f64> {
        Matrix4::new(
            4.0, 1.0, 0.5, 0.0, //
            1.0, 3.0, 0.2, 0.1, //
            0.5, 0.2, 5.0, 1.0, //
            0.0, 0.1, 1.0, 2.0,
        )
    }

    #[test]
    fn solves_well_conditioned_system() {
        let a = spd();
        let x_true = Vector4::new(1.0, -2.0, 0.5, 3.0);
        let b = a * x_true;

        let x = solve4(&a, &b).unwrap();
        for i in 0..4 {
            assert!((x[i] - x_true[i]).abs() < 1e-12, "x[{i}] = {}", x[i]);
        }
    }

    #[test]
    fn pivoting_handles_zero_leading_entry() {
        // Permutation-like matrix: no solution without a row swap.
        let a = Matrix4::new(
            0.0, 2.0, 0.0, 0.0, //
            3.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 4.0, //
            0.0, 0.0, 5.0, 0.0,
        );
        let b = Vector4::new(2.0, 3.0, 4.0, 5.0);
        let x = solve4(&a, &b).unwrap();
        assert_eq!(x, Vector4::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn zero_column_is_a_zero_pivot() {
        let mut a = spd();
        a.set_column(2, &Vector4::zeros());
        let err = solve4(&a, &Vector4::new(1.0, 1.0, 1.0, 1.0)).unwrap_err();
        assert_eq!(err, CalibrationError::ZeroPivot { column: 2 });
    }

    #[test]
    fn rank_one_matrix_is_rejected() {
        let v = Vector4::new(10.0, 20.0, 30.0, 40.0);
        let a = (v * v.transpose()) * 5.0;
        let err = solve4(&a, &(v * 500.0)).unwrap_err();
        assert_eq!(err, CalibrationError::ZeroPivot { column: 1 });
    }

    #[test]
    fn back_substitution_checks_diagonal_on_its_own() {
        // Already upper-triangular, but row 2 has a zero diagonal.
        let aug = Matrix4x5::from_row_slice(&[
            1.0, 2.0, 3.0, 4.0, 10.0, //
            0.0, 1.0, 1.0, 1.0, 3.0, //
            0.0, 0.0, 0.0, 1.0, 1.0, //
            0.0, 0.0, 0.0, 2.0, 2.0,
        ]);
        let err = back_substitute(&aug).unwrap_err();
        assert_eq!(err, CalibrationError::ZeroDiagonal { row: 2 });
    }

    #[test]
    fn back_substitution_solves_triangular_system() {
        let aug = Matrix4x5::from_row_slice(&[
            2.0, 1.0, 0.0, 0.0, 4.0, //
            0.0, 1.0, 1.0, 0.0, 3.0, //
            0.0, 0.0, 4.0, 2.0, 6.0, //
            0.0, 0.0, 0.0, 1.0, 1.0,
        ]);
        let x = back_substitute(&aug).unwrap();
        assert_eq!(x, Vector4::new(1.0, 2.0, 1.0, 1.0));
    }

    #[test]
    fn determinant_of_identity_and_permutation() {
        assert_eq!(determinant4(&Matrix4::identity()), 1.0);

        let mut p = Matrix4::identity();
        p.swap_rows(0, 3);
        assert_eq!(determinant4(&p), -1.0);
    }

    #[test]
    fn determinant_of_singular_matrix_vanishes() {
        let mut a = spd();
        let row1 = a.row(1).clone_owned();
        a.set_row(3, &row1);
        // Column 0 of a rank-deficient matrix still pivots fine; the zero
        // shows up later in the elimination.
        let det = determinant4(&a);
        assert!(det.abs() < 1e-12);

        let zero_col = Matrix4::from_fn(|r, c| if c == 0 { 0.0 } else { (r + c) as f64 });
        assert_eq!(determinant4(&zero_col), 0.0);
    }

    #[test]
    fn determinant_matches_nalgebra() {
        let a = spd();
        let ours = determinant4(&a);
        let reference = a.determinant();
        assert!((ours - reference).abs() < 1e-10 * reference.abs());
    }

    #[test]
    fn determinant_flips_sign_on_row_swap() {
        let a = spd();
        let mut swapped = a;
        swapped.swap_rows(1, 2);
        let d = determinant4(&a);
        let ds = determinant4(&swapped);
        assert!((d + ds).abs() < 1e-10 * d.abs());
    }
}
