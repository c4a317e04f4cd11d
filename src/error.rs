//! Error types.
//!
//! - `CalibrationError` is the only failure the numeric core can produce.
//! - `AppError` is what the binary reports: a message plus a process exit code.

use thiserror::Error;

/// Failure of the linear solve behind a calibration fit.
///
/// Both variants mean the same thing to the operator: the measurement
/// geometry does not span all four channel directions. They are kept apart
/// so the two elimination checks can be told apart in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalibrationError {
    /// Every candidate pivot in `column` was exactly zero.
    #[error("singular matrix (zero pivot in column {column})")]
    ZeroPivot { column: usize },
    /// A zero survived on the diagonal at back-substitution time.
    #[error("singular matrix (zero diagonal at row {row} during back substitution)")]
    ZeroDiagonal { row: usize },
}

impl CalibrationError {
    /// True for every variant; lets callers match on the error kind without
    /// caring where elimination stopped.
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::ZeroPivot { .. } | Self::ZeroDiagonal { .. })
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CalibrationError> for AppError {
    fn from(err: CalibrationError) -> Self {
        AppError::new(
            4,
            format!(
                "Calibration failed: could not solve normal equations: {err}. \
                 Add more varied measurement placements or pass a non-zero --ridge."
            ),
        )
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_error_maps_to_numeric_exit_code() {
        let app: AppError = CalibrationError::ZeroPivot { column: 1 }.into();
        assert_eq!(app.exit_code(), 4);
        assert!(app.to_string().contains("singular matrix"));
        assert!(app.to_string().contains("--ridge"));
    }

    #[test]
    fn both_variants_are_singular() {
        assert!(CalibrationError::ZeroPivot { column: 0 }.is_singular());
        assert!(CalibrationError::ZeroDiagonal { row: 3 }.is_singular());
    }
}
