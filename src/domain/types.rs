//! Shared domain types.
//!
//! Everything here is a small value type. Raw sensor vectors stay as plain
//! `[f64; 4]` so they serialize directly; the normal system uses nalgebra's
//! fixed-size (stack allocated) matrices.

use std::path::PathBuf;

use nalgebra::{Matrix4, Vector4};
use serde::{Deserialize, Serialize};

/// Number of load-cell channels (and fitted parameters).
pub const CHANNELS: usize = 4;

/// Number of calibration placements (measurement rows).
pub const PLACEMENTS: usize = 5;

/// Residual variance below which a calibration is reported as converged.
pub const CONVERGENCE_THRESHOLD: f64 = 1e-6;

/// One raw 4-channel ADC vector.
pub type Channels = [f64; CHANNELS];

/// Where the known calibration weight was placed for a measurement row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Cell0,
    Cell1,
    Cell2,
    Cell3,
    Center,
}

impl Placement {
    /// Row order of the design matrix.
    pub const ALL: [Placement; PLACEMENTS] = [
        Placement::Cell0,
        Placement::Cell1,
        Placement::Cell2,
        Placement::Cell3,
        Placement::Center,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Placement::Cell0 => "cell-0",
            Placement::Cell1 => "cell-1",
            Placement::Cell2 => "cell-2",
            Placement::Cell3 => "cell-3",
            Placement::Center => "center",
        }
    }
}

/// Calibration measurements as recorded by the operator.
///
/// The same known weight is placed at each of the five positions in turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationDataset {
    pub calibration_weight: f64,
    pub zero: Channels,
    pub on_cell_0: Channels,
    pub on_cell_1: Channels,
    pub on_cell_2: Channels,
    pub on_cell_3: Channels,
    pub on_center: Channels,
}

impl CalibrationDataset {
    /// Raw reading recorded for one placement.
    pub fn measurement(&self, placement: Placement) -> Channels {
        match placement {
            Placement::Cell0 => self.on_cell_0,
            Placement::Cell1 => self.on_cell_1,
            Placement::Cell2 => self.on_cell_2,
            Placement::Cell3 => self.on_cell_3,
            Placement::Center => self.on_center,
        }
    }

    /// All five measurement rows in design-matrix order.
    pub fn measurements(&self) -> [Channels; PLACEMENTS] {
        Placement::ALL.map(|p| self.measurement(p))
    }

    /// Zero-referenced row for one placement.
    pub fn delta(&self, placement: Placement) -> Channels {
        let raw = self.measurement(placement);
        std::array::from_fn(|j| raw[j] - self.zero[j])
    }
}

/// Named options for a calibration fit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitOptions {
    /// Tikhonov term added to each diagonal entry of the normal matrix.
    /// `0.0` disables regularization.
    pub ridge: f64,
}

impl FitOptions {
    pub fn with_ridge(ridge: f64) -> Self {
        Self { ridge }
    }
}

/// Least-squares normal equations `A f = b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalSystem {
    /// `XᵗX`, plus the ridge term on the diagonal when one was requested.
    pub a: Matrix4<f64>,
    /// `Xᵗy`; never regularized.
    pub b: Vector4<f64>,
}

/// Fitted weight-per-ADC-count scale, one per channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleFactors([f64; CHANNELS]);

impl ScaleFactors {
    pub fn new(values: [f64; CHANNELS]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; CHANNELS] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vector4<f64>> for ScaleFactors {
    fn from(v: Vector4<f64>) -> Self {
        Self([v[0], v[1], v[2], v[3]])
    }
}

/// Output of one calibration: factors plus the system they were solved from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationFit {
    pub factors: ScaleFactors,
    pub system: NormalSystem,
}

/// Fit-quality figures computed against the calibration rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub rss: f64,
    pub residual_variance: f64,
    pub det_a: f64,
    pub error_det: f64,
    pub ok: bool,
}

/// Residual of one calibration row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowResidual {
    pub placement: Placement,
    pub estimated: f64,
    pub residual: f64,
}

/// Persisted calibration result (JSON).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub factors: ScaleFactors,
    pub residual_variance: f64,
    pub rss: f64,
    #[serde(rename = "det_A")]
    pub det_a: f64,
    pub error_det: f64,
    pub calibration_weight: f64,
    pub calibration_ok: bool,
}

impl CalibrationResult {
    pub fn new(dataset: &CalibrationDataset, fit: &CalibrationFit, diagnostics: &Diagnostics) -> Self {
        Self {
            factors: fit.factors,
            residual_variance: diagnostics.residual_variance,
            rss: diagnostics.rss,
            det_a: diagnostics.det_a,
            error_det: diagnostics.error_det,
            calibration_weight: dataset.calibration_weight,
            calibration_ok: diagnostics.ok,
        }
    }
}

/// Where a raw reading for weight estimation comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingSource {
    Inline(Channels),
    File(PathBuf),
}

/// A `fit` run's configuration as understood by the pipeline.
///
/// Derived from CLI flags, then environment, then defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub calibration_path: PathBuf,
    pub options: FitOptions,
    pub reading: Option<ReadingSource>,
    pub export_result: Option<PathBuf>,
    /// Print the normal matrix and RHS alongside the report.
    pub show_system: bool,
    /// Write a markdown debug bundle into this directory.
    pub debug_dir: Option<PathBuf>,
}
