//! Weight estimation from a raw reading.
//!
//! `weight = Σ f_i · (reading_i - zero_i)`
//!
//! This is a total function: negative or physically meaningless results are
//! returned as-is and left for the caller to judge.

use crate::domain::{CalibrationDataset, Channels, ScaleFactors};

/// Estimate the weight on the platform for one raw reading.
pub fn estimate_weight(reading: &Channels, zero: &Channels, factors: &ScaleFactors) -> f64 {
    factors
        .iter()
        .zip(reading.iter().zip(zero.iter()))
        .map(|(f, (r, z))| f * (r - z))
        .sum()
}

/// A zero reference and a set of factors, borrowed for repeated estimates.
#[derive(Debug, Clone, Copy)]
pub struct WeightEstimator<'a> {
    zero: Channels,
    factors: &'a ScaleFactors,
}

impl<'a> WeightEstimator<'a> {
    pub fn new(zero: Channels, factors: &'a ScaleFactors) -> Self {
        Self { zero, factors }
    }

    /// Use the zero reference recorded with a calibration dataset.
    pub fn for_dataset(dataset: &CalibrationDataset, factors: &'a ScaleFactors) -> Self {
        Self::new(dataset.zero, factors)
    }

    pub fn estimate(&self, reading: &Channels) -> f64 {
        estimate_weight(reading, &self.zero, self.factors)
    }
}
