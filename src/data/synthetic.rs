//! Synthetic calibration datasets.
//!
//! Useful for trying the tool without a physical scale, and for tests.
//!
//! Load model: with the known weight `W` on placement `p`, channel `j` carries
//! a share `s_pj` of the load (shares of one placement sum to 1). A channel
//! with scale factor `f_j` then reads `s_pj · W / f_j` counts above zero, so
//! the noise-free dataset is an exact fit for the chosen factors.
//!
//! - cell placement `i`: share 0.85 on channel `i`, 0.05 on each other channel
//! - center placement: share 0.25 on every channel

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{CalibrationDataset, Channels, Placement, CHANNELS};
use crate::error::AppError;

const OWN_SHARE: f64 = 0.85;
const CROSS_SHARE: f64 = 0.05;
const CENTER_SHARE: f64 = 0.25;

/// Parameters of a synthetic calibration session.
#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub factors: [f64; CHANNELS],
    pub calibration_weight: f64,
    pub zero: Channels,
    /// Standard deviation of additive Gaussian noise, in ADC counts.
    pub noise_sigma: f64,
    pub seed: u64,
}

/// Generate a calibration dataset following the load model above.
pub fn generate_dataset(spec: &SyntheticSpec) -> Result<CalibrationDataset, AppError> {
    if spec.factors.iter().any(|f| !f.is_finite() || *f == 0.0) {
        return Err(AppError::new(2, "Synthetic factors must be finite and non-zero."));
    }
    if !spec.calibration_weight.is_finite() {
        return Err(AppError::new(2, "Synthetic calibration weight must be finite."));
    }
    if !(spec.noise_sigma.is_finite() && spec.noise_sigma >= 0.0) {
        return Err(AppError::new(2, "Noise sigma must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, spec.noise_sigma)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut reading = |placement: Placement| -> Channels {
        std::array::from_fn(|j| {
            let counts = load_share(placement, j) * spec.calibration_weight / spec.factors[j];
            let noise = if spec.noise_sigma > 0.0 { normal.sample(&mut rng) } else { 0.0 };
            spec.zero[j] + counts + noise
        })
    };

    Ok(CalibrationDataset {
        calibration_weight: spec.calibration_weight,
        zero: spec.zero,
        on_cell_0: reading(Placement::Cell0),
        on_cell_1: reading(Placement::Cell1),
        on_cell_2: reading(Placement::Cell2),
        on_cell_3: reading(Placement::Cell3),
        on_center: reading(Placement::Center),
    })
}

/// Share of the load carried by `channel` for a placement.
fn load_share(placement: Placement, channel: usize) -> f64 {
    let own = match placement {
        Placement::Cell0 => 0,
        Placement::Cell1 => 1,
        Placement::Cell2 => 2,
        Placement::Cell3 => 3,
        Placement::Center => return CENTER_SHARE,
    };
    if channel == own { OWN_SHARE } else { CROSS_SHARE }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitOptions;
    use crate::fit::fit_calibration;

    fn spec(noise_sigma: f64) -> SyntheticSpec {
        SyntheticSpec {
            factors: [0.05, 0.04, 0.06, 0.045],
            calibration_weight: 2000.0,
            zero: [1020.0, 1018.0, 1005.0, 1009.0],
            noise_sigma,
            seed: 42,
        }
    }

    #[test]
    fn shares_of_each_placement_sum_to_one() {
        for placement in Placement::ALL {
            let total: f64 = (0..CHANNELS).map(|j| load_share(placement, j)).sum();
            assert!((total - 1.0).abs() < 1e-12, "{placement:?} sums to {total}");
        }
    }

    #[test]
    fn noise_free_dataset_recovers_factors() {
        let spec = spec(0.0);
        let cal = generate_dataset(&spec).unwrap();
        let fit = fit_calibration(&cal, &FitOptions::default()).unwrap();
        for (got, want) in fit.factors.iter().zip(spec.factors) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = generate_dataset(&spec(3.0)).unwrap();
        let b = generate_dataset(&spec(3.0)).unwrap();
        assert_eq!(a, b);

        let mut other = spec(3.0);
        other.seed = 7;
        assert_ne!(a, generate_dataset(&other).unwrap());
    }

    #[test]
    fn zero_factor_is_rejected() {
        let mut bad = spec(0.0);
        bad.factors[2] = 0.0;
        assert_eq!(generate_dataset(&bad).unwrap_err().exit_code(), 2);
    }
}
