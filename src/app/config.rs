//! Environment defaults and run configuration.
//!
//! Precedence for every option: CLI flag, then environment (a `.env` file is
//! loaded if present), then the built-in default.

use std::path::PathBuf;

use crate::cli::{FitArgs, ReadingArgs};
use crate::domain::{FitOptions, ReadingSource, RunConfig};
use crate::error::AppError;
use crate::io::parse_adc_list;

pub const ENV_CALIBRATION: &str = "LCAL_CALIBRATION";
pub const ENV_RIDGE: &str = "LCAL_RIDGE";
pub const ENV_DEBUG_DIR: &str = "LCAL_DEBUG_DIR";

const DEFAULT_CALIBRATION: &str = "calibration.json";
const DEFAULT_DEBUG_DIR: &str = "debug";

/// Defaults supplied by the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvDefaults {
    pub calibration_path: PathBuf,
    pub ridge: f64,
    pub debug_dir: PathBuf,
}

impl EnvDefaults {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build defaults from an arbitrary key lookup (lets tests avoid the process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let ridge = match lookup(ENV_RIDGE) {
            Some(raw) => {
                let value = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| AppError::new(2, format!("Invalid {ENV_RIDGE} value {raw:?}: {e}")))?;
                validate_ridge(value)?
            }
            None => 0.0,
        };

        Ok(Self {
            calibration_path: lookup(ENV_CALIBRATION)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CALIBRATION)),
            ridge,
            debug_dir: lookup(ENV_DEBUG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEBUG_DIR)),
        })
    }
}

/// Ridge must be a finite, non-negative number.
pub fn validate_ridge(ridge: f64) -> Result<f64, AppError> {
    if ridge.is_finite() && ridge >= 0.0 {
        Ok(ridge)
    } else {
        Err(AppError::new(2, format!("Ridge must be finite and >= 0, got {ridge}.")))
    }
}

pub fn fit_config_from_args(args: &FitArgs, env: &EnvDefaults) -> Result<RunConfig, AppError> {
    let ridge = validate_ridge(args.ridge.unwrap_or(env.ridge))?;
    Ok(RunConfig {
        calibration_path: args.cal.clone().unwrap_or_else(|| env.calibration_path.clone()),
        options: FitOptions::with_ridge(ridge),
        reading: reading_source(&args.reading)?,
        export_result: args.export.clone(),
        show_system: args.show_system,
        debug_dir: args.debug.then(|| env.debug_dir.clone()),
    })
}

pub fn reading_source(args: &ReadingArgs) -> Result<Option<ReadingSource>, AppError> {
    match (&args.adc, &args.adc_file) {
        (Some(_), Some(_)) => Err(AppError::new(2, "--adc and --adc-file are mutually exclusive.")),
        (Some(text), None) => Ok(Some(ReadingSource::Inline(parse_adc_list(text)?))),
        (None, Some(path)) => Ok(Some(ReadingSource::File(path.clone()))),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    fn fit_args() -> FitArgs {
        FitArgs {
            cal: None,
            ridge: None,
            reading: ReadingArgs {
                adc: None,
                adc_file: None,
            },
            export: None,
            show_system: false,
            debug: false,
        }
    }

    #[test]
    fn defaults_without_environment() {
        let env = EnvDefaults::from_lookup(lookup(&[])).unwrap();
        assert_eq!(env.calibration_path, PathBuf::from("calibration.json"));
        assert_eq!(env.ridge, 0.0);
        assert_eq!(env.debug_dir, PathBuf::from("debug"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = EnvDefaults::from_lookup(lookup(&[
            (ENV_CALIBRATION, "/data/scale.json"),
            (ENV_RIDGE, " 0.01 "),
        ]))
        .unwrap();
        assert_eq!(env.calibration_path, PathBuf::from("/data/scale.json"));
        assert_eq!(env.ridge, 0.01);
    }

    #[test]
    fn bad_environment_ridge_is_rejected() {
        assert!(EnvDefaults::from_lookup(lookup(&[(ENV_RIDGE, "abc")])).is_err());
        assert!(EnvDefaults::from_lookup(lookup(&[(ENV_RIDGE, "-1")])).is_err());
    }

    #[test]
    fn cli_flags_override_environment() {
        let env = EnvDefaults::from_lookup(lookup(&[(ENV_RIDGE, "0.5")])).unwrap();
        let mut args = fit_args();
        assert_eq!(fit_config_from_args(&args, &env).unwrap().options.ridge, 0.5);

        args.ridge = Some(0.0);
        args.cal = Some(PathBuf::from("other.json"));
        let config = fit_config_from_args(&args, &env).unwrap();
        assert_eq!(config.options.ridge, 0.0);
        assert_eq!(config.calibration_path, PathBuf::from("other.json"));
        assert!(config.debug_dir.is_none());
    }

    #[test]
    fn negative_or_nan_ridge_is_rejected() {
        let env = EnvDefaults::from_lookup(lookup(&[])).unwrap();
        for bad in [-0.1, f64::NAN, f64::INFINITY] {
            let mut args = fit_args();
            args.ridge = Some(bad);
            assert_eq!(fit_config_from_args(&args, &env).unwrap_err().exit_code(), 2);
        }
    }

    #[test]
    fn inline_reading_is_parsed_up_front() {
        let args = ReadingArgs {
            adc: Some("1,2,3,4".to_string()),
            adc_file: None,
        };
        assert_eq!(
            reading_source(&args).unwrap(),
            Some(ReadingSource::Inline([1.0, 2.0, 3.0, 4.0]))
        );
    }
}
