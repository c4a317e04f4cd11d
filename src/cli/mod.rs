//! Command-line parsing for the load-cell calibration tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! numeric code. Options that can also come from the environment are
//! `Option`s here; defaults are resolved in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lcal", version, about = "Load-cell array calibration and weighing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit scale factors from a calibration file, print diagnostics, and optionally weigh/export.
    Fit(FitArgs),
    /// Estimate a weight from previously exported factors.
    Weigh(WeighArgs),
    /// Fit several calibration files in parallel and print one line per file.
    Batch(BatchArgs),
    /// Write a synthetic calibration file for known factors.
    Simulate(SimulateArgs),
}

/// A raw reading, inline or from a file.
#[derive(Debug, Args, Clone)]
pub struct ReadingArgs {
    /// Comma-separated 4 ADC values to compute weight, e.g. 1020,1018,1005,1009.
    #[arg(long, value_name = "V0,V1,V2,V3", conflicts_with = "adc_file")]
    pub adc: Option<String>,

    /// JSON file containing {"adc": [v0,v1,v2,v3]} to compute weight.
    #[arg(long = "adc-file", value_name = "JSON")]
    pub adc_file: Option<PathBuf>,
}

/// Options for `lcal fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// Calibration JSON (default: $LCAL_CALIBRATION or calibration.json).
    #[arg(long, value_name = "JSON")]
    pub cal: Option<PathBuf>,

    /// Ridge (Tikhonov) term added to the normal-matrix diagonal (default: $LCAL_RIDGE or 0).
    #[arg(long)]
    pub ridge: Option<f64>,

    #[command(flatten)]
    pub reading: ReadingArgs,

    /// Export the calibration result to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Print the normal matrix A and right-hand side b.
    #[arg(long)]
    pub show_system: bool,

    /// Write a markdown debug bundle ($LCAL_DEBUG_DIR or ./debug).
    #[arg(long)]
    pub debug: bool,
}

/// Options for `lcal weigh`.
#[derive(Debug, Args, Clone)]
pub struct WeighArgs {
    /// Calibration JSON providing the zero reference (default: $LCAL_CALIBRATION or calibration.json).
    #[arg(long, value_name = "JSON")]
    pub cal: Option<PathBuf>,

    /// Result JSON produced by `lcal fit --export`.
    #[arg(long, value_name = "JSON")]
    pub result: PathBuf,

    #[command(flatten)]
    pub reading: ReadingArgs,
}

/// Options for `lcal batch`.
#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Calibration JSON files.
    #[arg(required = true, value_name = "JSON")]
    pub cals: Vec<PathBuf>,

    /// Ridge term applied to every file (default: $LCAL_RIDGE or 0).
    #[arg(long)]
    pub ridge: Option<f64>,
}

/// Options for `lcal simulate`.
#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    /// True scale factors f0..f3.
    #[arg(long, value_name = "F0,F1,F2,F3", default_value = "1,1,1,1")]
    pub factors: String,

    /// Known calibration weight placed at each position.
    #[arg(long, default_value_t = 100.0)]
    pub weight: f64,

    /// Zero reference (ADC counts with nothing on the platform).
    #[arg(long, value_name = "Z0,Z1,Z2,Z3", default_value = "0,0,0,0")]
    pub zero: String,

    /// Standard deviation of Gaussian noise added to every reading (ADC counts).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output calibration JSON.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_flags_parse() {
        let cli = Cli::parse_from([
            "lcal", "fit", "--cal", "c.json", "--ridge", "0.5", "--adc", "1,2,3,4", "--show-system",
        ]);
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.cal, Some(PathBuf::from("c.json")));
        assert_eq!(args.ridge, Some(0.5));
        assert_eq!(args.reading.adc.as_deref(), Some("1,2,3,4"));
        assert!(args.show_system);
        assert!(!args.debug);
    }

    #[test]
    fn adc_and_adc_file_conflict() {
        let res = Cli::try_parse_from(["lcal", "fit", "--adc", "1,2,3,4", "--adc-file", "r.json"]);
        assert!(res.is_err());
    }

    #[test]
    fn batch_needs_files() {
        assert!(Cli::try_parse_from(["lcal", "batch"]).is_err());
        let cli = Cli::try_parse_from(["lcal", "batch", "a.json", "b.json"]).unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.cals.len(), 2);
    }
}
