//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves environment defaults
//! - loads calibration data and runs the fit
//! - prints reports and weight estimates
//! - writes optional exports and debug bundles

use clap::Parser;
use tracing::warn;

use crate::cli::{BatchArgs, Command, FitArgs, SimulateArgs, WeighArgs};
use crate::data::{generate_dataset, SyntheticSpec};
use crate::error::AppError;
use crate::io::{load_reading, parse_channel_list, read_calibration_json, read_result_json};
use crate::models::estimate_weight;

pub mod config;
pub mod pipeline;

pub use config::{fit_config_from_args, EnvDefaults};

/// Entry point for the `lcal` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    let env = EnvDefaults::from_env()?;

    match cli.command {
        Command::Fit(args) => handle_fit(args, &env),
        Command::Weigh(args) => handle_weigh(args, &env),
        Command::Batch(args) => handle_batch(args, &env),
        Command::Simulate(args) => handle_simulate(args),
    }
}

fn handle_fit(args: FitArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let config = fit_config_from_args(&args, env)?;
    let run = pipeline::run_calibration(&config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.dataset, &run.fit, &run.diagnostics, &run.rows, &config.options)
    );
    if config.show_system {
        println!("{}", crate::report::format_normal_system(&run.fit.system));
    }

    if let Some(source) = &config.reading {
        let reading = load_reading(source)?;
        let weight = estimate_weight(&reading, &run.dataset.zero, &run.fit.factors);
        println!("{}", crate::report::format_weight(&reading, weight));
    }

    if let Some(path) = &config.export_result {
        crate::io::write_result_json(path, &run.result())?;
        println!("Wrote result: {}", path.display());
    }
    if let Some(dir) = &config.debug_dir {
        let path = crate::debug::write_debug_bundle(
            dir,
            &run.dataset,
            &config.options,
            &run.fit,
            &run.diagnostics,
            &run.rows,
        )?;
        println!("Wrote debug bundle: {}", path.display());
    }

    Ok(())
}

fn handle_weigh(args: WeighArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let source = config::reading_source(&args.reading)?
        .ok_or_else(|| AppError::new(2, "weigh needs a reading: pass --adc or --adc-file."))?;
    let cal_path = args.cal.unwrap_or_else(|| env.calibration_path.clone());

    let dataset = read_calibration_json(&cal_path)?;
    let result = read_result_json(&args.result)?;
    if !result.calibration_ok {
        warn!(
            residual_variance = result.residual_variance,
            "factors come from a calibration that did not converge"
        );
    }

    let reading = load_reading(&source)?;
    let weight = estimate_weight(&reading, &dataset.zero, &result.factors);
    println!("{}", crate::report::format_weight(&reading, weight));
    Ok(())
}

fn handle_batch(args: BatchArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let ridge = config::validate_ridge(args.ridge.unwrap_or(env.ridge))?;
    let options = crate::domain::FitOptions::with_ridge(ridge);

    let entries = pipeline::run_batch(&args.cals, &options);
    for entry in &entries {
        println!("{}", crate::report::format_batch_line(&entry.path, &entry.outcome));
    }

    let failed = entries.iter().filter(|e| e.outcome.is_err()).count();
    if failed > 0 {
        return Err(AppError::new(
            4,
            format!("{failed} of {} calibrations failed.", entries.len()),
        ));
    }
    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let spec = SyntheticSpec {
        factors: parse_channel_list("--factors", &args.factors)?,
        calibration_weight: args.weight,
        zero: parse_channel_list("--zero", &args.zero)?,
        noise_sigma: args.noise,
        seed: args.seed,
    };
    let dataset = generate_dataset(&spec)?;
    crate::io::write_calibration_json(&args.out, &dataset)?;
    println!("Wrote synthetic calibration: {}", args.out.display());
    Ok(())
}
