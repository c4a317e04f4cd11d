//! Debug bundle writer for inspecting a calibration run.
//!
//! Writes one markdown file per run with everything needed to reproduce or
//! question a fit: inputs, zero-referenced rows, normal equations, factors,
//! per-row residuals and diagnostics.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{CalibrationDataset, CalibrationFit, Diagnostics, FitOptions, Placement, RowResidual};
use crate::error::AppError;
use crate::report::format::fmt_channels;

pub fn write_debug_bundle(
    dir: &Path,
    dataset: &CalibrationDataset,
    options: &FitOptions,
    fit: &CalibrationFit,
    diagnostics: &Diagnostics,
    rows: &[RowResidual],
) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(2, format!("Failed to create debug dir: {e}")))?;

    let now = Local::now();
    let path = dir.join(format!("lcal_debug_{}.md", now.format("%Y%m%d_%H%M%S")));

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(2, format!("Failed to create debug file: {e}")))?;
    render(&mut file, &now.to_rfc3339(), dataset, options, fit, diagnostics, rows)
        .map_err(|e| AppError::new(2, format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

fn render(
    out: &mut impl Write,
    generated: &str,
    dataset: &CalibrationDataset,
    options: &FitOptions,
    fit: &CalibrationFit,
    diagnostics: &Diagnostics,
    rows: &[RowResidual],
) -> std::io::Result<()> {
    writeln!(out, "# lcal debug bundle")?;
    writeln!(out, "- generated: {generated}")?;
    writeln!(out, "- calibration_weight: {}", dataset.calibration_weight)?;
    writeln!(out, "- ridge: {}", options.ridge)?;
    writeln!(out, "- zero: {}", fmt_channels(&dataset.zero))?;

    writeln!(out, "\n## Measurements")?;
    writeln!(out, "| row | raw | delta |")?;
    writeln!(out, "| - | - | - |")?;
    for placement in Placement::ALL {
        writeln!(
            out,
            "| {} | {} | {} |",
            placement.display_name(),
            fmt_channels(&dataset.measurement(placement)),
            fmt_channels(&dataset.delta(placement))
        )?;
    }

    writeln!(out, "\n## Normal equations")?;
    writeln!(out, "| A[i][0] | A[i][1] | A[i][2] | A[i][3] | b[i] |")?;
    writeln!(out, "| - | - | - | - | - |")?;
    for i in 0..4 {
        let a = &fit.system.a;
        writeln!(
            out,
            "| {:.6} | {:.6} | {:.6} | {:.6} | {:.6} |",
            a[(i, 0)],
            a[(i, 1)],
            a[(i, 2)],
            a[(i, 3)],
            fit.system.b[i]
        )?;
    }

    writeln!(out, "\n## Factors")?;
    for (i, f) in fit.factors.iter().enumerate() {
        writeln!(out, "- f{i} = {f:.12}")?;
    }

    writeln!(out, "\n## Residuals")?;
    writeln!(out, "| row | estimated | residual |")?;
    writeln!(out, "| - | - | - |")?;
    for r in rows {
        writeln!(out, "| {} | {:.6} | {:.6e} |", r.placement.display_name(), r.estimated, r.residual)?;
    }

    writeln!(out, "\n## Diagnostics")?;
    writeln!(out, "- rss: {:.6e}", diagnostics.rss)?;
    writeln!(out, "- residual_variance: {:.6e}", diagnostics.residual_variance)?;
    writeln!(out, "- det_A: {:.6e}", diagnostics.det_a)?;
    writeln!(out, "- error_det: {:.6e}", diagnostics.error_det)?;
    writeln!(out, "- calibration_ok: {}", diagnostics.ok)?;

    Ok(())
}
