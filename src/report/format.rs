//! Formatted terminal output.
//!
//! We keep formatting code in one place so the numeric code stays free of
//! presentation concerns.

use std::path::Path;

use crate::domain::{
    CalibrationDataset, CalibrationFit, Channels, Diagnostics, FitOptions, NormalSystem, RowResidual,
};

/// Full calibration report: inputs, factors, diagnostics and per-row residuals.
pub fn format_fit_summary(
    dataset: &CalibrationDataset,
    fit: &CalibrationFit,
    diagnostics: &Diagnostics,
    rows: &[RowResidual],
    options: &FitOptions,
) -> String {
    let mut out = String::new();

    out.push_str("=== lcal - load-cell calibration ===\n");
    out.push_str(&format!("Calibration weight W = {}\n", dataset.calibration_weight));
    out.push_str(&format!("Zero reference (adc): {}\n", fmt_channels(&dataset.zero)));
    if options.ridge != 0.0 {
        out.push_str(&format!("Ridge: {}\n", options.ridge));
    }

    out.push_str("\nComputed factors f0..f3 (weight per ADC count):\n");
    for (i, f) in fit.factors.iter().enumerate() {
        out.push_str(&format!("  f{i} = {f:.10}\n"));
    }

    out.push_str("\nDiagnostics:\n");
    out.push_str(&format!("  RSS               = {:.6e}\n", diagnostics.rss));
    out.push_str(&format!("  residual variance = {:.6e}\n", diagnostics.residual_variance));
    out.push_str(&format!("  det(A)            = {:.6e}\n", diagnostics.det_a));
    out.push_str(&format!("  error det         = {:.6e}\n", diagnostics.error_det));
    out.push_str(&format!(
        "  calibration ok    = {}\n",
        if diagnostics.ok { "yes" } else { "no" }
    ));

    out.push_str("\nResiduals:\n");
    out.push_str(&format!("  {:<8} {:>14} {:>14}\n", "row", "estimated", "residual"));
    for r in rows {
        out.push_str(&format!(
            "  {:<8} {:>14.6} {:>14.6}\n",
            r.placement.display_name(),
            r.estimated,
            r.residual
        ));
    }

    out
}

/// Dump of the normal matrix and right-hand side.
pub fn format_normal_system(system: &NormalSystem) -> String {
    let mut out = String::new();
    out.push_str("Normal matrix A:\n");
    for i in 0..4 {
        let row: Vec<String> = (0..4).map(|j| format!("{:>16.6}", system.a[(i, j)])).collect();
        out.push_str(&format!("  [{}]\n", row.join(" ")));
    }
    out.push_str("Right-hand side b:\n");
    let b: Vec<String> = system.b.iter().map(|v| format!("{v:.6}")).collect();
    out.push_str(&format!("  [{}]\n", b.join(", ")));
    out
}

/// Estimated weight for one reading.
pub fn format_weight(reading: &Channels, weight: f64) -> String {
    format!(
        "Input ADC: {}\nEstimated weight = {weight:.6} (same units as calibration weight)",
        fmt_channels(reading)
    )
}

/// One line of `lcal batch` output.
pub fn format_batch_line<E: std::fmt::Display>(
    path: &Path,
    outcome: &Result<(CalibrationFit, Diagnostics), E>,
) -> String {
    match outcome {
        Ok((fit, diag)) => format!(
            "{:<32} {:<4} rss={:.3e} det={:.3e} factors={}",
            path.display(),
            if diag.ok { "ok" } else { "warn" },
            diag.rss,
            diag.det_a,
            fmt_channels(fit.factors.as_array()),
        ),
        Err(err) => format!("{:<32} FAIL {err}", path.display()),
    }
}

pub(crate) fn fmt_channels(values: &Channels) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
    format!("[{}]", parts.join(", "))
}
