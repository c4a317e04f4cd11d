//! Raw reading input: an inline `a,b,c,d` list or a `{"adc": [...]}` file.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{Channels, ReadingSource, CHANNELS};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct ReadingFile {
    adc: Channels,
}

/// Parse `"1020,1018,1005,1009"` into four channels.
pub fn parse_adc_list(text: &str) -> Result<Channels, AppError> {
    parse_channel_list("--adc", text)
}

/// Parse a comma-separated 4-channel list given for command-line option `flag`.
pub fn parse_channel_list(flag: &str, text: &str) -> Result<Channels, AppError> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != CHANNELS {
        return Err(AppError::new(
            2,
            format!("{flag} must have {CHANNELS} comma-separated values, got {}", parts.len()),
        ));
    }

    let mut out = [0.0; CHANNELS];
    for (slot, part) in out.iter_mut().zip(&parts) {
        let part = part.trim();
        *slot = part
            .parse::<f64>()
            .map_err(|e| AppError::new(2, format!("Error parsing {flag} value {part:?}: {e}")))?;
    }
    Ok(out)
}

/// Read a reading file with schema `{"adc": [v0, v1, v2, v3]}`.
pub fn read_adc_json(path: &Path) -> Result<Channels, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to read adc file '{}': {e}", path.display())))?;
    let parsed: ReadingFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid adc file '{}': {e}", path.display())))?;
    Ok(parsed.adc)
}

/// Resolve a reading from wherever it was supplied.
pub fn load_reading(source: &ReadingSource) -> Result<Channels, AppError> {
    match source {
        ReadingSource::Inline(values) => Ok(*values),
        ReadingSource::File(path) => read_adc_json(path),
    }
}
