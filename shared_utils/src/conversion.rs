//! Conversion Utilities Module
//!
//! Format-agnostic pieces of a single conversion:
//! - ConversionResult: outcome of one file
//! - Output path derivation
//! - Staleness check (mtime based)
//! - Size reduction math and message formatting

use crate::batch::ImageFile;
use filetime::FileTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    Converted,
    SkippedExisting,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub status: ConversionStatus,
    pub input_size: u64,
    pub output_size: Option<u64>,
    pub size_reduction: Option<f64>,
    pub error: Option<String>,
}

impl ConversionResult {
    pub fn converted(input: &Path, output: &Path, input_size: u64, output_size: u64) -> Self {
        Self {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            status: ConversionStatus::Converted,
            input_size,
            output_size: Some(output_size),
            size_reduction: Some(calculate_size_reduction(input_size, output_size)),
            error: None,
        }
    }

    pub fn skipped_existing(input: &ImageFile, output: &Path) -> Self {
        Self {
            input_path: input.path.clone(),
            output_path: output.to_path_buf(),
            status: ConversionStatus::SkippedExisting,
            input_size: input.size,
            output_size: fs::metadata(output).map(|m| m.len()).ok(),
            size_reduction: None,
            error: None,
        }
    }

    pub fn failed(input: &Path, output: &Path, error: impl std::fmt::Display) -> Self {
        Self {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            status: ConversionStatus::Failed,
            input_size: fs::metadata(input).map(|m| m.len()).unwrap_or(0),
            output_size: None,
            size_reduction: None,
            error: Some(error.to_string()),
        }
    }
}

/// Sibling path with the extension swapped for `extension`.
///
/// `photo.JPEG` → `photo.webp`; the target extension is used verbatim, so
/// callers pass the canonical lower-case form.
pub fn determine_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// Percentage saved: `(input - output) / input * 100`. Negative when the
/// output grew, 0.0 for an empty input.
pub fn calculate_size_reduction(input_size: u64, output_size: u64) -> f64 {
    if input_size == 0 {
        return 0.0;
    }
    (input_size as f64 - output_size as f64) / input_size as f64 * 100.0
}

pub fn format_size_change(input_size: u64, output_size: u64) -> String {
    let reduction_pct = calculate_size_reduction(input_size, output_size);

    if reduction_pct >= 0.0 {
        format!("{:.1}% smaller", reduction_pct)
    } else {
        format!("{:.1}% larger", -reduction_pct)
    }
}

/// Whether `source` needs (re)encoding into `destination`.
///
/// Only a destination strictly newer than its source counts as up to date;
/// an equal or older one is treated as stale and overwritten. The source
/// mtime comes from the scan, so the source is not stat'ed again.
pub fn should_convert(source: &ImageFile, destination: &Path) -> bool {
    match fs::metadata(destination) {
        Ok(m) => FileTime::from_last_modification_time(&m) <= source.modified,
        Err(_) => true,
    }
}
