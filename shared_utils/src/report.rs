//! Report Module
//!
//! Human-readable per-file status lines and the end-of-run summary, plus the
//! JSON rendering used by `--output json`.

use crate::batch::BatchResult;
use crate::common_utils::display_name;
use crate::conversion::{format_size_change, ConversionResult, ConversionStatus};
use console::style;
use serde::Serialize;
use std::path::Path;

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// One status line for a processed file, without styling.
///
/// ```
/// use std::path::Path;
/// use shared_utils::conversion::ConversionResult;
/// use shared_utils::report::format_result_line;
///
/// let r = ConversionResult::converted(Path::new("assets/a.png"), Path::new("assets/a.webp"), 1000, 250);
/// assert_eq!(format_result_line(&r, false), "✓ a.png → a.webp (75.0% smaller)");
/// ```
pub fn format_result_line(result: &ConversionResult, verbose: bool) -> String {
    match result.status {
        ConversionStatus::Converted => {
            let output_size = result.output_size.unwrap_or(0);
            let mut line = format!(
                "✓ {} → {} ({})",
                display_name(&result.input_path),
                display_name(&result.output_path),
                format_size_change(result.input_size, output_size)
            );
            if verbose {
                line.push_str(&format!(
                    " [{} → {}]",
                    format_bytes(result.input_size),
                    format_bytes(output_size)
                ));
            }
            line
        }
        ConversionStatus::SkippedExisting => format!(
            "⊘ {} (WebP already exists and is newer)",
            display_name(&result.input_path)
        ),
        ConversionStatus::Failed => format!(
            "✗ Error converting {}: {}",
            result.input_path.display(),
            result.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

pub fn print_result_line(result: &ConversionResult, verbose: bool) {
    let line = format_result_line(result, verbose);
    match result.status {
        ConversionStatus::Converted => println!("{}", style(line).green()),
        ConversionStatus::SkippedExisting => println!("{}", style(line).dim()),
        ConversionStatus::Failed => println!("{}", style(line).red()),
    }
}

pub fn format_directory_missing(root: &Path) -> String {
    format!("✗ Directory not found: {}", root.display())
}

pub fn format_no_images(root: &Path) -> String {
    format!("No images found to convert in {}!", root.display())
}

pub fn format_simple_summary(result: &BatchResult) -> String {
    format!(
        "✓ Conversion complete: {} converted, {} skipped",
        result.converted,
        result.skipped_total()
    )
}

pub fn print_simple_summary(result: &BatchResult) {
    println!();
    println!("{}", style(format_simple_summary(result)).bold());

    if result.input_bytes > 0 {
        println!(
            "   {} → {} ({})",
            format_bytes(result.input_bytes),
            format_bytes(result.output_bytes),
            format_size_change(result.input_bytes, result.output_bytes)
        );
    }

    if !result.errors.is_empty() {
        println!();
        println!("{}", style("✗ Errors encountered:").red());
        for (path, error) in &result.errors {
            println!("   {} → {}", path.display(), error);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub results: &'a [ConversionResult],
}

impl<'a> JsonReport<'a> {
    pub fn new(summary: &BatchResult, results: &'a [ConversionResult]) -> Self {
        Self {
            converted: summary.converted,
            skipped: summary.skipped,
            failed: summary.failed,
            input_bytes: summary.input_bytes,
            output_bytes: summary.output_bytes,
            results,
        }
    }
}
