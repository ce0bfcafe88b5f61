//! Shared Utilities for webp_boost tools
//!
//! Format-agnostic plumbing for batch image conversion:
//! - File discovery and batch counters
//! - Staleness check and per-file results
//! - Console / JSON reporting
//! - Safety checks (protected directory detection)
//! - Error types and logging setup

pub mod batch;
pub mod common_utils;
pub mod conversion;
pub mod img_errors;
pub mod logging;
pub mod report;
pub mod safety;

pub use batch::{discover, BatchResult, ImageFile, ScanEntry, IMAGE_EXTENSIONS};
pub use conversion::{
    calculate_size_reduction, determine_output_path, format_size_change, should_convert,
    ConversionResult, ConversionStatus,
};
pub use img_errors::{ConvertError, ErrorCategory, ScanError};
pub use report::{
    format_bytes, format_directory_missing, format_no_images, format_result_line,
    print_result_line, print_simple_summary, JsonReport,
};
pub use safety::check_dangerous_directory;
