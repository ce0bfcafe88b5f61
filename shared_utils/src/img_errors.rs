//! Shared Image Conversion Error Types
//!
//! `ScanError` aborts a run before any file is touched; `ConvertError` is
//! scoped to one file and never stops the batch.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Recoverable,
    Fatal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Recoverable => write!(f, "RECOVERABLE"),
            ErrorCategory::Fatal => write!(f, "FATAL"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Refusing to scan protected directory: {0}")]
    Protected(String),
}

impl ScanError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Fatal
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("WebP encoding failed: {0}")]
    Encode(String),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Recoverable
    }
}
