//! Batch Processing Module
//!
//! File discovery for a conversion run and the running counters that make up
//! its summary.

use crate::common_utils::has_extension;
use crate::img_errors::ScanError;
use filetime::FileTime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Raster formats picked up by a scan. Matching is case-insensitive.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// A candidate input discovered during a scan.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub modified: FileTime,
    pub size: u64,
}

impl ImageFile {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: FileTime::from_last_modification_time(&metadata),
            size: metadata.len(),
        })
    }
}

/// One matching name found by a scan. A name that matches the allow-list but
/// cannot be resolved (dangling symlink, permission denied) is kept so the
/// run can report it as a failed file.
#[derive(Debug, Clone)]
pub enum ScanEntry {
    Image(ImageFile),
    Unreadable { path: PathBuf, error: String },
}

/// Recursively finds PNG/JPEG files under `root`, in traversal order.
///
/// Fails before touching anything if `root` is missing or not a directory.
pub fn discover(root: &Path) -> Result<Vec<ScanEntry>, ScanError> {
    if !root.exists() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() || !has_extension(entry.path(), IMAGE_EXTENSIONS) {
                    continue;
                }
                entries.push(match ImageFile::from_path(entry.path()) {
                    Ok(file) => ScanEntry::Image(file),
                    Err(err) => ScanEntry::Unreadable {
                        path: entry.path().to_path_buf(),
                        error: err.to_string(),
                    },
                });
            }
            Err(err) => match err.path() {
                Some(path) if has_extension(path, IMAGE_EXTENSIONS) && !path.is_dir() => {
                    tracing::warn!(path = %path.display(), error = %err, "Cannot resolve candidate image");
                    entries.push(ScanEntry::Unreadable {
                        path: path.to_path_buf(),
                        error: err.to_string(),
                    });
                }
                _ => tracing::warn!(error = %err, "Skipping unreadable directory entry"),
            },
        }
    }

    tracing::debug!(root = %root.display(), count = entries.len(), "Scan finished");
    Ok(entries)
}

/// Running counters for one run. Failures are reported as skipped in the
/// summary line but kept apart here so the error list can be printed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
    #[serde(skip)]
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn converted(&mut self, input_size: u64, output_size: u64) {
        self.converted += 1;
        self.input_bytes += input_size;
        self.output_bytes += output_size;
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn fail(&mut self, path: PathBuf, error: String) {
        self.failed += 1;
        self.errors.push((path, error));
    }

    pub fn total(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    /// Skipped count as shown to the user: up-to-date files plus failures.
    pub fn skipped_total(&self) -> usize {
        self.skipped + self.failed
    }
}
