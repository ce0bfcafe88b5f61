//! Safety Module
//!
//! Refuses to walk protected system directories. Conversion writes a sibling
//! `.webp` next to every matching image, so pointing the tool at `/` or a
//! home root would scatter files across the whole system.

use crate::img_errors::ScanError;
use std::path::Path;

const DANGEROUS_DIRS: &[&str] = &[
    "/",
    "/System",
    "/usr",
    "/bin",
    "/sbin",
    "/etc",
    "/var",
    "/private",
    "/Library",
    "/Applications",
    "/Users",
    "/home",
    "/root",
    "/boot",
    "/dev",
    "/proc",
    "/sys",
    "/tmp",
    "/opt",
];

pub fn check_dangerous_directory(path: &Path) -> Result<(), ScanError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    for candidate in [path, canonical.as_path()] {
        let path_str = candidate.to_string_lossy();
        if let Some(dangerous) = DANGEROUS_DIRS.iter().find(|d| path_str == **d) {
            return Err(ScanError::Protected(dangerous.to_string()));
        }
    }

    // A bare home directory (/home/alice, /Users/bob) is as risky as /home itself.
    let components = canonical.components().count();
    let path_str = canonical.to_string_lossy();
    if components <= 3 && (path_str.starts_with("/Users/") || path_str.starts_with("/home/")) {
        return Err(ScanError::Protected(path_str.into_owned()));
    }

    Ok(())
}
