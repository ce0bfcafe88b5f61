//! Common Utilities Module
//!
//! Small path and file helpers used by discovery and conversion.

use std::path::Path;

/// Returns the file extension lower-cased, or an empty string when absent.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::get_extension_lowercase;
///
/// assert_eq!(get_extension_lowercase(Path::new("logo.PNG")), "png");
/// assert_eq!(get_extension_lowercase(Path::new("photo.jpeg")), "jpeg");
/// assert_eq!(get_extension_lowercase(Path::new("README")), "");
/// ```
pub fn get_extension_lowercase(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Case-insensitive extension check against an allow-list (entries without dot).
///
/// # Examples
/// ```
/// use std::path::Path;
/// use shared_utils::common_utils::has_extension;
///
/// let extensions = &["png", "jpg", "jpeg"];
/// assert!(has_extension(Path::new("hero.JPG"), extensions));
/// assert!(!has_extension(Path::new("hero.webp"), extensions));
/// ```
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = get_extension_lowercase(path);
    extensions.contains(&ext.as_str())
}

/// File name for display, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
