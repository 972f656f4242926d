//! Utility functions for string cleanup and file system checks.
//!
//! - Folder-name sanitizing for article titles
//! - String truncation for logging
//! - Output directory validation at startup

use crate::error::ConfigError;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Characters that are not allowed in folder names on common filesystems.
const ILLEGAL_NAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Turn a page title into a folder name.
///
/// Surrounding whitespace is trimmed and every character in
/// `\ / * ? : " < > |` is removed; everything else is kept as-is.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_folder_name(" a:b/c "), "abc");
/// ```
pub fn sanitize_folder_name(title: &str) -> String {
    title
        .trim()
        .chars()
        .filter(|c| !ILLEGAL_NAME_CHARS.contains(c))
        .collect()
}

/// Whether a sanitized title can name a folder below the output directory.
///
/// Empty names and names made only of dots and whitespace (`.`, `..`) are
/// rejected: joined onto the output directory they would point at it or at
/// its parent.
pub fn is_usable_folder_name(name: &str) -> bool {
    !name.chars().all(|c| c == '.' || c.is_whitespace())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` characters with `"…(+N bytes)"` appended,
/// where `N` is the number of bytes dropped. Never splits a multi-byte
/// character.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
///
/// # Errors
///
/// [`ConfigError::OutputDir`] if the directory cannot be created or written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), ConfigError> {
    let to_err = |source| ConfigError::OutputDir {
        path: path.to_path_buf(),
        source,
    };
    fs::create_dir_all(path).await.map_err(to_err)?;

    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path).map_err(to_err)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
