//! Source file discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursively lists files under `root` whose extension matches one of `extensions`.
///
/// Extensions are compared case-insensitively and without the leading dot.
/// Unreadable entries are logged and skipped. Results are sorted so albums are
/// processed in track order.
pub fn discover_files(root: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            let matched = has_extension(p, extensions);
            debug!(path = %p.display(), matched, "Found file");
            matched
        })
        .collect();

    files.sort();
    files
}

/// Whether `path` has one of the given extensions.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            extensions
                .iter()
                .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}
