//! Best-effort removal of temporary files and per-user editor state.
//!
//! Nothing here returns an error: failures are logged as warnings and the
//! overall operation carries on.

use std::io;
use std::path::Path;

/// Removes the file at `path` if it exists. Returns whether a file was removed.
pub fn cleanup(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("removed temporary file: {}", path.display());
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("nothing to clean up at {}", path.display());
            false
        }
        Err(e) => {
            tracing::warn!("failed to remove temporary file {}: {}", path.display(), e);
            false
        }
    }
}

/// Removes each directory (or file) in `paths` that exists, recursively.
/// Returns how many were removed.
pub fn remove_config(paths: &[impl AsRef<Path>]) -> usize {
    tracing::info!("removing configuration and data files");
    let mut removed = 0;
    for path in paths.iter().map(AsRef::as_ref) {
        let result = match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
            Ok(_) => std::fs::remove_file(path),
            // A parent removed earlier in the list takes its children with it.
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                tracing::debug!("removed {}", path.display());
                removed += 1;
            }
            Err(e) => tracing::warn!("failed to remove {}: {}", path.display(), e),
        }
    }
    removed
}
