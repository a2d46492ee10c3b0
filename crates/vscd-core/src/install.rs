//! Package installer: install the local package file, falling back to the
//! package manager's fix-broken-dependencies operation.

use std::path::Path;

use crate::error::{InstallError, Result};
use crate::package_manager::PackageManager;

/// Installs `package_path`. A failed local install is treated as missing
/// dependencies; if the fix-broken operation then succeeds the stage succeeds.
/// Partially unpacked files are left to the package manager.
pub fn install_package(pm: &dyn PackageManager, package_path: &Path) -> Result<()> {
    tracing::info!("installing package from {}", package_path.display());
    match pm.install_local_file(package_path) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!("local install failed ({}); resolving dependencies", e);
            pm.fix_broken_dependencies().map_err(|e| {
                tracing::error!("dependency resolution failed: {}", e);
                InstallError::PackageInstall(e)
            })
        }
    }
}
