//! Dependency installer: refresh the package index once, then install the
//! whole dependency list in a single batch.

use crate::error::{InstallError, Result};
use crate::package_manager::PackageManager;

/// Ensures `packages` are present. Duplicates and unknown names are passed
/// through untouched; the package manager's transaction decides the outcome.
pub fn install_dependencies(pm: &dyn PackageManager, packages: &[String]) -> Result<()> {
    tracing::info!("updating package index");
    pm.refresh_index().map_err(|e| {
        tracing::error!("package index refresh failed: {}", e);
        InstallError::DependencyInstall(e)
    })?;

    if packages.is_empty() {
        tracing::debug!("no dependencies configured");
        return Ok(());
    }

    tracing::info!("installing dependencies: {}", packages.join(" "));
    pm.install_batch(packages).map_err(|e| {
        tracing::error!("dependency installation failed: {}", e);
        InstallError::DependencyInstall(e)
    })
}
