//! Host package manager abstraction.
//!
//! The install workflow only needs a handful of operations; keeping them
//! behind [`PackageManager`] lets tests supply a fake instead of touching the
//! system's package database.

mod apt;

use std::path::Path;

pub use crate::command::CommandFailure;
pub use apt::Apt;

/// Operations the install workflow performs against the host package manager.
/// The exit status of the underlying command is the only success signal.
pub trait PackageManager {
    /// Refresh the package index (`apt-get update`).
    fn refresh_index(&self) -> Result<(), CommandFailure>;

    /// Install all `packages` in one transaction.
    fn install_batch(&self, packages: &[String]) -> Result<(), CommandFailure>;

    /// Install a package file from the local filesystem.
    fn install_local_file(&self, path: &Path) -> Result<(), CommandFailure>;

    /// Resolve dependencies left missing by a failed local install.
    fn fix_broken_dependencies(&self) -> Result<(), CommandFailure>;

    /// Whether `package` is currently installed.
    fn is_installed(&self, package: &str) -> Result<bool, CommandFailure>;

    /// Remove `package` together with its system-wide configuration.
    fn purge(&self, package: &str) -> Result<(), CommandFailure>;

    /// Upgrade every installed package.
    fn upgrade_all(&self) -> Result<(), CommandFailure>;

    /// Remove packages that are no longer needed.
    fn autoremove(&self) -> Result<(), CommandFailure>;
}
