//! Per-invocation install context.
//!
//! Holds the configuration and a private working directory so that nothing
//! is shared through globals and concurrent runs never write to the same
//! download path.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::VscdConfig;
use crate::error::{InstallError, Result};
use crate::fetch::FetchOptions;

/// File name of the downloaded package inside the working directory.
pub const PACKAGE_FILE_NAME: &str = "vscode_latest.deb";

const WORK_DIR_PREFIX: &str = "vscd-";

/// Everything one run needs: configuration, working directory, home directory.
/// The working directory and anything left in it are removed on drop.
#[derive(Debug)]
pub struct InstallContext {
    config: VscdConfig,
    work_dir: TempDir,
    home: Option<PathBuf>,
}

impl InstallContext {
    /// Context with a fresh working directory under the system temp directory.
    pub fn new(config: VscdConfig) -> Result<Self> {
        Self::in_dir(config, &std::env::temp_dir())
    }

    /// Context with a fresh working directory under `parent`.
    pub fn in_dir(config: VscdConfig, parent: &Path) -> Result<Self> {
        let work_dir = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .tempdir_in(parent)
            .map_err(|source| InstallError::WorkDir {
                parent: parent.to_path_buf(),
                source,
            })?;
        tracing::debug!("working directory: {}", work_dir.path().display());
        Ok(Self {
            config,
            work_dir,
            home: std::env::var_os("HOME").map(PathBuf::from),
        })
    }

    /// Overrides the home directory used to expand `~` in config paths.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn config(&self) -> &VscdConfig {
        &self.config
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Destination of the package download.
    pub fn package_path(&self) -> PathBuf {
        self.work_dir().join(PACKAGE_FILE_NAME)
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::from(&self.config.fetch)
    }

    /// Per-user paths removed on uninstall, with `~` expanded.
    pub fn config_paths(&self) -> Vec<PathBuf> {
        self.config.expanded_config_paths(self.home.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_context_gets_its_own_package_path() {
        let parent = tempfile::tempdir().unwrap();
        let a = InstallContext::in_dir(VscdConfig::default(), parent.path()).unwrap();
        let b = InstallContext::in_dir(VscdConfig::default(), parent.path()).unwrap();
        assert_ne!(a.package_path(), b.package_path());
        assert!(a.package_path().ends_with(PACKAGE_FILE_NAME));
        assert!(a.work_dir().starts_with(parent.path()));
    }

    #[test]
    fn work_dir_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let ctx = InstallContext::in_dir(VscdConfig::default(), parent.path()).unwrap();
        let dir = ctx.work_dir().to_path_buf();
        std::fs::write(ctx.package_path(), b"partial").unwrap();
        drop(ctx);
        assert!(!dir.exists());
    }

    #[test]
    fn missing_parent_is_an_error() {
        let parent = tempfile::tempdir().unwrap();
        let err = InstallContext::in_dir(VscdConfig::default(), &parent.path().join("nope"))
            .unwrap_err();
        assert!(matches!(err, InstallError::WorkDir { .. }));
    }

    #[test]
    fn config_paths_use_context_home() {
        let parent = tempfile::tempdir().unwrap();
        let ctx = InstallContext::in_dir(VscdConfig::default(), parent.path())
            .unwrap()
            .with_home(Some(PathBuf::from("/home/dev")));
        assert!(ctx
            .config_paths()
            .contains(&PathBuf::from("/home/dev/.config/Code")));
    }
}
