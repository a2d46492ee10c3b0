//! Install orchestration for the direct package path.
//!
//! Stages run strictly in order:
//! dependencies → download → install → verify, then best-effort cleanup.
//! Any fatal stage error moves the run to [`Stage::Failed`]; cleanup still
//! runs if a download was started. Earlier successful stages are not undone.

use std::fmt;

use crate::checksum;
use crate::cleanup;
use crate::command::CommandRunner;
use crate::context::InstallContext;
use crate::deps;
use crate::error::{InstallError, Result};
use crate::fetch::FetchJob;
use crate::install;
use crate::package_manager::PackageManager;
use crate::verify;

/// Progress of a direct-package install run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    DependenciesInstalled,
    Downloaded,
    Installed,
    Verified,
    CleanedUp,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Idle => "idle",
            Stage::DependenciesInstalled => "dependencies installed",
            Stage::Downloaded => "downloaded",
            Stage::Installed => "installed",
            Stage::Verified => "verified",
            Stage::CleanedUp => "cleaned up",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// First line of `<executable> --version`.
    pub version: String,
    /// Size of the downloaded package.
    pub bytes: u64,
    /// HTTP attempts needed for the download.
    pub attempts: u32,
    /// SHA-256 of the downloaded package, when it could be computed.
    pub sha256: Option<String>,
}

/// Drives the install, update, refresh and uninstall actions.
pub struct InstallOrchestrator<'a> {
    ctx: &'a InstallContext,
    pm: &'a dyn PackageManager,
    runner: &'a dyn CommandRunner,
    stage: Stage,
}

impl<'a> InstallOrchestrator<'a> {
    pub fn new(
        ctx: &'a InstallContext,
        pm: &'a dyn PackageManager,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            ctx,
            pm,
            runner,
            stage: Stage::Idle,
        }
    }

    /// Current stage of the last (or ongoing) install run.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!("stage: {} -> {}", self.stage, next);
        self.stage = next;
    }

    /// Installs dependencies, downloads, installs and verifies the package,
    /// then removes the download whatever the outcome.
    pub fn handle_install(&mut self) -> Result<InstallReport> {
        self.stage = Stage::Idle;
        let result = self.run_stages();

        let package_path = self.ctx.package_path();
        if package_path.exists() {
            cleanup::cleanup(&package_path);
        }

        match result {
            Ok(report) => {
                self.advance(Stage::CleanedUp);
                Ok(report)
            }
            Err(e) => {
                tracing::error!("install failed after stage '{}': {}", self.stage, e);
                self.advance(Stage::Failed);
                Err(e)
            }
        }
    }

    fn run_stages(&mut self) -> Result<InstallReport> {
        let ctx = self.ctx;
        let cfg = ctx.config();

        deps::install_dependencies(self.pm, &cfg.dependencies)?;
        self.advance(Stage::DependenciesInstalled);

        let mut job = FetchJob::new(cfg.package_url.as_str(), ctx.package_path());
        let bytes = job.run(&ctx.fetch_options())?;
        let sha256 = match checksum::sha256_path(job.destination_path()) {
            Ok(digest) => {
                tracing::info!("package sha256: {}", digest);
                Some(digest)
            }
            Err(e) => {
                tracing::warn!("could not hash downloaded package: {:#}", e);
                None
            }
        };
        self.advance(Stage::Downloaded);

        install::install_package(self.pm, job.destination_path())?;
        self.advance(Stage::Installed);

        let version = verify::verify_installation(self.runner, &cfg.executable)?;
        self.advance(Stage::Verified);

        Ok(InstallReport {
            version,
            bytes,
            attempts: job.attempt_count(),
            sha256,
        })
    }

    fn is_installed(&self) -> Result<bool> {
        let package = &self.ctx.config().package_name;
        self.pm
            .is_installed(package)
            .map_err(InstallError::PackageInstall)
    }

    /// Reinstalls the latest package whether or not it is already present.
    pub fn handle_update(&mut self) -> Result<InstallReport> {
        if self.is_installed()? {
            tracing::info!("updating {}", self.ctx.config().package_name);
        } else {
            tracing::info!(
                "{} is not installed; proceeding with installation",
                self.ctx.config().package_name
            );
        }
        self.handle_install()
    }

    /// Uninstalls, then installs from scratch.
    pub fn handle_refresh(&mut self) -> Result<InstallReport> {
        self.handle_uninstall()?;
        self.handle_install()
    }

    /// What `vscd` does without a subcommand: update if installed, otherwise install.
    pub fn handle_default_action(&mut self) -> Result<InstallReport> {
        self.handle_update()
    }

    /// Purges the package and removes per-user configuration. Returns whether
    /// anything was uninstalled.
    pub fn handle_uninstall(&mut self) -> Result<bool> {
        let ctx = self.ctx;
        let package = &ctx.config().package_name;
        if !self.is_installed()? {
            tracing::info!("{} is not installed as a package", package);
            return Ok(false);
        }
        tracing::info!("uninstalling {}", package);
        self.pm
            .purge(package)
            .map_err(InstallError::PackageInstall)?;
        cleanup::remove_config(&ctx.config_paths());
        Ok(true)
    }
}
