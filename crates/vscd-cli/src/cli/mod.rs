//! CLI for vscd.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vscd_core::command::SystemCommandRunner;
use vscd_core::config::{self, VscdConfig};
use vscd_core::context::InstallContext;
use vscd_core::package_manager::Apt;
use vscd_core::privilege;

use commands::{
    run_checksum, run_completions, run_install, run_refresh, run_repo_install, run_repo_remove,
    run_uninstall, run_update,
};

/// Top-level CLI for vscd.
#[derive(Debug, Parser)]
#[command(name = "vscd")]
#[command(about = "vscd: install, update and remove Visual Studio Code on Debian hosts", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/vscd/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Download the package from this URL instead of the configured one.
    #[arg(long, global = true, value_name = "URL")]
    pub package_url: Option<String>,

    /// Action to perform (default: update, which installs when absent).
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download and install the latest package.
    Install,

    /// Update the installed package, or install it if missing.
    Update,

    /// Uninstall (including user configuration), then install again.
    Refresh,

    /// Purge the package and remove user configuration.
    Uninstall,

    /// Manage the vendor APT repository path.
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },

    /// Compute SHA-256 of a file (e.g. a downloaded package).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum RepoAction {
    /// Trust the signing key, add the repository and install from it.
    Install,

    /// Remove the repository list and signing key.
    Remove,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        cli.run()
    }

    fn run(self) -> Result<()> {
        // Commands that never touch the system.
        match &self.command {
            Some(CliCommand::Checksum { path }) => return run_checksum(path),
            Some(CliCommand::Completions { shell }) => {
                run_completions(*shell);
                return Ok(());
            }
            _ => {}
        }

        privilege::require_root()?;

        let cfg = self.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let ctx = InstallContext::new(cfg)?;
        let pm = Apt::system();
        let runner = SystemCommandRunner;

        match self.command.unwrap_or(CliCommand::Update) {
            CliCommand::Install => run_install(&ctx, &pm, &runner)?,
            CliCommand::Update => run_update(&ctx, &pm, &runner)?,
            CliCommand::Refresh => run_refresh(&ctx, &pm, &runner)?,
            CliCommand::Uninstall => run_uninstall(&ctx, &pm, &runner)?,
            CliCommand::Repo {
                action: RepoAction::Install,
            } => run_repo_install(&ctx, &pm, &runner)?,
            CliCommand::Repo {
                action: RepoAction::Remove,
            } => run_repo_remove(&ctx, &pm)?,
            CliCommand::Checksum { .. } | CliCommand::Completions { .. } => {}
        }

        Ok(())
    }

    fn load_config(&self) -> Result<VscdConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_explicit(path)?,
            None => config::load_or_init()?,
        };
        if let Some(url) = &self.package_url {
            cfg.package_url = url.clone();
        }
        Ok(cfg)
    }
}

/// An explicitly named config file must exist; it is never created.
fn load_explicit(path: &Path) -> Result<VscdConfig> {
    if !path.exists() {
        anyhow::bail!("config file {} does not exist", path.display());
    }
    config::load_or_init_at(path).with_context(|| format!("load config {}", path.display()))
}

#[cfg(test)]
mod tests;
