//! APT/dpkg implementation of [`PackageManager`].

use std::path::Path;

use super::PackageManager;
use crate::command::{run_checked, CommandFailure, CommandRunner, SystemCommandRunner};

const APT_GET: &str = "apt-get";
const DPKG: &str = "dpkg";
const DPKG_QUERY: &str = "dpkg-query";

/// Keeps apt from stopping at debconf prompts.
const NONINTERACTIVE: &[(&str, &str)] = &[("DEBIAN_FRONTEND", "noninteractive")];

/// Status string dpkg reports for a fully installed package.
const INSTALLED_STATUS: &str = "install ok installed";

/// Debian package manager driven through `apt-get`, `dpkg` and `dpkg-query`.
#[derive(Debug, Clone, Default)]
pub struct Apt<R = SystemCommandRunner> {
    runner: R,
}

impl Apt<SystemCommandRunner> {
    /// APT on the host system.
    pub fn system() -> Self {
        Self {
            runner: SystemCommandRunner,
        }
    }
}

impl<R: CommandRunner> Apt<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn apt_get(&self, args: &[&str]) -> Result<(), CommandFailure> {
        run_checked(&self.runner, APT_GET, args, NONINTERACTIVE).map(|_| ())
    }
}

impl<R: CommandRunner> PackageManager for Apt<R> {
    fn refresh_index(&self) -> Result<(), CommandFailure> {
        self.apt_get(&["update"])
    }

    fn install_batch(&self, packages: &[String]) -> Result<(), CommandFailure> {
        let mut args = vec!["install", "-y"];
        args.extend(packages.iter().map(String::as_str));
        self.apt_get(&args)
    }

    fn install_local_file(&self, path: &Path) -> Result<(), CommandFailure> {
        let path = path.to_string_lossy();
        run_checked(&self.runner, DPKG, &["-i", &path], NONINTERACTIVE).map(|_| ())
    }

    fn fix_broken_dependencies(&self) -> Result<(), CommandFailure> {
        self.apt_get(&["install", "-f", "-y"])
    }

    fn is_installed(&self, package: &str) -> Result<bool, CommandFailure> {
        let args = ["-W", "-f=${Status}", package];
        let output = self
            .runner
            .run(DPKG_QUERY, &args, &[])
            .map_err(|source| CommandFailure::Spawn {
                command: crate::command::render(DPKG_QUERY, &args),
                source,
            })?;
        // dpkg-query exits 1 for packages it has never heard of.
        Ok(output.success && output.stdout.trim() == INSTALLED_STATUS)
    }

    fn purge(&self, package: &str) -> Result<(), CommandFailure> {
        self.apt_get(&["purge", "-y", package])
    }

    fn upgrade_all(&self) -> Result<(), CommandFailure> {
        self.apt_get(&["upgrade", "-y"])
    }

    fn autoremove(&self) -> Result<(), CommandFailure> {
        self.apt_get(&["autoremove", "-y"])
    }
}
