//! Fakes for the package manager and command runner, built on the public API.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};

use vscd_core::command::{CommandOutput, CommandRunner};
use vscd_core::package_manager::{CommandFailure, PackageManager};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Refresh,
    Batch(Vec<String>),
    LocalFile(PathBuf),
    FixBroken,
    IsInstalled(String),
    Purge(String),
    Upgrade,
    Autoremove,
}

/// Package manager fake. `fail_local` and `fail_fix` make the local install
/// and the fix-broken fallback exit non-zero.
#[derive(Default)]
pub struct ScriptedPackageManager {
    pub calls: RefCell<Vec<Call>>,
    pub fail_local: bool,
    pub fail_fix: bool,
    pub installed: bool,
    /// Local files present at the time `install_local_file` ran.
    pub seen_files: RefCell<Vec<Vec<u8>>>,
}

impl ScriptedPackageManager {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn outcome(&self, call: Call, fail: bool) -> Result<(), CommandFailure> {
        let command = format!("{:?}", call);
        self.calls.borrow_mut().push(call);
        if fail {
            Err(CommandFailure::Exit {
                command,
                code: Some(1),
                stderr: "dpkg: dependency problems".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl PackageManager for ScriptedPackageManager {
    fn refresh_index(&self) -> Result<(), CommandFailure> {
        self.outcome(Call::Refresh, false)
    }

    fn install_batch(&self, packages: &[String]) -> Result<(), CommandFailure> {
        self.outcome(Call::Batch(packages.to_vec()), false)
    }

    fn install_local_file(&self, path: &Path) -> Result<(), CommandFailure> {
        if let Ok(bytes) = std::fs::read(path) {
            self.seen_files.borrow_mut().push(bytes);
        }
        self.outcome(Call::LocalFile(path.to_path_buf()), self.fail_local)
    }

    fn fix_broken_dependencies(&self) -> Result<(), CommandFailure> {
        self.outcome(Call::FixBroken, self.fail_fix)
    }

    fn is_installed(&self, package: &str) -> Result<bool, CommandFailure> {
        self.outcome(Call::IsInstalled(package.to_string()), false)?;
        Ok(self.installed)
    }

    fn purge(&self, package: &str) -> Result<(), CommandFailure> {
        self.outcome(Call::Purge(package.to_string()), false)
    }

    fn upgrade_all(&self) -> Result<(), CommandFailure> {
        self.outcome(Call::Upgrade, false)
    }

    fn autoremove(&self) -> Result<(), CommandFailure> {
        self.outcome(Call::Autoremove, false)
    }
}

/// Command runner that records invocations and answers with a fixed output.
pub struct RecordingRunner {
    pub calls: RefCell<Vec<String>>,
    pub output: CommandOutput,
}

impl RecordingRunner {
    pub fn succeeding(stdout: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            output: CommandOutput::ok(stdout),
        }
    }

    pub fn failing(code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            output: CommandOutput::failed(code, ""),
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], _env: &[(&str, &str)]) -> io::Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push(format!("{} {}", program, args.join(" ")));
        Ok(self.output.clone())
    }
}

/// Runner standing in for `gpg --dearmor` (copies input to `--output`) and
/// for the installed editor (prints a version).
#[derive(Default)]
pub struct HostRunner {
    pub calls: RefCell<Vec<String>>,
}

impl CommandRunner for HostRunner {
    fn run(&self, program: &str, args: &[&str], _env: &[(&str, &str)]) -> io::Result<CommandOutput> {
        self.calls
            .borrow_mut()
            .push(format!("{} {}", program, args.join(" ")));
        match program {
            "gpg" => {
                let out = args
                    .iter()
                    .position(|a| *a == "--output")
                    .and_then(|i| args.get(i + 1))
                    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no --output"))?;
                let input = args.last().copied().unwrap_or_default();
                std::fs::copy(input, out)?;
                Ok(CommandOutput::ok(""))
            }
            _ => Ok(CommandOutput::ok("1.95.0\n")),
        }
    }
}
