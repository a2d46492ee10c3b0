//! External command execution.
//!
//! Everything that shells out (package manager, `gpg`, the installed editor)
//! goes through [`CommandRunner`] so tests can substitute a fake.

use std::fmt;
use std::io;
use std::process::Command;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status 0.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Abstraction for running external commands.
pub trait CommandRunner {
    /// Runs `program` with `args` and extra environment `env`, waiting for it
    /// to finish and capturing its output.
    ///
    /// Returns `Err` only when the command could not be started.
    fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> io::Result<CommandOutput>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> io::Result<CommandOutput> {
        tracing::debug!("running: {}", render(program, args));
        let output = Command::new(program)
            .args(args)
            .envs(env.iter().copied())
            .output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!(target: "vscd::command", "{}", line);
        }
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout,
            stderr,
        })
    }
}

/// A command that could not be started or exited unsuccessfully.
#[derive(Debug, thiserror::Error)]
pub enum CommandFailure {
    #[error("`{command}` could not be started: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` {}{}", ExitCode(.code), StderrTail(.stderr))]
    Exit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

struct ExitCode<'a>(&'a Option<i32>);

impl fmt::Display for ExitCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self.0 {
            Some(code) => write!(f, "exited with status {}", code),
            None => write!(f, "was terminated by a signal"),
        }
    }
}

/// Last non-empty stderr line, which is where apt and dpkg put the reason.
struct StderrTail<'a>(&'a str);

impl fmt::Display for StderrTail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.lines().rev().map(str::trim).find(|l| !l.is_empty()) {
            Some(line) => write!(f, ": {}", line),
            None => Ok(()),
        }
    }
}

/// Human-readable command line for logs and error messages.
pub fn render(program: &str, args: &[&str]) -> String {
    let mut s = program.to_string();
    for a in args {
        s.push(' ');
        s.push_str(a);
    }
    s
}

/// Runs a command and turns a spawn error or non-zero exit into a [`CommandFailure`].
pub fn run_checked(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[&str],
    env: &[(&str, &str)],
) -> Result<CommandOutput, CommandFailure> {
    let command = render(program, args);
    let output = runner
        .run(program, args, env)
        .map_err(|source| CommandFailure::Spawn {
            command: command.clone(),
            source,
        })?;
    if output.success {
        Ok(output)
    } else {
        Err(CommandFailure::Exit {
            command,
            code: output.code,
            stderr: output.stderr,
        })
    }
}
