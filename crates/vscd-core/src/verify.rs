//! Installation verifier: the installed executable must answer `--version`.

use crate::command::CommandRunner;
use crate::error::{InstallError, Result};

/// Runs `<executable> --version`. Success is the exit status alone; the
/// reported version is logged, not checked.
pub fn verify_installation(runner: &dyn CommandRunner, executable: &str) -> Result<String> {
    let failed = |reason: String| {
        tracing::error!("installation check failed: {} --version {}", executable, reason);
        InstallError::Verification {
            executable: executable.to_string(),
            reason,
        }
    };

    let output = runner
        .run(executable, &["--version"], &[])
        .map_err(|e| failed(format!("could not be started: {}", e)))?;
    if !output.success {
        let reason = match output.code {
            Some(code) => format!("exited with status {}", code),
            None => "was terminated by a signal".to_string(),
        };
        return Err(failed(reason));
    }

    let version = output.stdout.lines().next().unwrap_or("").trim().to_string();
    tracing::info!("{} installed successfully (version {})", executable, version);
    Ok(version)
}
