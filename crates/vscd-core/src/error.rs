//! Fatal error taxonomy for the install workflow.
//!
//! Every variant terminates the run; the CLI prints it and exits non-zero.
//! Cleanup problems never become an `InstallError`, they are only logged.

use std::path::PathBuf;

use crate::command::CommandFailure;
use crate::retry::FetchFailure;

/// Errors that abort an install, update, refresh, uninstall or repository run.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// The process is not running with root privileges.
    #[error("this command must be run as root; use sudo")]
    Privilege,

    /// Refreshing the package index or installing the dependency batch failed.
    #[error("dependency installation failed: {0}")]
    DependencyInstall(#[source] CommandFailure),

    /// Downloading a remote file failed after the retry policy gave up.
    #[error("download of {url} failed after {attempts} attempt(s): {source}")]
    Fetch {
        url: String,
        attempts: u32,
        #[source]
        source: FetchFailure,
    },

    /// The package manager could not install the package, even after the
    /// fix-broken-dependencies fallback.
    #[error("package installation failed: {0}")]
    PackageInstall(#[source] CommandFailure),

    /// The installed executable did not report its version successfully.
    #[error("installation check failed: `{executable} --version` {reason}")]
    Verification { executable: String, reason: String },

    /// Signing key or repository list could not be put in place.
    #[error("repository setup failed at {path}: {reason}")]
    Repository { path: PathBuf, reason: String },

    /// The per-invocation working directory could not be created.
    #[error("could not create working directory under {parent}: {source}")]
    WorkDir {
        parent: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0:#}")]
    Config(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, InstallError>;

impl InstallError {
    pub(crate) fn repository(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        InstallError::Repository {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_message_names_the_command() {
        let err = InstallError::Verification {
            executable: "code".into(),
            reason: "exited with status 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "installation check failed: `code --version` exited with status 1"
        );
    }

    #[test]
    fn fetch_message_includes_attempts() {
        let err = InstallError::Fetch {
            url: "http://example.invalid/pkg.deb".into(),
            attempts: 3,
            source: FetchFailure::Http(503),
        };
        let msg = err.to_string();
        assert!(msg.contains("after 3 attempt(s)"), "{msg}");
        assert!(msg.contains("HTTP 503"), "{msg}");
    }
}
