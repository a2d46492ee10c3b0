//! Root privilege check performed before any action touches the system.

use crate::error::{InstallError, Result};

/// Whether the effective user is root.
#[cfg(unix)]
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_root() -> bool {
    false
}

/// Fails with [`InstallError::Privilege`] unless running as root.
pub fn require_root() -> Result<()> {
    check(is_root())
}

fn check(root: bool) -> Result<()> {
    if root {
        Ok(())
    } else {
        tracing::error!("this command must be run as root; use sudo");
        Err(InstallError::Privilege)
    }
}
