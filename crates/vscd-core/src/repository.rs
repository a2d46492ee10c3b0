//! Repository install path: trust the vendor's signing key, register the
//! vendor APT repository and install the package through the package manager.

use std::fs;
use std::io;
use std::path::Path;

use crate::cleanup;
use crate::command::{run_checked, CommandRunner};
use crate::context::InstallContext;
use crate::error::{InstallError, Result};
use crate::fetch::FetchJob;
use crate::package_manager::PackageManager;
use crate::verify;

/// Downloaded ASCII-armoured key, inside the working directory.
pub const ARMORED_KEY_NAME: &str = "microsoft.asc";
/// De-armoured key before it is moved to the keyring path.
pub const DEARMORED_KEY_NAME: &str = "microsoft.gpg";

/// `rw-r--r--` for the keyring and source list.
const PUBLIC_READ_MODE: u32 = 0o644;

/// Installs the package from the vendor repository. Returns the version
/// reported by the installed executable.
pub fn install_from_repository(
    ctx: &InstallContext,
    pm: &dyn PackageManager,
    runner: &dyn CommandRunner,
) -> Result<String> {
    let armored = ctx.work_dir().join(ARMORED_KEY_NAME);
    let dearmored = ctx.work_dir().join(DEARMORED_KEY_NAME);

    let result = run_repository_install(ctx, pm, runner, &armored, &dearmored);

    for path in [&armored, &dearmored] {
        if path.exists() {
            cleanup::cleanup(path);
        }
    }
    if let Err(e) = &result {
        tracing::error!("repository install failed: {}", e);
    }
    result
}

fn run_repository_install(
    ctx: &InstallContext,
    pm: &dyn PackageManager,
    runner: &dyn CommandRunner,
    armored: &Path,
    dearmored: &Path,
) -> Result<String> {
    let cfg = ctx.config();
    let repo = &cfg.repository;

    tracing::info!("updating package index and upgrading installed packages");
    pm.refresh_index().map_err(InstallError::DependencyInstall)?;
    pm.upgrade_all().map_err(InstallError::DependencyInstall)?;

    if !repo.prerequisites.is_empty() {
        tracing::info!("installing packages: {}", repo.prerequisites.join(" "));
        pm.install_batch(&repo.prerequisites)
            .map_err(InstallError::DependencyInstall)?;
    }

    tracing::info!("downloading signing key from {}", repo.key_url);
    FetchJob::new(repo.key_url.as_str(), armored).run(&ctx.fetch_options())?;

    dearmor_key(runner, armored, dearmored)?;
    install_keyring(dearmored, &repo.keyring_path)?;
    write_source_list(&repo.list_path, &repo.source_entry())?;

    tracing::info!("updating package index to include the repository");
    pm.refresh_index().map_err(InstallError::DependencyInstall)?;

    tracing::info!("installing {}", cfg.package_name);
    pm.install_batch(std::slice::from_ref(&cfg.package_name))
        .map_err(InstallError::PackageInstall)?;

    tracing::info!("removing unnecessary packages");
    pm.autoremove().map_err(InstallError::PackageInstall)?;

    verify::verify_installation(runner, &cfg.executable)
}

/// Converts an ASCII-armoured key to the binary form APT expects.
pub fn dearmor_key(runner: &dyn CommandRunner, armored: &Path, output: &Path) -> Result<()> {
    tracing::info!("de-armoring signing key to {}", output.display());
    let input = armored.to_string_lossy();
    let out = output.to_string_lossy();
    run_checked(
        runner,
        "gpg",
        &["--batch", "--yes", "--dearmor", "--output", &out, &input],
        &[],
    )
    .map_err(|e| InstallError::repository(output, e))?;
    Ok(())
}

/// Moves the key to `keyring` and makes it world-readable.
pub fn install_keyring(source: &Path, keyring: &Path) -> Result<()> {
    if let Some(parent) = keyring.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::repository(parent, e))?;
    }
    if let Err(e) = fs::rename(source, keyring) {
        tracing::debug!("rename failed ({}); copying key instead", e);
        fs::copy(source, keyring).map_err(|e| InstallError::repository(keyring, e))?;
        cleanup::cleanup(source);
    }
    set_public_read(keyring)?;
    tracing::info!("signing key installed at {}", keyring.display());
    Ok(())
}

/// Writes the one-line source entry and makes the file world-readable.
pub fn write_source_list(list_path: &Path, entry: &str) -> Result<()> {
    tracing::info!("adding repository to {}", list_path.display());
    fs::write(list_path, format!("{}\n", entry))
        .map_err(|e| InstallError::repository(list_path, e))?;
    set_public_read(list_path)
}

#[cfg(unix)]
fn set_public_read(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(PUBLIC_READ_MODE))
        .map_err(|e| InstallError::repository(path, e))
}

#[cfg(not(unix))]
fn set_public_read(_path: &Path) -> Result<()> {
    Ok(())
}

/// Removes the source list and keyring written by [`install_from_repository`]
/// and refreshes the index. Files that are already gone are skipped.
pub fn remove_repository(ctx: &InstallContext, pm: &dyn PackageManager) -> Result<()> {
    let repo = &ctx.config().repository;
    for path in [&repo.list_path, &repo.keyring_path] {
        match fs::remove_file(path) {
            Ok(()) => tracing::info!("removed {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} not present", path.display())
            }
            Err(e) => return Err(InstallError::repository(path, e)),
        }
    }
    tracing::info!("updating package index");
    pm.refresh_index().map_err(InstallError::DependencyInstall)
}
