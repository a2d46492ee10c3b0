//! `vscd repo install` / `vscd repo remove` – the vendor repository path.

use anyhow::Result;
use vscd_core::command::CommandRunner;
use vscd_core::context::InstallContext;
use vscd_core::package_manager::PackageManager;
use vscd_core::repository;

pub fn run_repo_install(
    ctx: &InstallContext,
    pm: &dyn PackageManager,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let version = repository::install_from_repository(ctx, pm, runner)?;
    println!("Visual Studio Code {} installed from the vendor repository", version);
    Ok(())
}

pub fn run_repo_remove(ctx: &InstallContext, pm: &dyn PackageManager) -> Result<()> {
    repository::remove_repository(ctx, pm)?;
    println!(
        "Removed {} and {}",
        ctx.config().repository.list_path.display(),
        ctx.config().repository.keyring_path.display()
    );
    Ok(())
}
