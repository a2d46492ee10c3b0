//! `vscd uninstall` – purge the package and per-user configuration.

use anyhow::Result;
use vscd_core::command::CommandRunner;
use vscd_core::context::InstallContext;
use vscd_core::orchestrator::InstallOrchestrator;
use vscd_core::package_manager::PackageManager;

pub fn run_uninstall(
    ctx: &InstallContext,
    pm: &dyn PackageManager,
    runner: &dyn CommandRunner,
) -> Result<()> {
    if InstallOrchestrator::new(ctx, pm, runner).handle_uninstall()? {
        println!("Removed {}", ctx.config().package_name);
    } else {
        println!("{} is not installed", ctx.config().package_name);
    }
    Ok(())
}
