//! `vscd install` – dependencies, download, install, verify, cleanup.

use anyhow::Result;
use vscd_core::command::CommandRunner;
use vscd_core::context::InstallContext;
use vscd_core::orchestrator::InstallOrchestrator;
use vscd_core::package_manager::PackageManager;

use super::print_report;

pub fn run_install(
    ctx: &InstallContext,
    pm: &dyn PackageManager,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let report = InstallOrchestrator::new(ctx, pm, runner).handle_install()?;
    print_report("installed", &report);
    Ok(())
}
