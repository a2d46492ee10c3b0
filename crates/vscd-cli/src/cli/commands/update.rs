//! `vscd update` (also the default action).

use anyhow::Result;
use vscd_core::command::CommandRunner;
use vscd_core::context::InstallContext;
use vscd_core::orchestrator::InstallOrchestrator;
use vscd_core::package_manager::PackageManager;

use super::print_report;

pub fn run_update(
    ctx: &InstallContext,
    pm: &dyn PackageManager,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let report = InstallOrchestrator::new(ctx, pm, runner).handle_default_action()?;
    print_report("updated", &report);
    Ok(())
}
