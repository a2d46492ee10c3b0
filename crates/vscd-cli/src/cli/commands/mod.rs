//! CLI command handlers. Each command is in its own file.

mod checksum;
mod completions;
mod install;
mod refresh;
mod repo;
mod uninstall;
mod update;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use install::run_install;
pub use refresh::run_refresh;
pub use repo::{run_repo_install, run_repo_remove};
pub use uninstall::run_uninstall;
pub use update::run_update;

use vscd_core::orchestrator::InstallReport;

fn print_report(action: &str, report: &InstallReport) {
    for line in report_lines(action, report) {
        println!("{}", line);
    }
}

fn report_lines(action: &str, report: &InstallReport) -> Vec<String> {
    let mut lines = vec![
        format!("Visual Studio Code {} {}", report.version, action),
        format!(
            "  package: {} bytes in {} attempt(s)",
            report.bytes, report.attempts
        ),
    ];
    if let Some(digest) = &report.sha256 {
        lines.push(format!("  sha256:  {}", digest));
    }
    lines
}
