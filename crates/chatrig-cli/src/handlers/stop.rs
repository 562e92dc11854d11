//! `chatrig stop`.

use anyhow::Result;
use chatrig_core::StopReport;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext) -> Result<()> {
    let report = ctx.controller.stop().await.map_err(CliError::from)?;
    println!("{}", render_report(&report));
    Ok(())
}

fn render_report(report: &StopReport) -> String {
    let mut lines = vec!["Stopped chatrig".to_string()];
    if let Some(pid) = report.terminated_gateway {
        lines.push(format!("  gateway pid {pid} terminated"));
    }
    if let Some(pid) = report.stale_gateway {
        lines.push(format!("  gateway pid {pid} was already gone"));
    }
    for warning in &report.warnings {
        lines.push(format!("  warning: {warning}"));
    }
    lines.join("\n")
}
