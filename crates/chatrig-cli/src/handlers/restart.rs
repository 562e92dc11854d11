//! `chatrig restart`.

use anyhow::Result;
use chatrig_core::Mode;

use super::start::render_report;
use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, mode: Mode) -> Result<()> {
    let report = ctx.controller.restart(mode).await.map_err(CliError::from)?;
    print!("{}", render_report(&report, &ctx.settings().webui_url));
    Ok(())
}
