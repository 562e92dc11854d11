//! `chatrig logs`.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext) -> Result<()> {
    ctx.controller.logs().await.map_err(CliError::from)?;
    Ok(())
}
