//! `chatrig paths`.

use anyhow::Result;

use crate::bootstrap::CliContext;

pub fn execute(ctx: &CliContext) -> Result<()> {
    println!("{}", ctx.paths());
    Ok(())
}
