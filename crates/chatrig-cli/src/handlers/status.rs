//! `chatrig status`. Always succeeds; stopped services are not an error.

use anyhow::Result;

use crate::bootstrap::CliContext;

pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let report = ctx.controller.status().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        println!("{}", report.render_text());
    }
    Ok(())
}
