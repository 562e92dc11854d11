//! `chatrig open`.

use anyhow::Result;
use tokio::process::Command;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Platform command that hands a URL to the default browser.
pub const fn opener() -> &'static str {
    if cfg!(target_os = "macos") { "open" } else { "xdg-open" }
}

pub async fn execute(ctx: &CliContext) -> Result<()> {
    let url = &ctx.settings().webui_url;
    debug!(opener = opener(), %url, "Opening front-end");

    let status = Command::new(opener())
        .arg(url)
        .status()
        .await
        .map_err(|e| CliError::Process(format!("failed to run {}: {e}", opener())))?;

    if !status.success() {
        return Err(CliError::Process(format!("{} {url} exited with {status}", opener())).into());
    }
    println!("Opened {url}");
    Ok(())
}
