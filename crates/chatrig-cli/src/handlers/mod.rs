//! Command handlers that delegate to the stack controller.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that call [`StackController`](chatrig_core::StackController)
//!   and format output for the terminal
//!
//! Handlers should NOT contain stack logic or touch adapters directly.

pub mod logs;
pub mod open;
pub mod paths;
pub mod restart;
pub mod start;
pub mod status;
pub mod stop;
