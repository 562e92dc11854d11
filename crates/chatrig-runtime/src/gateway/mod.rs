//! Gateway process management.
//!
//! # Safety guarantees
//! - PIDs are checked for existence before signalling
//! - A PID whose process no longer looks like the gateway is treated as gone
//! - Termination escalates SIGTERM → SIGKILL

mod launcher;
mod pid;

pub use launcher::ProcessGatewayLauncher;
pub use pid::{kill_pid, pid_exists, process_matches};
