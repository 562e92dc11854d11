//! Path utilities for the chatrig config root and everything generated under it.
//!
//! This module provides the canonical layout used by every component:
//! - Credential sources (user-level secrets file, legacy dotfile)
//! - Generated secrets files for the front-end and the proxy
//! - The proxy routing template
//! - Controller state (gateway state file, status cache)
//! - The compose stack directory
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - `StackPaths` captures the whole layout once so services never consult
//!   the environment themselves
//! - OS-specific logic is kept private in `platform`

mod ensure;
mod error;
mod platform;
mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

// Error type
pub use error::PathError;

// Platform roots
pub use platform::{config_root, home_dir};

// Directory operations
pub use ensure::{ensure_parent_dir, remove_private_file, write_private_file};

// Whole-layout resolver
pub use resolver::StackPaths;
