//! Credential resolution: a typed line parser, the known-key table, and a
//! priority-ordered loader producing a [`CredentialMap`].
//!
//! Nothing here caches. Every `start` re-reads every source, so a key removed
//! from disk disappears from the next synthesized configuration.

mod key;
mod loader;
mod map;
mod parser;

pub use key::{CredentialKey, KeyName, MergeRule};
pub use loader::{CredentialLoader, CredentialSource};
pub use map::CredentialMap;
pub use parser::{Assignment, Line, parse, parse_line};
