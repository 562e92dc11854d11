//! Controller state on disk.
//!
//! Both files are advisory: `status` never reads them to decide what is
//! running, and `stop` removes them unconditionally.
//!
//! # Safety guarantees
//! - Atomic writes via temp file + rename
//! - Deletes are idempotent

mod gateway_state;
mod status_cache;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use gateway_state::{GatewayState, delete_gateway_state, read_gateway_state, write_gateway_state};
pub use status_cache::{clear_status_cache, write_status_cache};

#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed state file {path}: {reason}")]
    Malformed { path: PathBuf, reason: &'static str },

    #[error("failed to encode status cache: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Remove `path`, treating "already gone" as success.
fn remove_if_present(path: &std::path::Path) -> Result<(), StateFileError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StateFileError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write via `<path>.tmp` and rename into place.
fn write_atomic(path: &std::path::Path, contents: &str) -> Result<(), StateFileError> {
    let wrap = |source| StateFileError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, contents).map_err(wrap)?;
    std::fs::rename(&tmp, path).map_err(wrap)
}
