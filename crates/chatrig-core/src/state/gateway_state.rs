//! The gateway state file.
//!
//! Format: two-line text file
//! ```text
//! <pid>
//! <started at, unix seconds>
//! ```

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};

use super::{StateFileError, remove_if_present, write_atomic};

/// PID and start time of the background gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayState {
    pub pid: u32,
    pub started_at: DateTime<Utc>,
}

/// Fully overwrite the state file.
pub fn write_gateway_state(path: &Path, state: &GatewayState) -> Result<(), StateFileError> {
    write_atomic(path, &format!("{}\n{}\n", state.pid, state.started_at.timestamp()))
}

/// Read the state file; `Ok(None)` when there is none.
pub fn read_gateway_state(path: &Path) -> Result<Option<GatewayState>, StateFileError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StateFileError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let malformed = |reason| StateFileError::Malformed {
        path: path.to_path_buf(),
        reason,
    };
    let mut lines = content.lines();

    let pid = lines
        .next()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| malformed("missing or invalid PID"))?;

    let started_at = lines
        .next()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| malformed("missing or invalid start time"))?;

    Ok(Some(GatewayState { pid, started_at }))
}

/// Delete the state file (idempotent).
pub fn delete_gateway_state(path: &Path) -> Result<(), StateFileError> {
    remove_if_present(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("gateway.pid");
        let state = GatewayState {
            pid: 4242,
            started_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        write_gateway_state(&path, &state).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "4242\n1700000000\n");
        assert_eq!(read_gateway_state(&path).unwrap(), Some(state));
        assert!(!dir.path().join("state").join("gateway.pid.tmp").exists());

        delete_gateway_state(&path).unwrap();
        assert!(!path.exists());
        // Second delete is a no-op.
        delete_gateway_state(&path).unwrap();
        assert_eq!(read_gateway_state(&path).unwrap(), None);
    }

    #[test]
    fn garbage_is_reported_as_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.pid");
        fs::write(&path, "not-a-pid\n").unwrap();

        let err = read_gateway_state(&path).unwrap_err();
        assert!(matches!(err, StateFileError::Malformed { .. }));
    }
}
