//! Advisory snapshot of the last `status` probe.

use std::path::Path;

use crate::domain::StatusReport;

use super::{StateFileError, remove_if_present, write_atomic};

pub fn write_status_cache(path: &Path, report: &StatusReport) -> Result<(), StateFileError> {
    let json = serde_json::to_string_pretty(report)?;
    write_atomic(path, &json)
}

pub fn clear_status_cache(path: &Path) -> Result<(), StateFileError> {
    remove_if_present(path)
}
