//! Directory creation and private file writes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;

/// Create the directory that will hold `path`, if it has one.
///
/// An existing non-directory in the way is an error rather than being replaced.
pub fn ensure_parent_dir(path: &Path) -> Result<(), PathError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() && !parent.is_dir() {
        return Err(PathError::NotADirectory(parent.to_path_buf()));
    }
    fs::create_dir_all(parent).map_err(|e| PathError::CreateFailed {
        path: parent.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write `contents` to `path` atomically, readable only by the owner.
///
/// The content lands in `<path>.tmp` first and is renamed over the target,
/// so readers never observe a half-written secrets file. On Unix the file
/// mode is forced to `0600` even when the target already existed with a
/// wider mode.
pub fn write_private_file(path: &Path, contents: &str) -> Result<(), PathError> {
    let write_err = |e: std::io::Error| PathError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    ensure_parent_dir(path)?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    let mut options = OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&temp_path).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600)).map_err(write_err)?;
    }

    fs::rename(&temp_path, path).map_err(write_err)
}

/// Delete a generated file. Returns whether one existed.
pub fn remove_private_file(path: &Path) -> Result<bool, PathError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PathError::RemoveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_in_place_of_parent_is_rejected() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("generated");
        fs::write(&blocker, "x").unwrap();

        let err = ensure_parent_dir(&blocker.join("webui.env")).unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
        let err = write_private_file(&blocker.join("webui.env"), "A=1\n").unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
    }

    #[test]
    fn removing_a_missing_file_is_not_an_error() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("litellm.env");

        assert!(!remove_private_file(&target).unwrap());
        write_private_file(&target, "K=v\n").unwrap();
        assert!(remove_private_file(&target).unwrap());
        assert!(!target.exists());
    }

    #[test]
    fn bare_file_name_needs_no_directory() {
        assert!(ensure_parent_dir(Path::new("webui.env")).is_ok());
    }

    #[test]
    fn private_write_creates_parents_and_replaces_content() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("generated").join("webui.env");

        write_private_file(&target, "A=1\n").unwrap();
        write_private_file(&target, "A=2\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "A=2\n");
        assert!(!temp.path().join("generated").join("webui.env.tmp").exists());
    }

    #[test]
    #[cfg(unix)]
    fn private_write_forces_owner_only_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let target = temp.path().join("litellm.env");
        fs::write(&target, "old").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o644)).unwrap();

        write_private_file(&target, "new").unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
