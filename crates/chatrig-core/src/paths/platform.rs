//! Platform-specific root resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable that relocates the whole config root.
pub(super) const CONFIG_DIR_ENV: &str = "CHATRIG_CONFIG_DIR";

/// Get the per-user config root that holds credentials, generated files and state.
///
/// Resolution order:
/// 1. `CHATRIG_CONFIG_DIR` environment variable (highest priority)
/// 2. System config directory (e.g., `~/.config/chatrig`)
///
/// The directory is not created here; writers create what they need.
pub fn config_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(CONFIG_DIR_ENV) {
        return normalize_user_path(&path);
    }

    let config_dir = dirs::config_dir().ok_or(PathError::NoConfigDir)?;
    Ok(config_dir.join("chatrig"))
}

/// The user's home directory.
pub fn home_dir() -> Result<PathBuf, PathError> {
    dirs::home_dir().ok_or(PathError::NoHomeDir)
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub(super) fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = home_dir()?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
