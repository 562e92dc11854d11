//! Resolved layout of every file chatrig reads or writes.
//!
//! This struct is the "golden truth" for path resolution. Services receive it
//! by value instead of consulting the environment, so tests point the whole
//! layout at a temp directory with [`StackPaths::under`].

use std::env;
use std::path::{Path, PathBuf};

use super::PathError;
use super::platform::{config_root, home_dir, normalize_user_path};

/// Environment variable that relocates the compose stack directory.
const STACK_DIR_ENV: &str = "CHATRIG_STACK_DIR";

/// Name of the legacy credential dotfile in the user's home directory.
const LEGACY_DOTFILE: &str = ".secrets";

/// All resolved paths captured in a single struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackPaths {
    /// Root directory for configuration, generated files and state.
    pub config_root: PathBuf,
    /// User-level credential source (second priority).
    pub user_secrets: PathBuf,
    /// Legacy dotfile credential source (lowest priority), if a home exists.
    pub legacy_secrets: Option<PathBuf>,
    /// Secrets file consumed by the front-end container.
    pub frontend_env: PathBuf,
    /// Secrets file consumed by the proxy container.
    pub proxy_env: PathBuf,
    /// Proxy model-routing document (written once, never overwritten).
    pub routing_template: PathBuf,
    /// Gateway PID + start time.
    pub gateway_state: PathBuf,
    /// Advisory status snapshot.
    pub status_cache: PathBuf,
    /// Directory holding the compose files.
    pub stack_dir: PathBuf,
}

impl StackPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, PathError> {
        let root = config_root()?;
        let mut paths = Self::under(&root, home_dir().ok().as_deref());

        if let Ok(raw) = env::var(STACK_DIR_ENV) {
            paths.stack_dir = normalize_user_path(&raw)?;
        }

        Ok(paths)
    }

    /// Lay out every path beneath `root`, with the legacy dotfile under `home`.
    pub fn under(root: &Path, home: Option<&Path>) -> Self {
        let generated = root.join("generated");
        let state = root.join("state");

        Self {
            config_root: root.to_path_buf(),
            user_secrets: root.join("secrets.env"),
            legacy_secrets: home.map(|h| h.join(LEGACY_DOTFILE)),
            frontend_env: generated.join("webui.env"),
            proxy_env: generated.join("litellm.env"),
            routing_template: generated.join("litellm.config.yaml"),
            gateway_state: state.join("gateway.pid"),
            status_cache: state.join("status.json"),
            stack_dir: root.join("stack"),
        }
    }
}

impl std::fmt::Display for StackPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "config_root = {}", self.config_root.display())?;
        writeln!(f, "user_secrets = {}", self.user_secrets.display())?;
        match &self.legacy_secrets {
            Some(path) => writeln!(f, "legacy_secrets = {}", path.display())?,
            None => writeln!(f, "legacy_secrets = (no home directory)")?,
        }
        writeln!(f, "frontend_env = {}", self.frontend_env.display())?;
        writeln!(f, "proxy_env = {}", self.proxy_env.display())?;
        writeln!(f, "routing_template = {}", self.routing_template.display())?;
        writeln!(f, "gateway_state = {}", self.gateway_state.display())?;
        writeln!(f, "status_cache = {}", self.status_cache.display())?;
        write!(f, "stack_dir = {}", self.stack_dir.display())
    }
}
