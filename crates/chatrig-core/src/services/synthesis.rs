//! The configuration half of `start`: credentials in, generated files out.

use std::path::Path;

use tracing::{info, warn};

use crate::credentials::{CredentialLoader, CredentialMap};
use crate::domain::{BackendLabelAssignment, EndpointList, EndpointUrls};
use crate::paths::{PathError, StackPaths, remove_private_file};

use super::endpoint_builder::{build_endpoints, endpoint_urls};
use super::frontend_env::write_frontend_env;
use super::proxy_config::ProxyConfigSynthesizer;

/// Everything derived from one credential load.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub credentials: CredentialMap,
    pub urls: EndpointUrls,
    pub endpoints: EndpointList,
    pub proxy_enabled: bool,
}

impl Synthesis {
    /// Derive endpoints and proxy state without touching the filesystem.
    pub fn derive(credentials: CredentialMap) -> Self {
        let urls = endpoint_urls(&credentials);
        let endpoints = build_endpoints(&credentials, &urls);
        let proxy_enabled = ProxyConfigSynthesizer::enabled(&credentials);
        Self {
            credentials,
            urls,
            endpoints,
            proxy_enabled,
        }
    }

    /// Labels the front-end should carry for this endpoint list.
    pub fn desired_labels(&self) -> BackendLabelAssignment {
        BackendLabelAssignment::for_endpoints(&self.endpoints, &self.urls)
    }
}

/// Load credentials, then write the front-end secrets file and, when the
/// proxy is enabled, its secrets file and routing template.
///
/// A disabled proxy leaves no secrets file behind. The routing template is
/// user-editable and kept.
pub fn synthesize(paths: &StackPaths, explicit: Option<&Path>) -> Result<Synthesis, PathError> {
    let credentials = CredentialLoader::for_stack(paths, explicit).load();
    let synthesis = Synthesis::derive(credentials);

    write_frontend_env(&paths.frontend_env, &synthesis.endpoints)?;

    if synthesis.proxy_enabled {
        let proxy = ProxyConfigSynthesizer::for_stack(paths);
        proxy.sync_secrets(&synthesis.credentials)?;
        proxy.ensure_routing_template()?;
    } else {
        match remove_private_file(&paths.proxy_env) {
            Ok(true) => info!(path = %paths.proxy_env.display(), "Removed proxy secrets file"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to remove stale proxy secrets file"),
        }
    }

    info!(
        endpoints = synthesis.endpoints.len(),
        proxy_enabled = synthesis.proxy_enabled,
        "Synthesized stack configuration"
    );
    Ok(synthesis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn disabling_the_proxy_removes_its_secrets_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StackPaths::under(dir.path(), None);

        fs::write(&paths.user_secrets, "OPENAI_API_KEY=k1\nANTHROPIC_API_KEY=a1\n").unwrap();
        synthesize(&paths, None).unwrap();
        assert!(fs::read_to_string(&paths.proxy_env).unwrap().contains("a1"));

        fs::write(&paths.user_secrets, "OPENAI_API_KEY=k1\n").unwrap();
        let synthesis = synthesize(&paths, None).unwrap();
        assert!(!synthesis.proxy_enabled);
        assert!(!paths.proxy_env.exists());
        assert!(paths.routing_template.exists());
    }

    #[test]
    fn proxy_files_only_written_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StackPaths::under(dir.path(), None);

        fs::write(&paths.user_secrets, "OPENAI_API_KEY=k1\n").unwrap();
        let synthesis = synthesize(&paths, None).unwrap();
        assert!(!synthesis.proxy_enabled);
        assert!(paths.frontend_env.exists());
        assert!(!paths.proxy_env.exists());
        assert!(!paths.routing_template.exists());

        fs::write(&paths.user_secrets, "OPENAI_API_KEY=k1\nLITELLM_MASTER_KEY=m1\n").unwrap();
        let synthesis = synthesize(&paths, None).unwrap();
        assert!(synthesis.proxy_enabled);
        assert!(paths.proxy_env.exists());
        assert!(paths.routing_template.exists());
    }

    #[test]
    fn explicit_source_wins() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StackPaths::under(dir.path(), None);
        let explicit = dir.path().join("override.env");
        fs::write(&paths.user_secrets, "OPENAI_API_KEY=user\n").unwrap();
        fs::write(&explicit, "export OPENAI_API_KEY='explicit'\n").unwrap();

        let synthesis = synthesize(&paths, Some(&explicit)).unwrap();
        assert_eq!(synthesis.endpoints.entries()[0].api_key, "explicit");
    }
}
