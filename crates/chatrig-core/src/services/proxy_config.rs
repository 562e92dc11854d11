//! Translation proxy synthesis.
//!
//! The proxy runs only when a credential it translates for is present. Its
//! secrets file is rewritten on every start; the routing template belongs to
//! the user after the first write.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::credentials::{CredentialKey, CredentialMap};
use crate::paths::{PathError, StackPaths, ensure_parent_dir, write_private_file};

/// Proxy access key used when the proxy is enabled without a router key.
pub const PLACEHOLDER_PROXY_KEY: &str = "sk-chatrig-local";

/// Keys whose presence requires the proxy.
const ENABLING_KEYS: [CredentialKey; 4] = [
    CredentialKey::AnthropicApiKey,
    CredentialKey::GeminiApiKey,
    CredentialKey::LiteLlmMasterKey,
    CredentialKey::LiteLlmApiKey,
];

/// Provider keys passed through to the proxy container.
const PASSTHROUGH_KEYS: [CredentialKey; 4] = [
    CredentialKey::OpenAiApiKey,
    CredentialKey::AnthropicApiKey,
    CredentialKey::GeminiApiKey,
    CredentialKey::OpenRouterApiKey,
];

const DEFAULT_ROUTING_TEMPLATE: &str = "\
# Model routing for the chatrig translation proxy.
# Written once; edit freely, chatrig never overwrites this file.
model_list:
  - model_name: claude-sonnet
    litellm_params:
      model: anthropic/claude-3-5-sonnet-latest
      api_key: os.environ/ANTHROPIC_API_KEY
  - model_name: claude-haiku
    litellm_params:
      model: anthropic/claude-3-5-haiku-latest
      api_key: os.environ/ANTHROPIC_API_KEY
  - model_name: gemini-flash
    litellm_params:
      model: gemini/gemini-1.5-flash
      api_key: os.environ/GEMINI_API_KEY
  - model_name: gemini-pro
    litellm_params:
      model: gemini/gemini-1.5-pro
      api_key: os.environ/GEMINI_API_KEY

general_settings:
  master_key: os.environ/LITELLM_MASTER_KEY
";

/// Whether the current credentials require the proxy.
pub fn proxy_enabled(creds: &CredentialMap) -> bool {
    ENABLING_KEYS.iter().any(|key| creds.contains(*key))
}

/// Key the front-end presents to the proxy: master key, then router key.
pub fn proxy_access_key(creds: &CredentialMap) -> String {
    creds
        .get(CredentialKey::LiteLlmMasterKey)
        .or_else(|| creds.get(CredentialKey::LiteLlmApiKey))
        .unwrap_or(PLACEHOLDER_PROXY_KEY)
        .to_string()
}

/// Writes the proxy's secrets file and routing template.
#[derive(Debug, Clone)]
pub struct ProxyConfigSynthesizer {
    secrets_file: PathBuf,
    routing_template: PathBuf,
}

impl ProxyConfigSynthesizer {
    pub fn new(secrets_file: PathBuf, routing_template: PathBuf) -> Self {
        Self {
            secrets_file,
            routing_template,
        }
    }

    pub fn for_stack(paths: &StackPaths) -> Self {
        Self::new(paths.proxy_env.clone(), paths.routing_template.clone())
    }

    pub fn enabled(creds: &CredentialMap) -> bool {
        proxy_enabled(creds)
    }

    /// Rewrite the secrets file from the current map (mode `0600`).
    pub fn sync_secrets(&self, creds: &CredentialMap) -> Result<(), PathError> {
        let mut contents = String::from("# Generated by chatrig on every start. Do not edit.\n");
        for key in PASSTHROUGH_KEYS {
            if let Some(value) = creds.get(key) {
                contents.push_str(&format!("{}={value}\n", key.canonical_name()));
            }
        }
        contents.push_str(&format!(
            "{}={}\n",
            CredentialKey::LiteLlmMasterKey.canonical_name(),
            proxy_access_key(creds)
        ));

        write_private_file(&self.secrets_file, &contents)?;
        debug!(path = %self.secrets_file.display(), "Wrote proxy secrets file");
        Ok(())
    }

    /// Write the default routing document unless a file already exists.
    ///
    /// Returns whether a file was written.
    pub fn ensure_routing_template(&self) -> Result<bool, PathError> {
        ensure_parent_dir(&self.routing_template)?;

        match create_new(&self.routing_template, DEFAULT_ROUTING_TEMPLATE) {
            Ok(()) => {
                info!(path = %self.routing_template.display(), "Wrote default proxy routing template");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(PathError::WriteFailed {
                path: self.routing_template.clone(),
                reason: e.to_string(),
            }),
        }
    }
}

fn create_new(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}
