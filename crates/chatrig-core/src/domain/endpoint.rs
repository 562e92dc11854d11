//! OpenAI-compatible endpoint entries and their ordered, URL-unique list.

use serde::Serialize;

/// Base URL of the default provider; its entry is always first.
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.openai.com/v1";

/// Base URL of the aggregator endpoint unless overridden by credentials.
pub const AGGREGATOR_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Base URL of the local translation proxy as seen from the front-end container.
pub const PROXY_BASE_URL: &str = "http://litellm:4000/v1";

/// Separator used by the front-end for its multi-value env vars.
pub const LIST_DELIMITER: char = ';';

/// The canonical URLs the builder and label derivation agree on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointUrls {
    pub default_provider: String,
    pub aggregator: String,
    pub proxy: String,
}

impl Default for EndpointUrls {
    fn default() -> Self {
        Self {
            default_provider: DEFAULT_PROVIDER_BASE_URL.to_string(),
            aggregator: AGGREGATOR_BASE_URL.to_string(),
            proxy: PROXY_BASE_URL.to_string(),
        }
    }
}

/// A selectable backend for the front-end.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct EndpointEntry {
    pub base_url: String,
    pub api_key: String,
}

impl EndpointEntry {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: normalize_url(&base_url.into()),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for EndpointEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = if self.api_key.is_empty() { "<none>" } else { "<redacted>" };
        f.debug_struct("EndpointEntry")
            .field("base_url", &self.base_url)
            .field("api_key", &key)
            .finish()
    }
}

/// The two `;`-joined strings the front-end reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionalLists {
    pub base_urls: String,
    pub api_keys: String,
}

/// Ordered endpoints with unique base URLs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EndpointList {
    entries: Vec<EndpointEntry>,
}

impl EndpointList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the key of an existing URL in place, or append a new entry.
    pub fn upsert(&mut self, base_url: &str, api_key: &str) {
        let url = normalize_url(base_url);
        match self.position(&url) {
            Some(idx) => api_key.clone_into(&mut self.entries[idx].api_key),
            None => self.entries.push(EndpointEntry::new(url, api_key)),
        }
    }

    /// Place `base_url` at the front of the list, dropping any earlier entry for it.
    pub fn upsert_front(&mut self, base_url: &str, api_key: &str) {
        let url = normalize_url(base_url);
        if let Some(idx) = self.position(&url) {
            self.entries.remove(idx);
        }
        self.entries.insert(0, EndpointEntry::new(url, api_key));
    }

    /// Remove the entry for `base_url`, returning whether one existed.
    pub fn remove(&mut self, base_url: &str) -> bool {
        let url = normalize_url(base_url);
        match self.position(&url) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, base_url: &str) -> Option<&EndpointEntry> {
        let url = normalize_url(base_url);
        self.entries.iter().find(|e| e.base_url == url)
    }

    pub fn entries(&self) -> &[EndpointEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize back into the front-end's positional env values.
    pub fn to_positional(&self) -> PositionalLists {
        let delimiter = LIST_DELIMITER.to_string();
        PositionalLists {
            base_urls: self
                .entries
                .iter()
                .map(|e| e.base_url.as_str())
                .collect::<Vec<_>>()
                .join(&delimiter),
            api_keys: self
                .entries
                .iter()
                .map(|e| e.api_key.as_str())
                .collect::<Vec<_>>()
                .join(&delimiter),
        }
    }

    fn position(&self, normalized: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.base_url == normalized)
    }
}

/// URLs compare equal with or without trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
