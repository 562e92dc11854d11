//! Credential map to ordered endpoint list.
//!
//! A pure function of the current map: running it twice over the same map
//! yields byte-identical positional strings.

use crate::credentials::{CredentialKey, CredentialMap};
use crate::domain::{EndpointList, EndpointUrls, LIST_DELIMITER};

use super::proxy_config::{proxy_access_key, proxy_enabled};

/// Canonical URLs for this credential map (the aggregator URL is overridable).
pub fn endpoint_urls(creds: &CredentialMap) -> EndpointUrls {
    let mut urls = EndpointUrls::default();
    if let Some(url) = creds.get(CredentialKey::OpenRouterBaseUrl) {
        url.clone_into(&mut urls.aggregator);
    }
    urls
}

/// Build the front-end's endpoint list.
pub fn build_endpoints(creds: &CredentialMap, urls: &EndpointUrls) -> EndpointList {
    let mut list = EndpointList::new();

    // Positional lists: empties dropped independently, then zipped by index.
    let base_urls = split_list(creds.get(CredentialKey::OpenAiApiBaseUrls));
    let keys = split_list(creds.get(CredentialKey::OpenAiApiKeys));
    for idx in 0..base_urls.len().max(keys.len()) {
        let url = base_urls
            .get(idx)
            .copied()
            .unwrap_or(urls.default_provider.as_str());
        let key = keys.get(idx).copied().unwrap_or_default();
        list.upsert(url, key);
    }

    if let Some(key) = creds.get(CredentialKey::OpenAiApiKey) {
        list.upsert_front(&urls.default_provider, key);
    }

    match creds.get(CredentialKey::OpenRouterApiKey) {
        Some(key) => list.upsert(&urls.aggregator, key),
        None => {
            list.remove(&urls.aggregator);
        }
    }

    if proxy_enabled(creds) {
        list.upsert(&urls.proxy, &proxy_access_key(creds));
    } else {
        list.remove(&urls.proxy);
    }

    list
}

fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|value| {
        value
            .split(LIST_DELIMITER)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
