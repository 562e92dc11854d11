//! Desired backend labels and the result of reconciling them with the
//! front-end's persisted configuration.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::endpoint::{EndpointList, EndpointUrls};

/// How the front-end classifies a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    External,
    Local,
}

impl ConnectionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::External => "external",
            Self::Local => "local",
        }
    }
}

/// The fields chatrig owns inside one backend slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSpec {
    pub prefix_id: String,
    pub tags: Vec<String>,
    pub connection_type: ConnectionType,
}

impl LabelSpec {
    pub fn new(prefix_id: &str, tags: &[&str], connection_type: ConnectionType) -> Self {
        Self {
            prefix_id: prefix_id.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            connection_type,
        }
    }

    /// The JSON fields these labels contribute to a slot, in the front-end's shape.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("prefix_id".into(), Value::String(self.prefix_id.clone()));
        fields.insert(
            "tags".into(),
            Value::Array(self.tags.iter().map(|t| json!({ "name": t })).collect()),
        );
        fields.insert(
            "connection_type".into(),
            Value::String(self.connection_type.as_str().to_string()),
        );
        fields
    }

    /// Shallow-merge into an existing slot value. Fields not owned here survive.
    pub fn merge_into(&self, existing: Option<&Value>) -> Value {
        let mut merged = match existing {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        for (k, v) in self.to_fields() {
            merged.insert(k, v);
        }
        Value::Object(merged)
    }
}

/// Slot identifier to desired labels.
///
/// Slots are the endpoint indices as strings, matching how the front-end keys
/// its per-connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BackendLabelAssignment {
    slots: BTreeMap<String, LabelSpec>,
}

impl BackendLabelAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: impl Into<String>, spec: LabelSpec) {
        self.slots.insert(slot.into(), spec);
    }

    pub fn get(&self, slot: &str) -> Option<&LabelSpec> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelSpec)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Derive labels for every endpoint chatrig recognises.
    ///
    /// Unknown endpoints get no entry and their slots are left alone.
    pub fn for_endpoints(endpoints: &EndpointList, urls: &EndpointUrls) -> Self {
        let mut assignment = Self::new();
        for (idx, entry) in endpoints.entries().iter().enumerate() {
            let spec = if entry.base_url == urls.default_provider {
                LabelSpec::new("openai", &["openai", "cloud"], ConnectionType::External)
            } else if entry.base_url == urls.aggregator {
                LabelSpec::new("openrouter", &["openrouter", "cloud"], ConnectionType::External)
            } else if entry.base_url == urls.proxy {
                LabelSpec::new("litellm", &["litellm", "proxy"], ConnectionType::Local)
            } else {
                continue;
            };
            assignment.insert(idx.to_string(), spec);
        }
        assignment
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileOutcome {
    /// Merged result equals the stored one; nothing written.
    Unchanged,
    /// The store was written; the front-end needs one restart.
    Updated,
    /// The front-end has no configuration store yet.
    MissingStore,
}

impl std::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Unchanged => "unchanged",
            Self::Updated => "updated",
            Self::MissingStore => "missing-store",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AGGREGATOR_BASE_URL, DEFAULT_PROVIDER_BASE_URL, PROXY_BASE_URL};

    #[test]
    fn merge_keeps_unowned_fields() {
        let spec = LabelSpec::new("openai", &["openai"], ConnectionType::External);
        let existing = json!({ "enable": true, "model_ids": ["gpt-4o"], "prefix_id": "old" });

        let merged = spec.merge_into(Some(&existing));
        assert_eq!(merged["enable"], json!(true));
        assert_eq!(merged["model_ids"], json!(["gpt-4o"]));
        assert_eq!(merged["prefix_id"], json!("openai"));
        assert_eq!(merged["tags"], json!([{ "name": "openai" }]));
        assert_eq!(merged["connection_type"], json!("external"));
    }

    #[test]
    fn merge_replaces_non_object_slot() {
        let spec = LabelSpec::new("litellm", &[], ConnectionType::Local);
        let merged = spec.merge_into(Some(&json!("garbage")));
        assert_eq!(merged, json!({ "prefix_id": "litellm", "tags": [], "connection_type": "local" }));
    }

    #[test]
    fn derivation_uses_endpoint_indices_and_skips_unknown() {
        let mut list = EndpointList::new();
        list.upsert(DEFAULT_PROVIDER_BASE_URL, "k1");
        list.upsert("https://custom.example/v1", "kc");
        list.upsert(AGGREGATOR_BASE_URL, "or");
        list.upsert(PROXY_BASE_URL, "m1");

        let labels = BackendLabelAssignment::for_endpoints(&list, &EndpointUrls::default());
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.get("0").unwrap().prefix_id, "openai");
        assert!(labels.get("1").is_none());
        assert_eq!(labels.get("2").unwrap().prefix_id, "openrouter");
        assert_eq!(labels.get("3").unwrap().connection_type, ConnectionType::Local);
    }
}
