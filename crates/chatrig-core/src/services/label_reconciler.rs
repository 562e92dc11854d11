//! Keeps the front-end's backend labels in line with the endpoint list.
//!
//! The store is written only when merging changes something, which is what
//! lets the controller skip the front-end restart on an unchanged config.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::{BackendLabelAssignment, ReconcileOutcome};
use crate::ports::{ConfigStoreError, FrontendConfigStore, StoreSnapshot};

/// Top-level section of the front-end config holding connection settings.
pub const CONNECTIONS_SECTION: &str = "openai";

/// Per-connection settings map inside [`CONNECTIONS_SECTION`].
pub const LABELS_KEY: &str = "api_configs";

pub struct LabelReconciler {
    store: Arc<dyn FrontendConfigStore>,
}

impl LabelReconciler {
    pub fn new(store: Arc<dyn FrontendConfigStore>) -> Self {
        Self { store }
    }

    /// Merge `desired` into the store of the front-end running as `container`.
    pub async fn reconcile(
        &self,
        container: &str,
        desired: &BackendLabelAssignment,
    ) -> Result<ReconcileOutcome, ConfigStoreError> {
        let (id, data) = match self.store.load(container).await? {
            StoreSnapshot::Missing => return Ok(ReconcileOutcome::MissingStore),
            StoreSnapshot::Row { id, data } => (id, data),
        };

        let merged = merge_labels(&data, desired);
        if merged == data {
            debug!(slots = desired.len(), "Backend labels already up to date");
            return Ok(ReconcileOutcome::Unchanged);
        }

        self.store.save(container, id, &merged).await?;
        info!(%container, slots = desired.len(), row = ?id, "Updated backend labels");
        Ok(ReconcileOutcome::Updated)
    }
}

/// Merge `desired` into a copy of `data`.
///
/// Each desired slot is shallow-merged into the existing slot; slots and
/// fields not named by `desired` are left exactly as they were. An empty
/// assignment returns `data` unchanged.
pub fn merge_labels(data: &Value, desired: &BackendLabelAssignment) -> Value {
    if desired.is_empty() {
        return data.clone();
    }

    let mut root = as_object(data);
    let mut section = as_object(root.get(CONNECTIONS_SECTION).unwrap_or(&Value::Null));
    let mut slots = as_object(section.get(LABELS_KEY).unwrap_or(&Value::Null));

    for (slot, spec) in desired.iter() {
        let merged = spec.merge_into(slots.get(slot));
        slots.insert(slot.to_string(), merged);
    }

    section.insert(LABELS_KEY.to_string(), Value::Object(slots));
    root.insert(CONNECTIONS_SECTION.to_string(), Value::Object(section));
    Value::Object(root)
}

fn as_object(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}
