//! The front-end's persisted configuration store.
//!
//! The store holds one JSON document per row; the newest row is the live
//! configuration. chatrig only ever reads the latest row and writes it back.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::RuntimeError;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreSnapshot {
    /// The store itself does not exist yet (front-end never initialised).
    Missing,
    /// Latest row, or an empty default document when `id` is `None`.
    Row { id: Option<i64>, data: Value },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigStoreError {
    #[error("config store query failed: {0}")]
    Query(String),

    #[error("config store returned invalid JSON: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Access to the store inside a running front-end.
///
/// `container` is whichever front-end container is actually up, so primary
/// and legacy deployments share one store implementation.
#[async_trait]
pub trait FrontendConfigStore: Send + Sync {
    async fn load(&self, container: &str) -> Result<StoreSnapshot, ConfigStoreError>;

    /// Insert a new row when `id` is `None`, otherwise update that row.
    async fn save(
        &self,
        container: &str,
        id: Option<i64>,
        data: &Value,
    ) -> Result<(), ConfigStoreError>;
}
