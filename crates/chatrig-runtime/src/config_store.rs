//! `FrontendConfigStore` backed by the front-end's SQLite database.
//!
//! The database lives inside the front-end container, so every query runs
//! as a short Python script through `exec`. The table holds one JSON
//! document per row; the highest id is the live configuration.

use std::sync::Arc;

use async_trait::async_trait;
use chatrig_core::{ConfigStoreError, FrontendConfigStore, ServiceRuntime, StoreSnapshot};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Database path inside the front-end container.
pub const DEFAULT_DB_PATH: &str = "/app/backend/data/webui.db";

const LOAD_SCRIPT: &str = r#"
import json, os, sqlite3, sys
path = sys.argv[1]
if not os.path.exists(path):
    print(json.dumps({"state": "missing"}))
    sys.exit(0)
con = sqlite3.connect(path)
try:
    row = con.execute("SELECT id, data FROM config ORDER BY id DESC LIMIT 1").fetchone()
except sqlite3.OperationalError:
    print(json.dumps({"state": "missing"}))
    sys.exit(0)
if row is None:
    print(json.dumps({"state": "row", "id": None, "data": {}}))
else:
    data = row[1]
    if isinstance(data, (bytes, str)):
        data = json.loads(data)
    print(json.dumps({"state": "row", "id": row[0], "data": data}))
"#;

const SAVE_SCRIPT: &str = r#"
import json, sqlite3, sys
path, row_id, data = sys.argv[1], sys.argv[2], sys.argv[3]
json.loads(data)
con = sqlite3.connect(path)
with con:
    if row_id:
        con.execute(
            "UPDATE config SET data = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            (data, int(row_id)),
        )
    else:
        con.execute(
            "INSERT INTO config (data, version, created_at, updated_at) "
            "VALUES (?, 0, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            (data,),
        )
"#;

#[derive(Debug, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
enum ScriptSnapshot {
    Missing,
    Row { id: Option<i64>, data: Value },
}

/// Reaches whichever front-end container the caller names.
pub struct ContainerConfigStore {
    runtime: Arc<dyn ServiceRuntime>,
    db_path: String,
}

impl ContainerConfigStore {
    pub fn new(runtime: Arc<dyn ServiceRuntime>) -> Self {
        Self {
            runtime,
            db_path: DEFAULT_DB_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }

    async fn python(
        &self,
        container: &str,
        script: &str,
        args: &[String],
    ) -> Result<String, ConfigStoreError> {
        let mut command = vec!["python3".to_string(), "-c".to_string(), script.to_string()];
        command.extend(args.iter().cloned());

        let out = self.runtime.exec(container, &command).await?;
        if !out.success {
            return Err(ConfigStoreError::Query(out.stderr.trim().to_string()));
        }
        Ok(out.stdout)
    }
}

/// Parse the load script's output.
pub fn parse_snapshot(stdout: &str) -> Result<StoreSnapshot, ConfigStoreError> {
    let line = stdout.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or_default();
    let parsed: ScriptSnapshot =
        serde_json::from_str(line).map_err(|e| ConfigStoreError::Corrupt(e.to_string()))?;
    Ok(match parsed {
        ScriptSnapshot::Missing => StoreSnapshot::Missing,
        ScriptSnapshot::Row { id, data } => StoreSnapshot::Row { id, data },
    })
}

#[async_trait]
impl FrontendConfigStore for ContainerConfigStore {
    async fn load(&self, container: &str) -> Result<StoreSnapshot, ConfigStoreError> {
        let stdout = self.python(container, LOAD_SCRIPT, &[self.db_path.clone()]).await?;
        let snapshot = parse_snapshot(&stdout)?;
        debug!(%container, missing = matches!(snapshot, StoreSnapshot::Missing), "Loaded front-end config");
        Ok(snapshot)
    }

    async fn save(
        &self,
        container: &str,
        id: Option<i64>,
        data: &Value,
    ) -> Result<(), ConfigStoreError> {
        let encoded = serde_json::to_string(data).map_err(|e| ConfigStoreError::Corrupt(e.to_string()))?;
        let row_id = id.map(|i| i.to_string()).unwrap_or_default();
        self.python(container, SAVE_SCRIPT, &[self.db_path.clone(), row_id, encoded])
            .await?;
        debug!(%container, row = ?id, "Saved front-end config");
        Ok(())
    }
}
