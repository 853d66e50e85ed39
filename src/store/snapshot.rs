//! Persisted snapshot of the store — one JSON document holding
//! `{documents, datasets, activeDatasetId}` under a fixed file name.
//!
//! The snapshot is read once at startup and written after every mutation
//! (last-writer-wins, no cross-process coordination). Timestamps serialize
//! as RFC 3339 strings and come back as real `DateTime` values. Older
//! layouts are upgraded by an explicit versioned migration step at
//! deserialization time, never by ad hoc patching in load paths.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::DocumentStore;
use crate::models::{Dataset, Document};

/// Current snapshot layout version.
///
/// v1: documents carried a scalar `datasetId` (single membership).
/// v2: set-valued `datasetIds` on documents, `documentIds` on datasets.
pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    #[error("Snapshot version {0} is newer than this build supports")]
    UnsupportedVersion(u32),
}

/// Serialized form of the store state.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(rename = "_version")]
    pub version: u32,
    pub documents: Vec<Document>,
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub active_dataset_id: Option<Uuid>,
}

impl Snapshot {
    /// Capture the current store state for persistence.
    pub fn capture(store: &DocumentStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            documents: store.documents().to_vec(),
            datasets: store.datasets().to_vec(),
            active_dataset_id: store.active_dataset_id(),
        }
    }

    /// Rebuild a store from this snapshot. Membership consistency is
    /// restored by [`DocumentStore::restore`] — the documents' side wins.
    pub fn into_store(self) -> DocumentStore {
        DocumentStore::restore(self.documents, self.datasets, self.active_dataset_id)
    }

    /// Load a snapshot from disk. A missing file is `Ok(None)` (fresh
    /// start); anything unreadable or unmigratable is an error the caller
    /// decides how to handle.
    pub fn load(path: &Path) -> Result<Option<Self>, SnapshotError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut value: Value = serde_json::from_str(&raw)?;
        migrate(&mut value)?;
        let snapshot: Self = serde_json::from_value(value)?;
        Ok(Some(snapshot))
    }

    /// Write the snapshot, creating the data directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Bring a raw snapshot value up to [`SNAPSHOT_VERSION`], one version step
/// at a time. Snapshots written before versioning existed are treated as v1.
fn migrate(value: &mut Value) -> Result<(), SnapshotError> {
    if !value.is_object() {
        return Err(SnapshotError::Migration {
            version: 1,
            reason: "snapshot root is not an object".into(),
        });
    }

    let mut version = value
        .get("_version")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(1);

    if version > SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    while version < SNAPSHOT_VERSION {
        match version {
            1 => migrate_v1_to_v2(value)?,
            v => {
                return Err(SnapshotError::Migration {
                    version: v,
                    reason: "no migration registered for this version".into(),
                })
            }
        }
        version += 1;
        value["_version"] = Value::from(version);
    }
    Ok(())
}

/// v1 → v2: lift each document's scalar `datasetId` into the set-valued
/// `datasetIds` list (`null` becomes the empty list).
fn migrate_v1_to_v2(value: &mut Value) -> Result<(), SnapshotError> {
    let documents = match value.get_mut("documents") {
        Some(Value::Array(documents)) => documents,
        Some(_) => {
            return Err(SnapshotError::Migration {
                version: 1,
                reason: "'documents' is not an array".into(),
            })
        }
        None => return Ok(()),
    };

    for doc in documents {
        let Some(obj) = doc.as_object_mut() else {
            return Err(SnapshotError::Migration {
                version: 1,
                reason: "document entry is not an object".into(),
            });
        };
        if obj.contains_key("datasetIds") {
            obj.remove("datasetId");
            continue;
        }
        let ids = match obj.remove("datasetId") {
            Some(Value::Null) | None => Vec::new(),
            Some(id) => vec![id],
        };
        obj.insert("datasetIds".into(), Value::Array(ids));
    }
    Ok(())
}
