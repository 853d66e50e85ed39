//! Shared application state.
//!
//! `AppState` is the single instance behind every transport: it serializes
//! store mutations under one `RwLock`, writes the snapshot after each
//! mutation, and broadcasts change events that the WebSocket feed (or any
//! other subscriber) forwards to UIs. Readers take the lock shared; no
//! caller ever touches the store's membership relation directly.

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::extract::Extractor;
use crate::models::DocumentStatus;
use crate::store::{DocumentStore, Snapshot};

/// Buffered events per subscriber; slow consumers drop the oldest.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("State lock poisoned")]
    LockPoisoned,
}

/// Change notification published after a store mutation has been applied
/// and persisted. Serialized as tagged JSON on the event WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    DocumentRegistered {
        document_id: Uuid,
        filename: String,
    },
    StatusChanged {
        document_id: Uuid,
        status: DocumentStatus,
    },
    DataExtracted {
        document_id: Uuid,
        quality_score: u8,
    },
    ReviewSaved {
        document_id: Uuid,
    },
    DocumentDeleted {
        document_id: Uuid,
    },
    DatasetCreated {
        dataset_id: Uuid,
        name: String,
    },
    DatasetUpdated {
        dataset_id: Uuid,
    },
    DatasetDeleted {
        dataset_id: Uuid,
    },
    MembershipChanged {
        dataset_id: Uuid,
    },
    ActiveDatasetChanged {
        dataset_id: Option<Uuid>,
    },
}

pub struct AppState {
    store: RwLock<DocumentStore>,
    /// `None` runs the store purely in memory (tests).
    snapshot_path: Option<PathBuf>,
    events: broadcast::Sender<StoreEvent>,
    extractor: Arc<dyn Extractor>,
}

impl AppState {
    /// Open the persisted store, or start empty.
    ///
    /// A corrupt or unmigratable snapshot is reported and skipped — losing
    /// the snapshot is recoverable, refusing to start is not.
    pub fn open(snapshot_path: PathBuf, extractor: Arc<dyn Extractor>) -> Self {
        let store = match Snapshot::load(&snapshot_path) {
            Ok(Some(snapshot)) => {
                let store = snapshot.into_store();
                tracing::info!(
                    documents = store.documents().len(),
                    datasets = store.datasets().len(),
                    path = %snapshot_path.display(),
                    "Restored store snapshot"
                );
                store
            }
            Ok(None) => {
                tracing::info!(path = %snapshot_path.display(), "No snapshot found, starting empty");
                DocumentStore::new()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %snapshot_path.display(),
                    "Snapshot unreadable, starting empty"
                );
                DocumentStore::new()
            }
        };

        Self::from_store(store, Some(snapshot_path), extractor)
    }

    /// Purely in-memory state for tests — no snapshot file is written.
    pub fn in_memory(extractor: Arc<dyn Extractor>) -> Self {
        Self::from_store(DocumentStore::new(), None, extractor)
    }

    fn from_store(
        store: DocumentStore,
        snapshot_path: Option<PathBuf>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store: RwLock::new(store),
            snapshot_path,
            events,
            extractor,
        }
    }

    // ── Store access ────────────────────────────────────────

    /// Shared read access to the store.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, DocumentStore>, StateError> {
        self.store.read().map_err(|_| StateError::LockPoisoned)
    }

    /// Apply a mutation atomically and persist the snapshot afterwards.
    ///
    /// The closure runs under the write lock, so readers never observe a
    /// half-applied change. Snapshot persistence is write-behind and
    /// best-effort: a failed write is logged, the in-memory state stays
    /// correct, and the next mutation retries.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut DocumentStore) -> T,
    ) -> Result<T, StateError> {
        let mut guard = self.store.write().map_err(|_| StateError::LockPoisoned)?;
        let result = f(&mut guard);

        if let Some(path) = &self.snapshot_path {
            if let Err(e) = Snapshot::capture(&guard).save(path) {
                tracing::warn!(error = %e, path = %path.display(), "Failed to persist snapshot");
            }
        }
        Ok(result)
    }

    // ── Events ──────────────────────────────────────────────

    /// Publish a change notification. Nobody listening is fine.
    pub fn emit(&self, event: StoreEvent) {
        tracing::debug!(event = ?event, "Store event");
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ── Collaborators ───────────────────────────────────────

    pub fn extractor(&self) -> Arc<dyn Extractor> {
        Arc::clone(&self.extractor)
    }
}
