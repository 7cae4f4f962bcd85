/**
 * In-Memory Storage Adapters
 *
 * In-process implementations of both storage tiers. They hold serialized
 * snapshots, like the real adapters, so the isolation contract (stores
 * receive copies, never a mutable alias into session state) is exercised in
 * tests exactly as in production.
 */
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::durable::DurableStore;
use super::local::SnapshotStore;
use super::StorageError;
use crate::shared::document::DocumentState;

/// In-memory local-tier store
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn get(&self) -> Result<Option<DocumentState>, StorageError> {
        let slot = self.slot.lock().expect("snapshot slot poisoned");
        match slot.as_deref() {
            Some(value) => Ok(Some(serde_json::from_str(value)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, snapshot: &DocumentState) -> Result<(), StorageError> {
        let value = serde_json::to_string(snapshot)?;
        *self.slot.lock().expect("snapshot slot poisoned") = Some(value);
        Ok(())
    }
}

/// In-memory durable-tier store
///
/// Tracks the number of completed writes, which lets tests observe debounce
/// coalescing.
#[derive(Debug, Default)]
pub struct MemoryDurableStore {
    rows: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persist calls that actually wrote a row.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl DurableStore for MemoryDurableStore {
    async fn load(&self, document_id: &str) -> Result<Option<DocumentState>, StorageError> {
        let rows = self.rows.lock().expect("durable rows poisoned");
        match rows.get(document_id) {
            Some(state) => Ok(Some(serde_json::from_str(state)?)),
            None => Ok(None),
        }
    }

    async fn persist(
        &self,
        document_id: &str,
        snapshot: &DocumentState,
    ) -> Result<(), StorageError> {
        if snapshot.elements.is_empty() {
            tracing::warn!(
                "[DurableStore] no state elements to persist for {document_id}, skipping"
            );
            return Ok(());
        }

        let state = serde_json::to_string(snapshot)?;
        self.rows
            .lock()
            .expect("durable rows poisoned")
            .insert(document_id.to_string(), state);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
