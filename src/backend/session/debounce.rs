/**
 * Debounced Durable Write
 *
 * A single-slot deferred-task holder owned by each document session. Every
 * `schedule` call replaces any pending write, so a burst of mutations
 * within the window produces exactly one durable-tier write, carrying the
 * state as of the last mutation, firing once after the window elapses with
 * no further activity. `cancel` aborts the pending write; the session's
 * `flush` cancels and writes immediately instead.
 */
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::backend::persistence::DurableStore;
use crate::shared::document::DocumentState;

/// Default trailing window between the last mutation and the durable write.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(5000);

#[derive(Debug)]
pub struct DebouncedWrite {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedWrite {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace any pending write with a fresh one carrying this snapshot.
    pub fn schedule<D: DurableStore>(
        &mut self,
        store: Arc<D>,
        document_id: String,
        snapshot: DocumentState,
    ) {
        self.cancel();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if let Err(err) = store.persist(&document_id, &snapshot).await {
                tracing::warn!("[DebouncedWrite] durable persist failed for {document_id}: {err}");
            }
        }));
    }

    /// Abort the pending write, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for DebouncedWrite {
    fn drop(&mut self) {
        self.cancel();
    }
}
