/**
 * Session Registry
 *
 * Routes every connection for a document to the same session instance:
 * exactly one `DocumentSession` per document ID for the lifetime of the
 * process. The per-session mutex serializes message handling for one
 * document; sessions for different documents never contend.
 *
 * Creation is lazy. On first access the registry opens the document's
 * local store, loads the durable-tier fallback snapshot, and runs
 * `initialize` exactly once before the session becomes reachable.
 */
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::{Mutex, RwLock};

use crate::backend::error::BackendError;
use crate::backend::persistence::{DurableStore, PgDurableStore, SqliteLocalStore};

use super::document_session::DocumentSession;

/// One live session, shared between all of its connections.
pub type SharedSession = Arc<Mutex<DocumentSession<SqliteLocalStore, PgDurableStore>>>;

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
    data_dir: PathBuf,
    durable: Option<Arc<PgDurableStore>>,
    debounce_window: Duration,
}

impl SessionRegistry {
    pub fn new(data_dir: PathBuf, db_pool: Option<PgPool>, debounce_window: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            data_dir,
            durable: db_pool.map(|pool| Arc::new(PgDurableStore::new(pool))),
            debounce_window,
        }
    }

    /// Resolve the session for a document, creating and initializing it on
    /// first access.
    pub async fn get_or_create(&self, document_id: &str) -> Result<SharedSession, BackendError> {
        if let Some(session) = self.sessions.read().await.get(document_id) {
            return Ok(session.clone());
        }

        let mut sessions = self.sessions.write().await;
        // Re-check: another connection may have created it while we waited
        // for the write lock.
        if let Some(session) = sessions.get(document_id) {
            return Ok(session.clone());
        }

        let local = SqliteLocalStore::open(&self.data_dir, document_id)
            .await
            .map_err(|err| {
                BackendError::storage(format!(
                    "cannot open local store for '{document_id}': {err}"
                ))
            })?;

        let fallback = match &self.durable {
            Some(durable) => durable.load(document_id).await.unwrap_or_else(|err| {
                tracing::warn!("[SessionRegistry] durable load failed for {document_id}: {err}");
                None
            }),
            None => None,
        };

        let mut session = DocumentSession::new(
            document_id.to_string(),
            Arc::new(local),
            self.durable.clone(),
            self.debounce_window,
        );
        session.initialize(fallback).await;
        tracing::info!("[SessionRegistry] session created for document {document_id}");

        let session = Arc::new(Mutex::new(session));
        sessions.insert(document_id.to_string(), session.clone());
        Ok(session)
    }

    /// Number of live sessions, for diagnostics.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
