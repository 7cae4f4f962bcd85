/**
 * Durable-Tier Storage
 *
 * The durable tier is a networked, document-ID-keyed snapshot store. It is
 * the source of truth on cold start (no local snapshot) and the system of
 * record across session restarts and relocations. Writes are upserts; a
 * missing row reads back as `None`, not an error.
 *
 * The durable tier is a best-effort replication target, not a transaction
 * participant: callers log and swallow write failures, and the local tier
 * remains authoritative for the running session regardless of the outcome
 * here.
 */
use std::future::Future;

use sqlx::PgPool;

use super::StorageError;
use crate::shared::document::DocumentState;

/// Uniform load/persist contract of the durable tier
pub trait DurableStore: Send + Sync + 'static {
    /// Load the snapshot for a document, or `None` when no row exists.
    fn load(
        &self,
        document_id: &str,
    ) -> impl Future<Output = Result<Option<DocumentState>, StorageError>> + Send;

    /// Upsert the snapshot for a document
    ///
    /// A snapshot with zero elements is treated as a suspicious no-op and
    /// skipped with a warning, so a previously saved non-empty snapshot is
    /// never clobbered by an accidentally-empty one.
    fn persist(
        &self,
        document_id: &str,
        snapshot: &DocumentState,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// PostgreSQL-backed durable store over the `documents` table
#[derive(Debug, Clone)]
pub struct PgDurableStore {
    pool: PgPool,
}

impl PgDurableStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DurableStore for PgDurableStore {
    async fn load(&self, document_id: &str) -> Result<Option<DocumentState>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT state FROM documents WHERE document_id = $1")
                .bind(document_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((state,)) => Ok(Some(serde_json::from_str(&state)?)),
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
        sqlx::query(
            r#"
            INSERT INTO documents (document_id, state, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (document_id) DO UPDATE SET
                state = EXCLUDED.state,
                updated_at = NOW()
            "#,
        )
        .bind(document_id)
        .bind(&state)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
