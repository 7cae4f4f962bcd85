/**
 * Local-Tier Storage
 *
 * The local tier is a fast, session-instance-scoped snapshot store. It is
 * the source of truth when a session is (re)started on the same host: the
 * session reads it once during `initialize` and writes it on every
 * mutation. Operations are awaited but carry no retry logic; there is a
 * single writer by construction.
 *
 * The SQLite implementation keeps one database file per document under the
 * configured data directory, holding the serialized snapshot in a
 * single-slot key/value table.
 */
use std::future::Future;
use std::path::Path;

use sqlx::SqlitePool;

use super::StorageError;
use crate::shared::document::DocumentState;

/// Uniform get/put contract of the local tier
pub trait SnapshotStore: Send + Sync + 'static {
    /// Read the stored snapshot, or `None` when nothing has been written yet.
    fn get(&self) -> impl Future<Output = Result<Option<DocumentState>, StorageError>> + Send;

    /// Overwrite the stored snapshot.
    fn put(
        &self,
        snapshot: &DocumentState,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// SQLite-backed local store, one database file per document
#[derive(Debug, Clone)]
pub struct SqliteLocalStore {
    pool: SqlitePool,
}

impl SqliteLocalStore {
    /// Open (or create) the store for one document
    ///
    /// Creates the data directory and database file if needed and installs
    /// the schema. Uses WAL mode, matching the write-heavy access pattern.
    pub async fn open(data_dir: &Path, document_id: &str) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join(format!("{document_id}.db"));
        let database_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePool::connect(&database_url).await?;
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        sqlx::query("PRAGMA synchronous=NORMAL").execute(&pool).await?;
        sqlx::query(include_str!("schema.sql")).execute(&pool).await?;

        Ok(Self { pool })
    }
}

impl SnapshotStore for SqliteLocalStore {
    async fn get(&self) -> Result<Option<DocumentState>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM snapshot WHERE key = 'state'")
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((value,)) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, snapshot: &DocumentState) -> Result<(), StorageError> {
        let value = serde_json::to_string(snapshot)?;
        sqlx::query(
            r#"
            INSERT INTO snapshot (key, value, updated_at)
            VALUES ('state', ?1, datetime('now'))
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
