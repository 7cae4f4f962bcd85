/**
 * Database Operations for Document Rows
 *
 * Row-level access to the `documents` table. The WebSocket sessions read
 * and write the same rows through the durable-tier adapter; these helpers
 * back the REST side-channel that clients use before opening a connection.
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// One stored document row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DocumentRow {
    pub document_id: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fetch a document row by ID
///
/// Returns `None` when no row exists.
pub async fn fetch_document(
    pool: &PgPool,
    document_id: &str,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT document_id, state, created_at, updated_at
        FROM documents
        WHERE document_id = $1
        "#,
    )
    .bind(document_id)
    .fetch_optional(pool)
    .await
}

/// Insert or overwrite a document row
pub async fn upsert_document(
    pool: &PgPool,
    document_id: &str,
    state: &str,
) -> Result<(), sqlx::Error> {
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
    .bind(state)
    .execute(pool)
    .await?;

    Ok(())
}
