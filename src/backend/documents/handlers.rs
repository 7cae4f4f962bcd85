/**
 * Document CRUD Handlers
 *
 * The request/response side-channel clients use before opening a WebSocket:
 * create a document (accepting or assigning an ID) and fetch a stored
 * snapshot by ID. Writes land in the same durable-tier row the sessions
 * read from.
 *
 * Both handlers answer 503 when the durable tier is not configured.
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::DocumentState;

use super::db::{fetch_document, upsert_document, DocumentRow};

/// Request body for POST /api/documents
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    /// Serialized document snapshot
    pub state: String,
    /// Optional client-chosen document ID; a UUID is assigned when absent
    #[serde(default)]
    pub id: Option<String>,
}

/// Response body for POST /api/documents
#[derive(Debug, Clone, Serialize)]
pub struct CreateDocumentResponse {
    pub id: String,
    pub state: String,
}

fn require_pool(db_pool: Option<PgPool>) -> Result<PgPool, BackendError> {
    db_pool.ok_or_else(|| {
        BackendError::handler(
            StatusCode::SERVICE_UNAVAILABLE,
            "durable storage is not configured",
        )
    })
}

/// Fetch a stored document (GET /api/documents/{id})
pub async fn get_document(
    State(db_pool): State<Option<PgPool>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentRow>, BackendError> {
    let pool = require_pool(db_pool)?;

    match fetch_document(&pool, &id).await {
        Ok(Some(row)) => Ok(Json(row)),
        Ok(None) => Err(BackendError::handler(
            StatusCode::NOT_FOUND,
            format!("document '{id}' not found"),
        )),
        Err(err) => {
            tracing::error!("[Documents] fetch failed for {id}: {err}");
            Err(BackendError::storage(err.to_string()))
        }
    }
}

/// Create or overwrite a document (POST /api/documents)
///
/// The supplied `state` must deserialize as a document snapshot; anything
/// else is rejected before it can reach storage.
pub async fn create_document(
    State(db_pool): State<Option<PgPool>>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Json<CreateDocumentResponse>, BackendError> {
    let pool = require_pool(db_pool)?;

    if let Err(err) = serde_json::from_str::<DocumentState>(&request.state) {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            format!("state is not a valid document snapshot: {err}"),
        ));
    }

    let document_id = request
        .id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Err(err) = upsert_document(&pool, &document_id, &request.state).await {
        tracing::error!("[Documents] upsert failed for {document_id}: {err}");
        return Err(BackendError::storage(err.to_string()));
    }

    tracing::info!("[Documents] stored document {document_id}");
    Ok(Json(CreateDocumentResponse {
        id: document_id,
        state: request.state,
    }))
}
