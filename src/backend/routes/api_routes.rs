/**
 * API Route Configuration
 *
 * The document CRUD side-channel, consumed by clients before opening a
 * WebSocket connection.
 */
use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::documents::{create_document, get_document};
use crate::backend::server::state::AppState;

/// Add the /api/documents routes to the router.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/documents", post(create_document))
        .route("/api/documents/{id}", get(get_document))
}
