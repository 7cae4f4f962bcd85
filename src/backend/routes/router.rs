/**
 * Router Configuration
 *
 * Combines all route configurations into a single Axum router.
 *
 * # Route Details
 *
 * - `GET /ws/{document_id}` - WebSocket upgrade into a document session
 * - `GET /api/documents/{id}` - fetch a stored document snapshot
 * - `POST /api/documents` - create or overwrite a document
 *
 * Every route sits behind a permissive CORS layer; unknown routes fall
 * through to a 404 handler.
 */
use axum::{http::StatusCode, Router};
use tower_http::cors::CorsLayer;

use crate::backend::gateway::handle_ws_upgrade;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/ws/{document_id}", axum::routing::get(handle_ws_upgrade));

    // Add document CRUD routes
    let router = configure_api_routes(router);

    let router = router
        .layer(CorsLayer::permissive())
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") });

    router.with_state(app_state)
}
