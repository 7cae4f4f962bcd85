/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction, so handlers can extract just
 * the part of the state they need.
 *
 * # Thread Safety
 *
 * - `SessionRegistry` is internally synchronized and cheap to clone
 * - `Option<PgPool>` is a handle to a shared connection pool; `None` when
 *   the durable tier is not configured
 */
use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::session::SessionRegistry;

/// Application state shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    /// One-session-per-document routing for WebSocket connections
    pub sessions: SessionRegistry,

    /// Durable-tier connection pool
    ///
    /// `None` when `DATABASE_URL` is not set; handlers degrade gracefully.
    pub db_pool: Option<PgPool>,
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
