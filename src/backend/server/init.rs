/**
 * Server Initialization
 *
 * Initialization and setup of the Axum HTTP server: configuration, the
 * optional durable-tier pool, the session registry, and the router.
 *
 * # Initialization Process
 *
 * 1. Resolve configuration from the environment
 * 2. Connect the optional durable-tier pool and run migrations
 * 3. Create the session registry (sessions themselves are created lazily,
 *    rehydrated from storage on first access)
 * 4. Assemble the router
 *
 * The function is designed to be resilient: a missing database disables
 * durable persistence but never prevents startup.
 */
use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::session::SessionRegistry;

/// Create and configure the Axum application using environment config.
pub async fn create_app() -> Router<()> {
    create_app_with_config(ServerConfig::from_env()).await
}

/// Create and configure the Axum application from explicit config.
pub async fn create_app_with_config(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing sketchsync backend server");

    let db_pool = load_database().await;

    let sessions = SessionRegistry::new(
        config.data_dir.clone(),
        db_pool.clone(),
        config.debounce_window,
    );
    tracing::info!(
        "Session registry initialized (data dir: {}, debounce: {:?})",
        config.data_dir.display(),
        config.debounce_window
    );

    let app_state = AppState { sessions, db_pool };
    create_router(app_state)
}
