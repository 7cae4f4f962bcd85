/**
 * Server Configuration
 *
 * Configuration is loaded from environment variables, with sensible
 * defaults for local development. Configuration errors are logged but do
 * not prevent server startup: services that fail to initialize are set to
 * `None` and the server continues without them.
 *
 * # Environment Variables
 *
 * - `DATABASE_URL` - PostgreSQL connection string for the durable tier
 *   (optional; durable persistence is disabled when absent)
 * - `SERVER_PORT` - listen port (default 3000)
 * - `SKETCHSYNC_DATA_DIR` - local-tier directory (default: platform data
 *   dir, else the temp dir)
 * - `SYNC_DEBOUNCE_MS` - durable write-back debounce window (default 5000)
 */
use std::path::PathBuf;
use std::time::Duration;

use sqlx::PgPool;

use crate::backend::session::DEFAULT_DEBOUNCE_WINDOW;

/// Runtime configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding the local-tier SQLite files
    pub data_dir: PathBuf,
    /// Trailing window for the debounced durable write
    pub debounce_window: Duration,
    /// HTTP listen port
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("SKETCHSYNC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let debounce_window = std::env::var("SYNC_DEBOUNCE_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE_WINDOW);

        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        Self {
            data_dir,
            debounce_window,
            port,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sketchsync")
}

/// Load and initialize the durable-tier connection pool
///
/// Reads `DATABASE_URL`, connects, and runs migrations. Returns `None` on
/// any failure, allowing the server to run without durable persistence.
pub async fn load_database() -> Option<PgPool> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Durable persistence will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!("Failed to create database connection pool: {err:?}");
            tracing::warn!("Durable persistence will be disabled.");
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(err) => {
            // Migrations might have already been run by another instance
            tracing::error!("Failed to run database migrations: {err:?}");
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}
