//! Server Module
//!
//! Server initialization, application state, and configuration.
//!
//! # Module Structure
//!
//! - **`init`** - application assembly (`create_app`)
//! - **`state`** - `AppState` and state extraction impls
//! - **`config`** - environment configuration and database loading

pub mod config;
pub mod init;
pub mod state;

pub use config::ServerConfig;
pub use init::{create_app, create_app_with_config};
pub use state::AppState;
