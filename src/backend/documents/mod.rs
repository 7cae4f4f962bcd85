//! Document CRUD Module
//!
//! The REST side-channel for creating documents and fetching stored
//! snapshots, outside the WebSocket protocol. Peripheral to the sync core
//! but it writes to the same durable-tier rows the sessions read from.
//!
//! # Module Structure
//!
//! - **`handlers`** - HTTP handlers for GET/POST /api/documents
//! - **`db`** - row-level access to the `documents` table

pub mod db;
pub mod handlers;

pub use handlers::{create_document, get_document};
