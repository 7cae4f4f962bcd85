//! Storage Adapters Module
//!
//! Two independent persistence backends sit behind every document session:
//!
//! - the **local tier** (`SnapshotStore`) - a low-latency store scoped to one
//!   session instance, authoritative on warm restart;
//! - the **durable tier** (`DurableStore`) - a networked store keyed by
//!   document ID, authoritative on cold start and the system of record
//!   across session relocations.
//!
//! Both expose a uniform get/put contract over a serialized document
//! snapshot. Adapters receive copies of session state and never hold a
//! mutable alias into it. Write failures on the durable tier are advisory:
//! they are logged by callers and never roll back an in-memory mutation or a
//! local-tier write.
//!
//! # Module Structure
//!
//! - **`local`** - `SnapshotStore` trait and the SQLite-backed local tier
//! - **`durable`** - `DurableStore` trait and the PostgreSQL-backed durable tier
//! - **`memory`** - in-process adapters for tests and storage-less runs

pub mod durable;
pub mod local;
pub mod memory;

pub use durable::{DurableStore, PgDurableStore};
pub use local::{SnapshotStore, SqliteLocalStore};
pub use memory::{MemoryDurableStore, MemorySnapshotStore};

use thiserror::Error;

/// Errors surfaced at the storage adapter boundary
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted snapshot could not be (de)serialized
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure while preparing the local store
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
