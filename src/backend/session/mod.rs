//! Document Session Module
//!
//! The core of the server: the per-document synchronization session. A
//! session owns the authoritative in-memory state for one document, accepts
//! concurrent client connections, validates and applies incoming mutation
//! messages, rebroadcasts them to the other connected clients, and persists
//! state to the two storage tiers with a debounced durable write-back.
//!
//! # Module Structure
//!
//! - **`document_session`** - the session itself (validate -> mutate ->
//!   broadcast -> persist)
//! - **`registry`** - one-session-per-document routing
//! - **`debounce`** - the single-slot deferred durable write

pub mod debounce;
pub mod document_session;
pub mod registry;

// Re-export commonly used types
pub use debounce::{DebouncedWrite, DEFAULT_DEBOUNCE_WINDOW};
pub use document_session::{ClientId, ClientSender, DocumentSession, Frame};
pub use registry::{SessionRegistry, SharedSession};
