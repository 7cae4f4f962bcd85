//! Backend Module
//!
//! All server-side code for the sketchsync application: an Axum HTTP server
//! hosting per-document WebSocket synchronization sessions with two-tier
//! persistence.
//!
//! # Data Flow
//!
//! ```text
//! client -> gateway -> session.handle_message
//!     -> validate -> mutate authoritative state
//!     -> broadcast to other connections
//!     -> persist (local tier immediately, durable tier debounced)
//! ```
//!
//! On a new connection's SETUP message the flow reverses: the session sends
//! that one client the full current snapshot.
//!
//! # Module Structure
//!
//! - **`server`** - server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`gateway`** - WebSocket upgrade handling and frame relay
//! - **`session`** - the per-document synchronization session (the core)
//! - **`persistence`** - local-tier and durable-tier storage adapters
//! - **`documents`** - document CRUD side-channel
//! - **`error`** - backend-specific error types
//!
//! # Concurrency Model
//!
//! Each document maps to exactly one session instance for its lifetime; the
//! registry enforces this and the per-session mutex serializes message
//! handling, so the authoritative state has exactly one writer and needs no
//! further locking. Sessions for different documents are fully independent.

pub mod documents;
pub mod error;
pub mod gateway;
pub mod persistence;
pub mod routes;
pub mod server;
pub mod session;
