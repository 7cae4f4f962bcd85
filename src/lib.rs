//! SketchSync - Main Library
//!
//! SketchSync is a collaborative drawing/document server. Multiple clients
//! connect to a shared document over WebSockets, mutate a shared element list
//! and a shared text body, and see each other's changes in near-real time.
//! Document state survives process restarts through two tiers of persistence:
//! a fast local SQLite store and a slower durable PostgreSQL store.
//!
//! # Module Structure
//!
//! The library is organized into two main modules:
//!
//! - **`shared`** - Types shared between the server and its clients
//!   - Element and document snapshot types
//!   - The wire-protocol message codec and validator
//!   - Protocol error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server with the WebSocket connection gateway
//!   - Per-document synchronization sessions
//!   - Local-tier and durable-tier storage adapters
//!   - Document CRUD side-channel routes

pub mod backend;
pub mod shared;
