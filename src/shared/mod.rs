//! Shared Types Module
//!
//! Types shared between the server and its clients: the document data model,
//! drawable element types, the wire-protocol message codec, and protocol
//! error types.
//!
//! # Module Structure
//!
//! - **`document`** - Document snapshot and text body types
//! - **`element`** - Drawable element types and the update patch
//! - **`protocol`** - Message codec and validator for WebSocket frames
//! - **`error`** - Protocol error types

pub mod document;
pub mod element;
pub mod error;
pub mod protocol;

// Re-export commonly used types
pub use document::{DocumentState, TextDelta, TextState};
pub use element::{Element, ElementShape, Geometry, Matrix4, PathProperties, PropertiesPatch};
pub use error::ProtocolError;
pub use protocol::{
    decode_client_message, ClientMessage, DeleteSelection, ElementUpdate, MessageCommand,
    MessageType, OutboundMessage,
};
