//! Protocol Error Types
//!
//! This module defines the error values produced when an inbound frame fails
//! to decode or validate. A protocol error is data, not control flow: the
//! codec returns it to the caller, which turns it into an ERROR reply to the
//! sending client. Decoding never panics and never tears down a connection.
//!
//! # Error Categories
//!
//! - `MalformedFrame` - the frame is not valid JSON
//! - `SchemaViolation` - the frame parsed but a payload field has the wrong shape
//! - `Unrecognized` - an unknown `type`/`command` combination
use thiserror::Error;

/// Failure values produced by the message codec and validator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame is not parseable JSON
    #[error("Invalid message format: {message}")]
    MalformedFrame {
        /// Human-readable error message
        message: String,
    },

    /// The frame parsed but its payload does not match the expected shape
    #[error("Invalid payload for '{field}': {message}")]
    SchemaViolation {
        /// The message part that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The `type`/`command` combination is not part of the protocol
    #[error("Unrecognized message: {message}")]
    Unrecognized {
        /// Human-readable error message
        message: String,
    },
}

impl ProtocolError {
    /// Create a new malformed-frame error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedFrame {
            message: message.into(),
        }
    }

    /// Create a new schema-violation error
    pub fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unrecognized-message error
    pub fn unrecognized(message: impl Into<String>) -> Self {
        Self::Unrecognized {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(format!("JSON error: {}", err))
    }
}
