/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server. These
 * errors are used in HTTP handlers and can be converted to HTTP responses.
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::ProtocolError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g., missing row, invalid request body)
    #[error("Handler error: {message}")]
    Handler {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Storage error (local store unavailable, durable query failed)
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message
        message: String,
    },

    /// Wire-protocol error (from the shared codec)
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Handler {
            status,
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Handler { status, .. } => *status,
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Protocol(_) => StatusCode::BAD_REQUEST,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Handler { message, .. } => message.clone(),
            Self::Storage { message } => message.clone(),
            Self::Protocol(err) => err.to_string(),
            Self::Serialization(err) => err.to_string(),
        }
    }
}
