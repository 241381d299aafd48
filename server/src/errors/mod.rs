//! Global application error types and handlers.
//!
//! This module defines custom error types that are used across the entire
//! backend application and provides mechanisms for consistent error handling
//! and response formatting.

use thiserror::Error;

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed request fields. Maps to HTTP 400.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Bad credentials, invalid or expired token, or unknown token subject.
    /// Maps to HTTP 401. The message is deliberately generic so callers
    /// cannot distinguish a wrong password from an unknown email.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    /// Unexpected internal failure. Maps to HTTP 500; the detail is logged
    /// server-side and never returned to the client.
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
