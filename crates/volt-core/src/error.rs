//! # Edge Error Types
//!
//! Typed error handling for the voltgate payment edge.
//! All edge operations return `Result<T, EdgeError>`.
//!
//! Every variant maps to a machine-readable `error` tag and an HTTP status,
//! so handlers can convert errors into uniform response envelopes without
//! leaking upstream stack traces or crypto internals to the caller.

use thiserror::Error;

/// Core error type for all edge operations
#[derive(Debug, Error)]
pub enum EdgeError {
    /// Server-side configuration fault (missing secret, bad deployment)
    #[error("{0}")]
    Configuration(String),

    /// Caller-supplied data fails a structural or business rule
    #[error("{0}")]
    Validation(String),

    /// Missing credentials on the initiate path
    #[error("{0}")]
    Authentication(String),

    /// Malformed or missing data on the webhook path
    #[error("{0}")]
    BadRequest(String),

    /// Signature present but does not verify
    #[error("{0}")]
    Unauthorized(String),

    /// Backend rejected the request; status passes through to the caller
    #[error("{message}")]
    BackendRejected { status: u16, message: String },

    /// Backend returned a malformed success (contract violated)
    #[error("{0}")]
    BackendContract(String),

    /// Network-level failure talking to the backend
    #[error("{0}")]
    Network(String),

    /// Wrong HTTP verb
    #[error("{0}")]
    MethodNotAllowed(String),

    /// Uncaught local fault, degraded to a generic message
    #[error("{0}")]
    Internal(String),
}

impl EdgeError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            EdgeError::Configuration(_) => 500,
            EdgeError::Validation(_) => 400,
            EdgeError::Authentication(_) => 401,
            EdgeError::BadRequest(_) => 400,
            EdgeError::Unauthorized(_) => 401,
            EdgeError::BackendRejected { status, .. } => *status,
            EdgeError::BackendContract(_) => 502,
            EdgeError::Network(_) => 500,
            EdgeError::MethodNotAllowed(_) => 405,
            EdgeError::Internal(_) => 500,
        }
    }

    /// Returns the machine-readable `error` tag for the response envelope
    pub fn error_tag(&self) -> &'static str {
        match self {
            EdgeError::Configuration(_) => "Internal Server Error",
            EdgeError::Validation(_) => "Validation Error",
            EdgeError::Authentication(_) => "Authentication Error",
            EdgeError::BadRequest(_) => "Bad Request",
            EdgeError::Unauthorized(_) => "Unauthorized",
            EdgeError::BackendRejected { .. } => "Backend Error",
            EdgeError::BackendContract(_) => "Backend Error",
            EdgeError::Network(_) => "Backend Error",
            EdgeError::MethodNotAllowed(_) => "Method Not Allowed",
            EdgeError::Internal(_) => "Internal Server Error",
        }
    }

    /// Returns true if this error was caused by the upstream backend
    pub fn is_backend_fault(&self) -> bool {
        matches!(
            self,
            EdgeError::BackendRejected { .. }
                | EdgeError::BackendContract(_)
                | EdgeError::Network(_)
        )
    }
}

/// Result type alias for edge operations
pub type EdgeResult<T> = Result<T, EdgeError>;
