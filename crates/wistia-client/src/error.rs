//! Error types for the API client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Status reported when a request failed before any response arrived.
///
/// Older releases collapsed every response-less failure into this code, and
/// [`ApiError::descriptor`] keeps doing so for callers that match on it.
pub const NO_RESPONSE_STATUS: u16 = 404;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API answered with a client error (4xx)
    #[error("API client error ({status})")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The API answered with a server error or another non-success status
    #[error("API server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The request failed before a response was received
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Unknown response format name
    #[error("Unsupported format: {0} (expected json or xml)")]
    InvalidFormat(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        if (400..500).contains(&status) {
            Self::Status { status }
        } else {
            Self::Server {
                status,
                message: message.into(),
            }
        }
    }

    /// HTTP status carried by the error, if the API responded
    ///
    /// Transport errors never carry one: they are only produced when no
    /// response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { status, .. } if *status >= 500)
    }

    /// Coarse `{status: code}` view of a recovered request failure.
    ///
    /// Client errors report their own status. Transport failures report
    /// [`NO_RESPONSE_STATUS`]. Everything else (server errors, decode and
    /// configuration failures) has no descriptor.
    #[must_use]
    pub fn descriptor(&self) -> Option<ErrorDescriptor> {
        match self {
            Self::Status { status } => Some(ErrorDescriptor { status: *status }),
            Self::Transport(_) => Some(ErrorDescriptor {
                status: NO_RESPONSE_STATUS,
            }),
            _ => None,
        }
    }
}

/// Serializes to exactly `{"status": <code>}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// HTTP status code
    pub status: u16,
}
