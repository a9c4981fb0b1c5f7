//! Error types for the WebHCat client.

use std::time::Duration;

/// HTTP status WebHCat uses to signal that a host is too busy to serve.
pub const SERVER_BUSY: u16 = 503;

/// Errors that can occur when using the WebHCat client.
///
/// Non-2xx responses are reported as [`ClientError::Status`] without any
/// per-status translation, so service-specific codes such as `10241`
/// ("table is not partitioned") reach the caller untouched.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, body read, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error raised by the middleware stack wrapping the HTTP client
    #[error("HTTP request error: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// The server answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// WebHCat `errorCode` from the error body, if any
        error_code: Option<i64>,
        /// Error message from the server
        message: String,
        /// Parsed `Retry-After` header, if the server sent one
        retry_after: Option<Duration>,
    },

    /// Response body was not the JSON we expected
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A field the operation projects out of the response was absent
    #[error("Response is missing field '{field}'")]
    MissingField {
        /// Name of the missing JSON field
        field: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::HttpMiddleware(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Service-level error code.
    ///
    /// Prefers WebHCat's `errorCode` body field and falls back to the HTTP
    /// status.
    pub fn code(&self) -> Option<i64> {
        match self {
            ClientError::Status { error_code, .. } if error_code.is_some() => *error_code,
            _ => self.status().map(i64::from),
        }
    }

    /// Returns true if the host reported itself busy (HTTP 503).
    ///
    /// This is the only condition that triggers host failover.
    pub fn is_server_busy(&self) -> bool {
        self.status() == Some(SERVER_BUSY)
    }

    /// Returns the `Retry-After` hint if the server sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ClientError::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
