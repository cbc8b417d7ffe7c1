//! HTTP transport layer for the commit status client.
//!
//! The transport sends exactly one request and reports exactly one response.
//! It never retries; rate limit handling lives in [`crate::resilience`].

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

use std::time::Duration;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}
