//! Error types for the commit status client.

use crate::resilience::RateLimitKind;
use crate::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Result type alias for commit status operations.
pub type GitHubResult<T> = Result<T, GitHubError>;

/// Error kinds for categorizing client errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubErrorKind {
    // Configuration errors
    /// Missing authentication configuration.
    MissingAuth,
    /// Invalid base URL.
    InvalidBaseUrl,
    /// Invalid configuration.
    InvalidConfiguration,

    // Request errors
    /// Request validation failed before anything was sent.
    ValidationError,
    /// Invalid parameter.
    InvalidParameter,

    // Upstream errors
    /// Bad credentials (401).
    BadCredentials,
    /// Access forbidden (403).
    Forbidden,
    /// Resource not found (404).
    NotFound,
    /// Unprocessable entity (422).
    UnprocessableEntity,

    // Rate limit errors
    /// Primary rate limit retries exhausted.
    PrimaryRateLimitExceeded,
    /// Secondary rate limit retries exhausted.
    SecondaryRateLimitExceeded,

    // Network errors
    /// Connection failed.
    ConnectionFailed,
    /// Request timeout.
    Timeout,

    // Server errors
    /// Internal server error (500).
    InternalError,
    /// Bad gateway (502).
    BadGateway,
    /// Service unavailable (503).
    ServiceUnavailable,

    // Generic
    /// Unknown error.
    Unknown,
}

impl fmt::Display for GitHubErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAuth => write!(f, "missing_auth"),
            Self::InvalidBaseUrl => write!(f, "invalid_base_url"),
            Self::InvalidConfiguration => write!(f, "invalid_configuration"),
            Self::ValidationError => write!(f, "validation_error"),
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::BadCredentials => write!(f, "bad_credentials"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::UnprocessableEntity => write!(f, "unprocessable_entity"),
            Self::PrimaryRateLimitExceeded => write!(f, "primary_rate_limit_exceeded"),
            Self::SecondaryRateLimitExceeded => write!(f, "secondary_rate_limit_exceeded"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::InternalError => write!(f, "internal_error"),
            Self::BadGateway => write!(f, "bad_gateway"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Commit status client error with detailed information.
#[derive(Error, Debug)]
pub struct GitHubError {
    /// Error kind.
    kind: GitHubErrorKind,
    /// Error message, ready for display to an end user.
    message: String,
    /// HTTP status code.
    status_code: Option<u16>,
    /// GitHub request ID.
    request_id: Option<String>,
    /// Number of attempts made before giving up (rate limit errors only).
    attempts: Option<u32>,
    /// Underlying cause.
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = self.status_code {
            write!(f, " (HTTP {})", code)?;
        }
        if let Some(ref id) = self.request_id {
            write!(f, " [request_id: {}]", id)?;
        }
        Ok(())
    }
}

impl GitHubError {
    /// Creates a new error.
    pub fn new(kind: GitHubErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            request_id: None,
            attempts: None,
            cause: None,
        }
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the GitHub request ID.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the number of attempts made.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &GitHubErrorKind {
        &self.kind
    }

    /// Gets the error message without the kind or status decoration.
    ///
    /// For upstream and rate limit errors this is the raw response body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the HTTP status code.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the request ID.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Gets the number of attempts made, if recorded.
    pub fn attempts(&self) -> Option<u32> {
        self.attempts
    }

    /// Creates an error from an HTTP status code and the raw response body.
    pub fn from_response(status: u16, body: String, request_id: Option<String>) -> Self {
        let kind = Self::kind_from_status(status);
        let mut error = Self::new(kind, body).with_status(status);

        if let Some(id) = request_id {
            error = error.with_request_id(id);
        }

        error
    }

    /// Maps HTTP status code to error kind.
    fn kind_from_status(status: u16) -> GitHubErrorKind {
        match status {
            400 => GitHubErrorKind::InvalidParameter,
            401 => GitHubErrorKind::BadCredentials,
            403 => GitHubErrorKind::Forbidden,
            404 => GitHubErrorKind::NotFound,
            422 => GitHubErrorKind::UnprocessableEntity,
            500 => GitHubErrorKind::InternalError,
            502 => GitHubErrorKind::BadGateway,
            503 => GitHubErrorKind::ServiceUnavailable,
            _ => GitHubErrorKind::Unknown,
        }
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::InvalidConfiguration, message)
    }

    /// Creates a local validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(GitHubErrorKind::ValidationError, message)
    }

    /// Creates the terminal error for an exhausted rate limit retry budget.
    ///
    /// The message is the raw body of the last 429 response. A signal that is
    /// not limited has no rate limit kind and maps to `Unknown`.
    pub fn rate_limit_exhausted(kind: RateLimitKind, body: String, attempts: u32) -> Self {
        let kind = match kind {
            RateLimitKind::Primary => GitHubErrorKind::PrimaryRateLimitExceeded,
            RateLimitKind::Secondary => GitHubErrorKind::SecondaryRateLimitExceeded,
            RateLimitKind::None => GitHubErrorKind::Unknown,
        };
        Self::new(kind, body).with_status(429).with_attempts(attempts)
    }

    /// Wraps a transport failure, keeping it as the source.
    pub fn from_transport(error: TransportError) -> Self {
        let kind = match error {
            TransportError::Connection { .. } => GitHubErrorKind::ConnectionFailed,
            TransportError::Timeout { .. } => GitHubErrorKind::Timeout,
            _ => GitHubErrorKind::Unknown,
        };
        let message = format!("Request failed: {}", error);
        Self::new(kind, message).with_cause(error)
    }
}

impl From<TransportError> for GitHubError {
    fn from(error: TransportError) -> Self {
        Self::from_transport(error)
    }
}

/// Checks if an error is a rate limit error.
pub fn is_rate_limit_error(error: &GitHubError) -> bool {
    matches!(
        error.kind(),
        GitHubErrorKind::PrimaryRateLimitExceeded | GitHubErrorKind::SecondaryRateLimitExceeded
    )
}
