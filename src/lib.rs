//! # GitHub Commit Status Client
//!
//! A client for setting commit statuses through the GitHub REST API with:
//! - Validation of the requested state before anything is sent
//! - Automatic retries for primary (quota) and secondary (abuse) rate limits
//! - Exact, aggregatable retry log messages
//! - An injectable HTTP transport for testing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_github_status::{setup_client, CommitStatusRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = setup_client("ghp_xxxxxxxxxxxx")?;
//!
//!     let request = CommitStatusRequest::new("octocat", "hello-world", "6dcb09b", "success")
//!         .context("ci/build")
//!         .description("Build passed");
//!     client.set_commit_status(&request).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod types;

// Authentication
pub mod auth;

// HTTP client and transport
pub mod client;
pub mod transport;

// API Services
pub mod services;

// Rate limit handling
pub mod resilience;

// Observability
pub mod observability;

// Mocks for testing
pub mod mocks;

// Re-exports for convenience
pub use auth::AuthMethod;
pub use client::{setup_client, StatusClient, StatusClientBuilder};
pub use config::{GitHubConfig, GitHubConfigBuilder, RetryConfig};
pub use errors::{GitHubError, GitHubErrorKind, GitHubResult};
pub use observability::{RetryLogger, TracingLogger};
pub use resilience::{RateLimitKind, RateLimitSignal, RequestExecutor};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::*;
