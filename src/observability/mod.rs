//! Observability module providing the retry log sinks and request tracing.

use crate::resilience::RateLimitKind;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sink for the messages emitted while handling rate limited responses.
///
/// The executor calls `warn` exactly once per limited response and `info`
/// exactly once per retry it schedules.
#[cfg_attr(test, mockall::automock)]
pub trait RetryLogger: Send + Sync {
    /// Records an informational message.
    fn info(&self, message: &str);

    /// Records a warning message.
    fn warn(&self, message: &str);
}

/// Default [`RetryLogger`] forwarding to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RetryLogger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "integrations_github_status::retry", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "integrations_github_status::retry", "{}", message);
    }
}

/// Message logged before waiting for the next attempt.
pub fn retry_message(wait_secs: u64) -> String {
    format!("Retrying after {} seconds!", wait_secs)
}

/// Warning logged for every rate limited response.
///
/// `path` is the route template, not the interpolated URL, so that log lines
/// aggregate by endpoint. Returns `None` for a response that is not limited.
pub fn rate_limit_message(kind: RateLimitKind, method: &str, path: &str) -> Option<String> {
    match kind {
        RateLimitKind::Primary => Some(format!(
            "Request quota exhausted for request {} {}",
            method, path
        )),
        RateLimitKind::Secondary => Some(format!(
            "SecondaryRateLimit detected for request {} {}",
            method, path
        )),
        RateLimitKind::None => None,
    }
}

/// Tracing hooks for HTTP requests.
pub struct TracingHooks;

impl TracingHooks {
    /// Logs the start of an API request.
    pub fn on_request_start(method: &str, url: &str, headers: &HashMap<String, String>) {
        let headers: Vec<String> = headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, redact_header(name, value)))
            .collect();
        debug!(
            method = %method,
            url = %url,
            headers = ?headers,
            "GitHub API request started"
        );
    }

    /// Logs the completion of an API request.
    pub fn on_request_complete(method: &str, url: &str, status: u16, duration: Duration) {
        debug!(
            method = %method,
            url = %url,
            status = status,
            duration_ms = duration.as_millis() as u64,
            "GitHub API request completed"
        );
    }
}

/// Sensitive headers that should be redacted in logs.
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Redacts sensitive values in headers.
pub fn redact_header(name: &str, value: &str) -> String {
    if SENSITIVE_HEADERS.contains(&name.to_lowercase().as_str()) {
        "[REDACTED]".to_string()
    } else {
        value.to_string()
    }
}
