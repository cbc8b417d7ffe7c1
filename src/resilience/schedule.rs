//! Retry scheduling for limited responses.

use super::classify::RateLimitSignal;
use std::time::Duration;

/// Attempts made so far within one logical call.
///
/// Every call to the executor starts from a fresh state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
}

impl RetryState {
    /// Creates a fresh state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of limited responses seen so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Records another limited response.
    pub fn record_limited(&mut self) {
        self.attempts += 1;
    }
}

/// What to do after a limited response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    /// Whether another attempt is permitted.
    pub proceed: bool,
    /// How long to wait before it.
    pub wait: Duration,
}

impl RetryDecision {
    /// Decision for an exhausted retry budget.
    pub const EXHAUSTED: Self = Self {
        proceed: false,
        wait: Duration::ZERO,
    };
}

/// Decides whether to retry a limited response.
///
/// A zero wait still proceeds; only an exhausted budget stops the call.
pub fn schedule(state: &RetryState, signal: &RateLimitSignal, max_retries: u32) -> RetryDecision {
    if state.attempts() >= max_retries {
        return RetryDecision::EXHAUSTED;
    }

    RetryDecision {
        proceed: true,
        wait: Duration::from_secs(signal.retry_after_secs),
    }
}
