//! Rate limit handling for outgoing requests.
//!
//! Three pieces cooperate here:
//! - [`classify`] turns a response into a [`RateLimitSignal`]
//! - [`schedule`] decides, from the [`RetryState`], whether to try again
//! - [`RequestExecutor`] drives the transport until the call resolves

mod classify;
mod executor;
mod schedule;

pub use classify::{
    classify, RateLimitKind, RateLimitSignal, RATE_LIMIT_REMAINING_HEADER, RETRY_AFTER_HEADER,
    TOO_MANY_REQUESTS,
};
pub use executor::RequestExecutor;
pub use schedule::{schedule, RetryDecision, RetryState};
