//! Classification of limited responses.

use crate::transport::HttpResponse;

/// Header carrying the remaining primary quota.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Header carrying the number of seconds to wait.
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// Status code GitHub uses for both rate limits.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Which limit a response hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitKind {
    /// Quota exhausted.
    Primary,
    /// Burst or abuse detection.
    Secondary,
    /// Not rate limited.
    None,
}

/// Rate limit signal derived from a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSignal {
    /// Limit kind.
    pub kind: RateLimitKind,
    /// Seconds to wait before the next attempt.
    pub retry_after_secs: u64,
}

impl RateLimitSignal {
    /// Signal for a response that is not rate limited.
    pub const NONE: Self = Self {
        kind: RateLimitKind::None,
        retry_after_secs: 0,
    };

    /// Returns true if the response hit either limit.
    pub fn is_limited(&self) -> bool {
        self.kind != RateLimitKind::None
    }
}

/// Classifies a response.
///
/// A 429 with `X-RateLimit-Remaining: 0` is a primary limit; any other 429
/// is a secondary limit. A missing or unparsable `Retry-After` means no wait.
pub fn classify(response: &HttpResponse) -> RateLimitSignal {
    if response.status != TOO_MANY_REQUESTS {
        return RateLimitSignal::NONE;
    }

    let quota_exhausted = response
        .header(RATE_LIMIT_REMAINING_HEADER)
        .and_then(|v| v.trim().parse::<u64>().ok())
        == Some(0);

    let retry_after_secs = response
        .header(RETRY_AFTER_HEADER)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);

    RateLimitSignal {
        kind: if quota_exhausted {
            RateLimitKind::Primary
        } else {
            RateLimitKind::Secondary
        },
        retry_after_secs,
    }
}
