//! Request executor retrying rate limited responses.

use super::classify::classify;
use super::schedule::{schedule, RetryState};
use crate::errors::{GitHubError, GitHubResult};
use crate::observability::{rate_limit_message, retry_message, RetryLogger};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::Route;
use std::fmt;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, debug_span, Instrument};
use uuid::Uuid;

/// Sends a request, retrying while the response is rate limited.
///
/// The executor holds no per-call state, so one instance can serve any
/// number of concurrent calls.
pub struct RequestExecutor {
    max_retries: u32,
    logger: Arc<dyn RetryLogger>,
}

impl RequestExecutor {
    /// Creates a new executor allowing `max_retries` retries after the first attempt.
    pub fn new(max_retries: u32, logger: Arc<dyn RetryLogger>) -> Self {
        Self {
            max_retries,
            logger,
        }
    }

    /// Gets the retry budget.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Executes one logical call.
    ///
    /// Any response that is not a 429 is returned unchanged, whatever its
    /// status. Transport errors are returned without retrying. Once the retry
    /// budget is spent the final 429 body becomes the error message.
    pub async fn execute(
        &self,
        transport: &dyn HttpTransport,
        route: &Route,
        request: HttpRequest,
    ) -> GitHubResult<HttpResponse> {
        let span = debug_span!(
            "rate_limited_request",
            call_id = %Uuid::new_v4(),
            method = %route.method,
            route = route.template,
        );

        self.run(transport, route, request).instrument(span).await
    }

    async fn run(
        &self,
        transport: &dyn HttpTransport,
        route: &Route,
        request: HttpRequest,
    ) -> GitHubResult<HttpResponse> {
        let mut state = RetryState::new();

        loop {
            let response = transport.send(request.clone()).await?;

            let signal = classify(&response);
            let warning =
                match rate_limit_message(signal.kind, route.method.as_str(), route.template) {
                    Some(warning) => warning,
                    None => {
                        debug!(
                            status = response.status,
                            retries = state.attempts(),
                            "Request resolved"
                        );
                        return Ok(response);
                    }
                };

            self.logger.warn(&warning);

            let decision = schedule(&state, &signal, self.max_retries);
            if !decision.proceed {
                let attempts = state.attempts() + 1;
                debug!(attempts, "Rate limit retries exhausted");
                return Err(GitHubError::rate_limit_exhausted(
                    signal.kind,
                    response.text(),
                    attempts,
                ));
            }

            self.logger.info(&retry_message(signal.retry_after_secs));
            state.record_limited();
            sleep(decision.wait).await;
        }
    }
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitHubErrorKind;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::observability::MockRetryLogger;
    use crate::types::STATUSES_ROUTE;
    use mockall::Sequence;
    use std::time::Duration;
    use tokio::time::Instant;

    const PRIMARY_WARNING: &str =
        "Request quota exhausted for request POST /repos/{owner}/{repo}/statuses/{sha}";
    const SECONDARY_WARNING: &str =
        "SecondaryRateLimit detected for request POST /repos/{owner}/{repo}/statuses/{sha}";

    fn request() -> HttpRequest {
        HttpRequest::post("/repos/octo/hello/statuses/abc123").with_body(b"{}".to_vec())
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_limit_then_success() {
        let transport = MockTransport::new();
        transport.queue(MockResponse::primary_rate_limited(60));
        transport.queue(MockResponse::created());

        let mut logger = MockRetryLogger::new();
        let mut seq = Sequence::new();
        logger
            .expect_warn()
            .withf(|message: &str| message == PRIMARY_WARNING)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        logger
            .expect_info()
            .withf(|message: &str| message == "Retrying after 60 seconds!")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let executor = RequestExecutor::new(3, Arc::new(logger));
        let started = Instant::now();
        let response = executor
            .execute(&transport, &STATUSES_ROUTE, request())
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(transport.request_count(), 2);
        assert!(started.elapsed() >= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_secondary_limit_then_success() {
        let transport = MockTransport::new();
        transport.queue(MockResponse::secondary_rate_limited(1));
        transport.queue(MockResponse::created());

        let mut logger = MockRetryLogger::new();
        logger
            .expect_warn()
            .withf(|message: &str| message == SECONDARY_WARNING)
            .times(1)
            .return_const(());
        logger
            .expect_info()
            .withf(|message: &str| message == "Retrying after 1 seconds!")
            .times(1)
            .return_const(());

        let executor = RequestExecutor::new(3, Arc::new(logger));
        let response = executor
            .execute(&transport, &STATUSES_ROUTE, request())
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_warns_on_every_attempt() {
        let transport = MockTransport::new();
        transport.set_default(MockResponse::primary_rate_limited(60));

        let mut logger = MockRetryLogger::new();
        logger
            .expect_warn()
            .withf(|message: &str| message == PRIMARY_WARNING)
            .times(4)
            .return_const(());
        logger
            .expect_info()
            .withf(|message: &str| message == "Retrying after 60 seconds!")
            .times(3)
            .return_const(());

        let executor = RequestExecutor::new(3, Arc::new(logger));
        let error = executor
            .execute(&transport, &STATUSES_ROUTE, request())
            .await
            .unwrap_err();

        assert_eq!(*error.kind(), GitHubErrorKind::PrimaryRateLimitExceeded);
        assert_eq!(error.message(), MockResponse::RATE_LIMIT_BODY);
        assert_eq!(error.attempts(), Some(4));
        assert_eq!(transport.request_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_fails_on_first_limit() {
        let transport = MockTransport::new();
        transport.set_default(MockResponse::secondary_rate_limited(5));

        let mut logger = MockRetryLogger::new();
        logger.expect_warn().times(1).return_const(());
        logger.expect_info().never();

        let executor = RequestExecutor::new(0, Arc::new(logger));
        let error = executor
            .execute(&transport, &STATUSES_ROUTE, request())
            .await
            .unwrap_err();

        assert_eq!(*error.kind(), GitHubErrorKind::SecondaryRateLimitExceeded);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_non_limited_failure_is_relayed_without_logging() {
        let transport = MockTransport::new();
        transport.queue(MockResponse::error(500, "Server Error"));

        let mut logger = MockRetryLogger::new();
        logger.expect_warn().never();
        logger.expect_info().never();

        let executor = RequestExecutor::new(3, Arc::new(logger));
        let response = executor
            .execute(&transport, &STATUSES_ROUTE, request())
            .await
            .unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_not_retried() {
        let transport = MockTransport::new();
        transport.queue_failure("connection refused");

        let mut logger = MockRetryLogger::new();
        logger.expect_warn().never();
        logger.expect_info().never();

        let executor = RequestExecutor::new(3, Arc::new(logger));
        let error = executor
            .execute(&transport, &STATUSES_ROUTE, request())
            .await
            .unwrap_err();

        assert_eq!(*error.kind(), GitHubErrorKind::ConnectionFailed);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_call_gets_fresh_state() {
        let transport = MockTransport::new();
        transport.queue(MockResponse::primary_rate_limited(0));
        transport.queue(MockResponse::primary_rate_limited(0));
        transport.queue(MockResponse::created());
        transport.queue(MockResponse::primary_rate_limited(0));
        transport.queue(MockResponse::primary_rate_limited(0));
        transport.queue(MockResponse::created());

        let mut logger = MockRetryLogger::new();
        logger.expect_warn().times(4).return_const(());
        logger.expect_info().times(4).return_const(());

        let executor = RequestExecutor::new(2, Arc::new(logger));
        for _ in 0..2 {
            let response = executor
                .execute(&transport, &STATUSES_ROUTE, request())
                .await
                .unwrap();
            assert_eq!(response.status, 201);
        }
        assert_eq!(transport.request_count(), 6);
    }
}
