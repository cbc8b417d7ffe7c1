//! Commit status client implementation.

use crate::auth::AuthMethod;
use crate::config::{GitHubConfig, GitHubConfigBuilder};
use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use crate::observability::{RetryLogger, TracingLogger};
use crate::resilience::RequestExecutor;
use crate::services::StatusesService;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::types::{CommitStatusRequest, Route};
use serde::Serialize;
use std::sync::Arc;

/// Accept header sent with every request.
pub const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Content type of request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Creates a client for `token` with default settings.
///
/// Each call returns an independent client; nothing is shared between them.
pub fn setup_client(token: impl Into<String>) -> GitHubResult<StatusClient> {
    StatusClient::builder().pat(token).build()
}

/// GitHub commit status client.
pub struct StatusClient {
    /// Configuration.
    config: GitHubConfig,
    /// Authentication method.
    auth: AuthMethod,
    /// HTTP transport.
    transport: Arc<dyn HttpTransport>,
    /// Rate limit aware executor.
    executor: Arc<RequestExecutor>,
}

impl StatusClient {
    /// Creates a new client using the reqwest transport.
    pub fn new(config: GitHubConfig) -> GitHubResult<Self> {
        let transport = Self::default_transport(&config)?;
        Self::with_transport(config, transport)
    }

    /// Creates a new client over a caller-provided transport.
    pub fn with_transport(
        config: GitHubConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> GitHubResult<Self> {
        Self::with_parts(config, transport, Arc::new(TracingLogger))
    }

    /// Creates a new client over a caller-provided transport and log sink.
    pub fn with_parts(
        config: GitHubConfig,
        transport: Arc<dyn HttpTransport>,
        logger: Arc<dyn RetryLogger>,
    ) -> GitHubResult<Self> {
        config.validate()?;

        let auth = config.auth.clone().ok_or_else(|| {
            GitHubError::new(GitHubErrorKind::MissingAuth, "Authentication required")
        })?;

        let executor = Arc::new(RequestExecutor::new(config.retry.max_retries, logger));

        Ok(Self {
            config,
            auth,
            transport,
            executor,
        })
    }

    /// Creates a new client builder.
    pub fn builder() -> StatusClientBuilder {
        StatusClientBuilder::new()
    }

    /// Gets the configuration.
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Gets the statuses service.
    pub fn statuses(&self) -> StatusesService<'_> {
        StatusesService::new(self)
    }

    /// Sets the status of a commit.
    ///
    /// Returns once GitHub accepts the status. Fails with a validation error
    /// before sending anything if the state is not one of `success`,
    /// `pending`, `failure` or `error`.
    pub async fn set_commit_status(&self, request: &CommitStatusRequest) -> GitHubResult<()> {
        self.statuses().create(request).await
    }

    /// Sends a JSON POST through the executor and checks the final status.
    pub(crate) async fn post_json<B: Serialize>(
        &self,
        route: &Route,
        path: String,
        body: &B,
    ) -> GitHubResult<HttpResponse> {
        let body = serde_json::to_vec(body).map_err(|e| {
            GitHubError::new(
                GitHubErrorKind::InvalidParameter,
                format!("Failed to serialize request body: {}", e),
            )
            .with_cause(e)
        })?;

        let request = HttpRequest::post(path)
            .with_header("accept", ACCEPT_HEADER)
            .with_header("content-type", JSON_CONTENT_TYPE)
            .with_header("authorization", self.auth.authorization_header())
            .with_header("user-agent", self.config.user_agent.clone())
            .with_body(body);

        let response = self
            .executor
            .execute(self.transport.as_ref(), route, request)
            .await?;

        if !response.is_success() {
            return Err(Self::handle_error_response(&response));
        }

        Ok(response)
    }

    fn default_transport(config: &GitHubConfig) -> GitHubResult<Arc<dyn HttpTransport>> {
        let transport = ReqwestTransport::new(
            config.base_url.clone(),
            config.timeout,
            config.connect_timeout,
        )
        .map_err(|e| {
            GitHubError::new(
                GitHubErrorKind::InvalidConfiguration,
                format!("Failed to create HTTP client: {}", e),
            )
        })?;

        Ok(Arc::new(transport))
    }

    fn handle_error_response(response: &HttpResponse) -> GitHubError {
        let request_id = response.header("x-github-request-id").map(String::from);
        GitHubError::from_response(response.status, response.text(), request_id)
    }
}

impl std::fmt::Debug for StatusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusClient")
            .field("base_url", &self.config.base_url)
            .field("auth", &self.auth.token_prefix())
            .field("max_retries", &self.executor.max_retries())
            .finish_non_exhaustive()
    }
}

/// Builder for StatusClient.
pub struct StatusClientBuilder {
    config_builder: GitHubConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    logger: Option<Arc<dyn RetryLogger>>,
}

impl StatusClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: GitHubConfig::builder(),
            transport: None,
            logger: None,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.config_builder = self.config_builder.auth(auth);
        self
    }

    /// Sets a personal access token.
    pub fn pat(self, token: impl Into<String>) -> Self {
        self.auth(AuthMethod::pat(token))
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Sets the number of retries allowed after the first attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config_builder = self.config_builder.max_retries(max_retries);
        self
    }

    /// Disables retries.
    pub fn no_retry(mut self) -> Self {
        self.config_builder = self.config_builder.no_retry();
        self
    }

    /// Uses a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses a custom retry log sink instead of `tracing`.
    pub fn logger(mut self, logger: Arc<dyn RetryLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the client.
    pub fn build(self) -> GitHubResult<StatusClient> {
        let config = self.config_builder.build()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => StatusClient::default_transport(&config)?,
        };
        let logger = self.logger.unwrap_or_else(|| Arc::new(TracingLogger));

        StatusClient::with_parts(config, transport, logger)
    }
}

impl Default for StatusClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
