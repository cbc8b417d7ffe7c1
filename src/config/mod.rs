//! Configuration types for the commit status client.

use crate::auth::AuthMethod;
use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use std::time::Duration;
use url::Url;

/// Default GitHub API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "integrations-github-status/0.1.0";

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Environment variable holding the token.
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";

/// Environment variable holding the API base URL.
pub const ENV_API_URL: &str = "GITHUB_API_URL";

/// Environment variable overriding the retry budget.
pub const ENV_MAX_RETRIES: &str = "GITHUB_STATUS_MAX_RETRIES";

/// Retry configuration for rate limited responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Commit status client configuration.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API base URL.
    pub base_url: String,
    /// Authentication method.
    pub auth: Option<AuthMethod>,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Retry configuration.
    pub retry: RetryConfig,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl GitHubConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> GitHubConfigBuilder {
        GitHubConfigBuilder::new()
    }

    /// Loads configuration from the environment.
    ///
    /// Reads `GITHUB_TOKEN` (required), `GITHUB_API_URL` and
    /// `GITHUB_STATUS_MAX_RETRIES`.
    pub fn from_env() -> GitHubResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GitHubResult<Self> {
        let token = lookup(ENV_TOKEN).ok_or_else(|| {
            GitHubError::new(
                GitHubErrorKind::MissingAuth,
                format!("{} is not set", ENV_TOKEN),
            )
        })?;

        let mut builder = Self::builder().auth(AuthMethod::actions(token));

        if let Some(url) = lookup(ENV_API_URL) {
            builder = builder.base_url(url);
        }

        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            let max_retries = raw.trim().parse::<u32>().map_err(|e| {
                GitHubError::configuration(format!(
                    "{} must be a non-negative integer, got '{}': {}",
                    ENV_MAX_RETRIES, raw, e
                ))
            })?;
            builder = builder.max_retries(max_retries);
        }

        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> GitHubResult<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            GitHubError::new(
                GitHubErrorKind::InvalidBaseUrl,
                format!("Invalid base URL '{}': {}", self.base_url, e),
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(GitHubError::new(
                GitHubErrorKind::InvalidBaseUrl,
                "Base URL must start with http:// or https://",
            ));
        }

        if self.user_agent.is_empty() {
            return Err(GitHubError::configuration("User-Agent is required by GitHub API"));
        }

        if let Some(ref auth) = self.auth {
            auth.validate()?;
        }

        Ok(())
    }
}

/// Builder for GitHubConfig.
#[derive(Debug, Default)]
pub struct GitHubConfigBuilder {
    base_url: Option<String>,
    auth: Option<AuthMethod>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    retry: Option<RetryConfig>,
}

impl GitHubConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the number of retries allowed after the first attempt.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry = Some(RetryConfig { max_retries });
        self
    }

    /// Disables retries: the first rate limited response fails the call.
    pub fn no_retry(self) -> Self {
        self.max_retries(0)
    }

    /// Builds the configuration.
    pub fn build(self) -> GitHubResult<GitHubConfig> {
        let config = GitHubConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            auth: self.auth,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            user_agent: self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            retry: self.retry.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
