//! Token authentication for the GitHub API.

use crate::errors::{GitHubError, GitHubErrorKind, GitHubResult};
use secrecy::{ExposeSecret, SecretString};

/// Authentication method for GitHub API.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Personal Access Token (classic or fine-grained).
    Pat(SecretString),
    /// GitHub Actions token (from GITHUB_TOKEN).
    Actions(SecretString),
}

impl AuthMethod {
    /// Creates a PAT authentication method.
    pub fn pat(token: impl Into<String>) -> Self {
        Self::Pat(SecretString::new(token.into()))
    }

    /// Creates a GitHub Actions token authentication method.
    pub fn actions(token: impl Into<String>) -> Self {
        Self::Actions(SecretString::new(token.into()))
    }

    fn token(&self) -> &SecretString {
        match self {
            Self::Pat(t) | Self::Actions(t) => t,
        }
    }

    /// Gets the token prefix for logging.
    pub fn token_prefix(&self) -> &'static str {
        match self {
            Self::Pat(t) => {
                let exposed = t.expose_secret();
                if exposed.starts_with("ghp_") {
                    "ghp_***"
                } else if exposed.starts_with("github_pat_") {
                    "github_pat_***"
                } else {
                    "***"
                }
            }
            Self::Actions(_) => "ghs_***",
        }
    }

    /// Checks that a token is present.
    pub fn validate(&self) -> GitHubResult<()> {
        if self.token().expose_secret().trim().is_empty() {
            return Err(GitHubError::new(
                GitHubErrorKind::MissingAuth,
                "Authentication token must not be empty",
            ));
        }
        Ok(())
    }

    /// Generates the Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token().expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let auth = AuthMethod::pat("ghp_abc");
        assert_eq!(auth.authorization_header(), "Bearer ghp_abc");
    }

    #[test]
    fn test_token_prefix() {
        assert_eq!(AuthMethod::pat("ghp_abc").token_prefix(), "ghp_***");
        assert_eq!(AuthMethod::pat("github_pat_abc").token_prefix(), "github_pat_***");
        assert_eq!(AuthMethod::pat("plain").token_prefix(), "***");
        assert_eq!(AuthMethod::actions("ghs_abc").token_prefix(), "ghs_***");
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let error = AuthMethod::pat("  ").validate().unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::MissingAuth);
        assert!(AuthMethod::actions("ghs_abc").validate().is_ok());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let auth = AuthMethod::pat("ghp_secret_value");
        assert!(!format!("{:?}", auth).contains("ghp_secret_value"));
    }
}
