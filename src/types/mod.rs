//! Core data types for the commit status API.

use crate::errors::{GitHubError, GitHubResult};
use crate::transport::HttpMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// State of a commit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    /// Checks passed.
    Success,
    /// Checks are running.
    Pending,
    /// Checks failed.
    Failure,
    /// Checks could not run.
    Error,
}

impl CommitState {
    /// All accepted states.
    pub const ALL: [CommitState; 4] = [
        CommitState::Success,
        CommitState::Pending,
        CommitState::Failure,
        CommitState::Error,
    ];

    /// Returns the wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Pending => "pending",
            Self::Failure => "failure",
            Self::Error => "error",
        }
    }

    /// Returns true if `value` names one of the accepted states.
    pub fn is_valid(value: &str) -> bool {
        value.parse::<Self>().is_ok()
    }

    fn invalid(found: impl fmt::Display) -> GitHubError {
        GitHubError::validation(format!(
            "Invalid commit state {}: expected one of success, pending, failure, error",
            found
        ))
    }
}

impl fmt::Display for CommitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitState {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| Self::invalid(format!("'{}'", s)))
    }
}

impl TryFrom<&serde_json::Value> for CommitState {
    type Error = GitHubError;

    /// Accepts only JSON strings naming a valid state.
    fn try_from(value: &serde_json::Value) -> Result<Self, GitHubError> {
        match value {
            serde_json::Value::String(s) => s.parse(),
            other => Err(Self::invalid(other)),
        }
    }
}

/// An API route: method plus templated path.
///
/// The template is what shows up in logs, so limited requests aggregate by
/// endpoint rather than by repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template.
    pub template: &'static str,
}

/// Route for creating a commit status.
pub const STATUSES_ROUTE: Route = Route {
    method: HttpMethod::Post,
    template: "/repos/{owner}/{repo}/statuses/{sha}",
};

/// Request to set the status of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStatusRequest {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Commit SHA.
    pub sha: String,
    /// Requested state, as provided by the caller. Validated before sending.
    pub state: String,
    /// Whether statuses may be set from forks.
    pub allow_forks: bool,
    /// Link shown next to the status.
    pub target_url: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Label differentiating this status from others.
    pub context: Option<String>,
}

impl CommitStatusRequest {
    /// Creates a new request.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        sha: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            sha: sha.into(),
            state: state.into(),
            allow_forks: false,
            target_url: None,
            description: None,
            context: None,
        }
    }

    /// Sets whether forks are allowed.
    pub fn allow_forks(mut self, allow: bool) -> Self {
        self.allow_forks = allow;
        self
    }

    /// Sets the target URL.
    pub fn target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the context.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Validates the request and returns the parsed state.
    pub fn validate(&self) -> GitHubResult<CommitState> {
        for (name, segment) in [("owner", &self.owner), ("repo", &self.repo), ("sha", &self.sha)] {
            if segment.is_empty() {
                return Err(GitHubError::validation(format!("{} must not be empty", name)));
            }
            if segment.contains(['/', '?', '#']) {
                return Err(GitHubError::validation(format!(
                    "{} contains a reserved character: {}",
                    name, segment
                )));
            }
        }

        self.state.parse()
    }

    /// Interpolates the statuses route for this request.
    pub fn path(&self) -> String {
        format!("/repos/{}/{}/statuses/{}", self.owner, self.repo, self.sha)
    }

    /// Builds the wire body.
    pub fn body(&self, state: CommitState) -> CommitStatusBody<'_> {
        CommitStatusBody {
            allow_forks: self.allow_forks,
            state,
            target_url: self.target_url.as_deref(),
            description: self.description.as_deref(),
            context: self.context.as_deref(),
        }
    }
}

/// JSON body of a create-status request.
#[derive(Debug, Clone, Serialize)]
pub struct CommitStatusBody<'a> {
    /// Whether forks are allowed.
    #[serde(rename = "allowForks")]
    pub allow_forks: bool,
    /// Status state.
    pub state: CommitState,
    /// Target URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<&'a str>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// Context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GitHubErrorKind;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("success" => CommitState::Success)]
    #[test_case("pending" => CommitState::Pending)]
    #[test_case("failure" => CommitState::Failure)]
    #[test_case("error" => CommitState::Error)]
    fn test_valid_states(value: &str) -> CommitState {
        assert!(CommitState::is_valid(value));
        value.parse().unwrap()
    }

    #[test_case("" ; "empty")]
    #[test_case("Success" ; "capitalized")]
    #[test_case("succeeded" ; "unknown word")]
    #[test_case(" pending" ; "leading space")]
    fn test_invalid_states(value: &str) {
        assert!(!CommitState::is_valid(value));
        let error = value.parse::<CommitState>().unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::ValidationError);
    }

    #[test_case(json!("failure") => true ; "string")]
    #[test_case(json!(1) => false ; "number")]
    #[test_case(json!(true) => false ; "boolean")]
    #[test_case(json!(null) => false ; "null")]
    #[test_case(json!(["success"]) => false ; "array")]
    #[test_case(json!({"state": "success"}) => false ; "object")]
    fn test_state_from_json(value: serde_json::Value) -> bool {
        CommitState::try_from(&value).is_ok()
    }

    #[test]
    fn test_state_from_json_rejects_non_strings_as_validation() {
        assert_eq!(CommitState::try_from(&json!("error")).unwrap(), CommitState::Error);

        let error = CommitState::try_from(&json!(42)).unwrap_err();
        assert_eq!(*error.kind(), GitHubErrorKind::ValidationError);
    }

    #[test]
    fn test_body_is_compact_json() {
        let request = CommitStatusRequest::new("octo", "hello", "abc123", "success").allow_forks(true);
        let state = request.validate().unwrap();
        let body = serde_json::to_string(&request.body(state)).unwrap();

        assert_eq!(body, r#"{"allowForks":true,"state":"success"}"#);
    }

    #[test]
    fn test_body_includes_optional_fields() {
        let request = CommitStatusRequest::new("octo", "hello", "abc123", "pending")
            .target_url("https://ci.example.com/1")
            .description("Build running")
            .context("ci/build");
        let body = serde_json::to_value(request.body(CommitState::Pending)).unwrap();

        assert_eq!(
            body,
            json!({
                "allowForks": false,
                "state": "pending",
                "target_url": "https://ci.example.com/1",
                "description": "Build running",
                "context": "ci/build"
            })
        );
    }

    #[test]
    fn test_path_and_route() {
        let request = CommitStatusRequest::new("octo", "hello", "abc123", "success");
        assert_eq!(request.path(), "/repos/octo/hello/statuses/abc123");
        assert_eq!(STATUSES_ROUTE.template, "/repos/{owner}/{repo}/statuses/{sha}");
        assert_eq!(STATUSES_ROUTE.method, HttpMethod::Post);
    }

    #[test]
    fn test_validate_rejects_bad_segments() {
        let empty = CommitStatusRequest::new("", "hello", "abc123", "success");
        assert!(empty.validate().is_err());

        let slash = CommitStatusRequest::new("octo", "hello/../x", "abc123", "success");
        assert!(slash.validate().is_err());
    }
}
