//! Commit status operations.

use crate::client::StatusClient;
use crate::errors::GitHubResult;
use crate::types::{CommitStatusRequest, STATUSES_ROUTE};
use tracing::info;

/// Service for commit status operations.
pub struct StatusesService<'a> {
    client: &'a StatusClient,
}

impl<'a> StatusesService<'a> {
    /// Creates a new statuses service.
    pub fn new(client: &'a StatusClient) -> Self {
        Self { client }
    }

    /// Creates a commit status.
    ///
    /// The request is validated first; an invalid state never reaches the
    /// network. Rate limited responses are retried by the client's executor.
    pub async fn create(&self, request: &CommitStatusRequest) -> GitHubResult<()> {
        let state = request.validate()?;

        self.client
            .post_json(&STATUSES_ROUTE, request.path(), &request.body(state))
            .await?;

        info!(
            owner = %request.owner,
            repo = %request.repo,
            sha = %request.sha,
            state = %state,
            "Commit status set"
        );
        Ok(())
    }
}
