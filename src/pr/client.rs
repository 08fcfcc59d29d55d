use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{PrError, Repository};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Remote capability that replaces a pull request's description.
#[async_trait]
pub trait PullRequestClient: Send + Sync {
    async fn update_body(
        &self,
        repository: &Repository,
        number: u64,
        body: &str,
    ) -> Result<(), PrError>;
}

/// GitHub REST implementation of [`PullRequestClient`].
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    /// Build a client for `api_url`. A missing token is an error here,
    /// not when the run starts, so runs that never update the PR work without one.
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self, PrError> {
        let token = token.ok_or(PrError::MissingToken)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("pr-issue-link/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn pull_url(&self, repository: &Repository, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url, repository.owner, repository.repo, number
        )
    }
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    body: &'a str,
}

#[async_trait]
impl PullRequestClient for GitHubClient {
    #[instrument(skip(self, body), fields(owner = %repository.owner, repo = %repository.repo, pr = number))]
    async fn update_body(
        &self,
        repository: &Repository,
        number: u64,
        body: &str,
    ) -> Result<(), PrError> {
        let url = self.pull_url(repository, number);

        debug!(body_bytes = body.len(), "updating PR body via GitHub API");
        self.client
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .json(&UpdateBody { body })
            .send()
            .await?
            .error_for_status()?;
        debug!("PR body updated");

        Ok(())
    }
}

/// In-memory client recording every update, for tests.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BodyUpdate {
        pub owner: String,
        pub repo: String,
        pub pull_number: u64,
        pub body: String,
    }

    #[derive(Clone, Default)]
    pub struct RecordingClient {
        pub updates: Arc<Mutex<Vec<BodyUpdate>>>,
        /// When set, every update fails with a `MissingToken` error.
        pub reject: bool,
    }

    impl RecordingClient {
        pub fn updates(&self) -> Vec<BodyUpdate> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PullRequestClient for RecordingClient {
        async fn update_body(
            &self,
            repository: &Repository,
            number: u64,
            body: &str,
        ) -> Result<(), PrError> {
            if self.reject {
                return Err(PrError::MissingToken);
            }
            self.updates.lock().unwrap().push(BodyUpdate {
                owner: repository.owner.clone(),
                repo: repository.repo.clone(),
                pull_number: number,
                body: body.to_string(),
            });
            Ok(())
        }
    }
}
