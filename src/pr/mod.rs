pub mod client;
pub mod types;

pub use client::{GitHubClient, PullRequestClient};
pub use types::{EventPayload, InvocationContext, Repository};

use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Repository not provided (set GITHUB_REPOSITORY or --repository)")]
    MissingRepository,

    #[error("Invalid repository: {0} (expected owner/repo)")]
    InvalidRepository(String),

    #[error("Failed to read event payload: {0}")]
    EventRead(#[from] std::io::Error),

    #[error("Failed to parse event payload: {0}")]
    EventParse(#[from] serde_json::Error),

    #[error("GitHub token not provided")]
    MissingToken,
}

/// Parse `owner/repo` as found in `GITHUB_REPOSITORY`.
pub fn parse_repository(slug: &str) -> Result<Repository, PrError> {
    let (owner, repo) = slug
        .trim()
        .split_once('/')
        .ok_or_else(|| PrError::InvalidRepository(slug.to_string()))?;

    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(PrError::InvalidRepository(slug.to_string()));
    }

    Ok(Repository {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// Read the webhook event payload the runner wrote to `GITHUB_EVENT_PATH`.
#[instrument]
pub fn load_event(path: &Path) -> Result<EventPayload, PrError> {
    let contents = std::fs::read_to_string(path)?;
    let payload: EventPayload = serde_json::from_str(&contents)?;
    debug!(has_pull_request = payload.pull_request.is_some(), "loaded event payload");
    Ok(payload)
}

/// Assemble the invocation context from the event file and repository slug.
pub fn load_context(
    event_path: Option<&Path>,
    repository: Option<&str>,
) -> Result<InvocationContext, PrError> {
    let repository = repository.ok_or(PrError::MissingRepository)?;
    let payload = match event_path {
        Some(path) => load_event(path)?,
        None => EventPayload::default(),
    };
    Ok(InvocationContext {
        payload,
        repository: parse_repository(repository)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT_FIXTURE: &str = include_str!("../../tests/fixtures/pull_request_event.json");

    #[test]
    fn test_parse_valid_repository() {
        let repo = parse_repository("test/repo").unwrap();
        assert_eq!(repo.owner, "test");
        assert_eq!(repo.repo, "repo");
    }

    #[test]
    fn test_parse_invalid_repository() {
        assert!(parse_repository("").is_err());
        assert!(parse_repository("no-slash").is_err());
        assert!(parse_repository("/repo").is_err());
        assert!(parse_repository("owner/").is_err());
        assert!(parse_repository("a/b/c").is_err());
    }

    #[test]
    fn test_parse_event_fixture() {
        let payload: EventPayload = serde_json::from_str(EVENT_FIXTURE).unwrap();
        let pr = payload.pull_request.unwrap();
        assert_eq!(pr.number, 42);
        assert_eq!(pr.title, "ABC-123: Add new feature");
        assert_eq!(pr.branch(), "feature/ABC-123-new-feature");
        assert_eq!(pr.body(), "");
    }

    #[test]
    fn test_load_context_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, EVENT_FIXTURE).unwrap();

        let ctx = load_context(Some(&path), Some("test/repo")).unwrap();
        assert_eq!(ctx.pull_request().map(|pr| pr.number), Some(42));
        assert_eq!(ctx.repository.owner, "test");
    }

    #[test]
    fn test_load_context_without_event() {
        let ctx = load_context(None, Some("test/repo")).unwrap();
        assert!(ctx.pull_request().is_none());
    }

    #[test]
    fn test_load_context_requires_repository() {
        assert!(matches!(
            load_context(None, None),
            Err(PrError::MissingRepository)
        ));
        assert!(matches!(
            load_context(None, Some("not-a-slug")),
            Err(PrError::InvalidRepository(_))
        ));
    }

    #[test]
    fn test_load_event_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_event(&path), Err(PrError::EventParse(_))));
    }
}
