use serde::Deserialize;

/// Read-only view of the pull request that triggered the run.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 42)
    pub number: u64,
    /// PR title
    pub title: String,
    /// Source branch
    pub head: HeadRef,
    /// Description; GitHub sends null for an empty one
    #[serde(default)]
    pub body: Option<String>,
}

impl PullRequest {
    pub fn branch(&self) -> &str {
        &self.head.r#ref
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadRef {
    pub r#ref: String,
}

/// The subset of a webhook event payload this tool reads.
/// Events other than `pull_request`/`pull_request_target` carry no `pull_request`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

/// Repository coordinates, parsed from `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub repo: String,
}

/// Everything one run knows about the triggering event.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub payload: EventPayload,
    pub repository: Repository,
}

impl InvocationContext {
    pub fn pull_request(&self) -> Option<&PullRequest> {
        self.payload.pull_request.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_body_reads_as_empty() {
        let pr: PullRequest = serde_json::from_str(
            r#"{"number": 7, "title": "OPS-1 tidy", "head": {"ref": "ops-1"}, "body": null}"#,
        )
        .unwrap();
        assert_eq!(pr.body(), "");
        assert_eq!(pr.branch(), "ops-1");
    }

    #[test]
    fn test_payload_without_pull_request() {
        let payload: EventPayload =
            serde_json::from_str(r#"{"ref": "refs/heads/main", "commits": []}"#).unwrap();
        assert!(payload.pull_request.is_none());
    }
}
