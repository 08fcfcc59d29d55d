use crate::issue::IssueLink;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The PR body was updated and outputs were set.
    Linked(IssueLink),
    /// The PR body already starts with the link; nothing was changed.
    AlreadyLinked(IssueLink),
    /// No identifier in title or branch and the run is configured not to fail.
    IssueNotFound,
    /// A failure was reported with this message.
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Linked(link) => write!(f, "linked {}", link.id),
            Outcome::AlreadyLinked(link) => write!(f, "already linked {}", link.id),
            Outcome::IssueNotFound => write!(f, "issue not found"),
            Outcome::Failed(_) => write!(f, "failed"),
        }
    }
}
