use regex::Regex;

/// Pull the issue identifier out of `source`.
///
/// When the pattern declares a capturing group, the first group's text is
/// returned; otherwise the whole match. A group that did not take part in
/// the match, or matched nothing, falls back to the whole match. Every call
/// starts scanning from the beginning of `source`.
pub fn extract_issue_id<'a>(source: &'a str, pattern: &Regex) -> Option<&'a str> {
    let captures = pattern.captures(source)?;
    let matched = if pattern.captures_len() > 1 {
        captures
            .get(1)
            .filter(|group| !group.as_str().is_empty())
            .or_else(|| captures.get(0))
    } else {
        captures.get(0)
    };
    matched.map(|m| m.as_str()).filter(|id| !id.is_empty())
}

/// Link from a pull request to its tracker issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLink {
    /// Issue identifier (e.g., "ABC-123")
    pub id: String,
    /// Browse URL of the issue
    pub url: String,
}

impl IssueLink {
    pub fn new(project_url: &str, id: &str) -> Self {
        Self {
            id: id.to_string(),
            url: format!("{}/{}", project_url, id),
        }
    }

    /// Markdown fragment placed at the top of the pull request body.
    pub fn markdown(&self) -> String {
        format!("[{}]({})", self.id, self.url)
    }

    pub fn is_linked_in(&self, body: &str) -> bool {
        body.starts_with(&self.markdown())
    }

    pub fn prepend_to(&self, body: &str) -> String {
        format!("{}\n---\n{}", self.markdown(), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pattern() -> Regex {
        Regex::new(crate::config::DEFAULT_ISSUE_PATTERN).unwrap()
    }

    #[test]
    fn test_extract_from_title() {
        let pattern = default_pattern();
        assert_eq!(extract_issue_id("ABC-123: Add new feature", &pattern), Some("ABC-123"));
    }

    #[test]
    fn test_extract_lowercase_key() {
        let pattern = default_pattern();
        assert_eq!(extract_issue_id("abc-9 fix typo", &pattern), Some("abc-9"));
    }

    #[test]
    fn test_default_pattern_is_anchored() {
        let pattern = default_pattern();
        assert_eq!(extract_issue_id("feature/ABC-123-new-feature", &pattern), None);
        assert_eq!(extract_issue_id("Fix ABC-123", &pattern), None);
    }

    #[test]
    fn test_extract_not_found() {
        let pattern = default_pattern();
        assert_eq!(extract_issue_id("No issue here", &pattern), None);
        assert_eq!(extract_issue_id("no-issue-branch", &pattern), None);
        assert_eq!(extract_issue_id("", &pattern), None);
    }

    #[test]
    fn test_extract_returns_first_group() {
        let pattern = Regex::new(r"feature/([A-Z]+-\d+)").unwrap();
        assert_eq!(
            extract_issue_id("feature/ABC-123-new-feature", &pattern),
            Some("ABC-123")
        );
    }

    #[test]
    fn test_extract_non_participating_group_falls_back_to_match() {
        let pattern = Regex::new(r"(?:x-(\d+))|[A-Z]+-\d+").unwrap();
        assert_eq!(extract_issue_id("OPS-7", &pattern), Some("OPS-7"));
    }

    #[test]
    fn test_extract_empty_group_falls_back_to_match() {
        let pattern = Regex::new(r"([a-z]*)[A-Z]+-\d+").unwrap();
        assert_eq!(extract_issue_id("ABC-1", &pattern), Some("ABC-1"));
        assert_eq!(extract_issue_id("xABC-1", &pattern), Some("x"));
    }

    #[test]
    fn test_extract_empty_match_is_not_found() {
        let pattern = Regex::new(r"[A-Z]*").unwrap();
        assert_eq!(extract_issue_id("no uppercase", &pattern), None);
    }

    #[test]
    fn test_extract_is_independent_between_calls() {
        let pattern = Regex::new(r"[A-Z]{2,}-\d+").unwrap();
        assert_eq!(extract_issue_id("AB-1 then CD-2", &pattern), Some("AB-1"));
        assert_eq!(extract_issue_id("AB-1 then CD-2", &pattern), Some("AB-1"));
        assert_eq!(extract_issue_id("XY-9", &pattern), Some("XY-9"));
    }

    #[test]
    fn test_issue_link_rendering() {
        let link = IssueLink::new("https://jira.example.com/browse", "ABC-123");
        assert_eq!(link.url, "https://jira.example.com/browse/ABC-123");
        assert_eq!(link.markdown(), "[ABC-123](https://jira.example.com/browse/ABC-123)");
    }

    #[test]
    fn test_issue_link_keeps_base_url_verbatim() {
        let link = IssueLink::new("https://jira.example.com/browse/", "ABC-123");
        assert_eq!(link.url, "https://jira.example.com/browse//ABC-123");
        assert!(link.is_linked_in(
            "[ABC-123](https://jira.example.com/browse//ABC-123)\n---\nSome description"
        ));
    }

    #[test]
    fn test_prepend_and_detect() {
        let link = IssueLink::new("https://jira.example.com/browse", "ABC-123");
        let body = link.prepend_to("Some description");
        assert_eq!(
            body,
            "[ABC-123](https://jira.example.com/browse/ABC-123)\n---\nSome description"
        );
        assert!(link.is_linked_in(&body));
        assert!(!link.is_linked_in("Some description"));
        assert!(!link.is_linked_in("see [ABC-123](https://jira.example.com/browse/ABC-123)"));
    }
}
