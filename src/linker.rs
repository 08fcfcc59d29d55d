use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::{ActionInputs, Config, ConfigError};
use crate::issue::{extract_issue_id, IssueLink};
use crate::pr::{InvocationContext, PrError, PullRequestClient};
use crate::report::{Outcome, ReportError, Reporter};

pub const OUTPUT_ISSUE_ID: &str = "jira-issue-id";
pub const OUTPUT_ISSUE_URL: &str = "jira-issue-url";

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("No pull request found.")]
    NoPullRequest,

    #[error("FAILED: {0}")]
    IssueNotFound(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] PrError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Link the triggering pull request to the issue named in its title or branch.
///
/// Every error is reported once through `reporter.set_failed` and returned as
/// [`Outcome::Failed`]; this function itself never fails. `connect` builds the
/// API client from the configured token and is only called when the body
/// actually needs updating.
pub async fn run<C, F>(
    ctx: &InvocationContext,
    inputs: &ActionInputs,
    connect: F,
    reporter: &mut dyn Reporter,
) -> Outcome
where
    C: PullRequestClient,
    F: FnOnce(Option<&str>) -> Result<C, PrError>,
{
    match try_run(ctx, inputs, connect, reporter).await {
        Ok(outcome) => {
            info!(outcome = %outcome, "run finished");
            outcome
        }
        Err(err) => {
            let message = err.to_string();
            warn!(error = %message, "run failed");
            reporter.set_failed(&message);
            Outcome::Failed(message)
        }
    }
}

#[instrument(skip_all, fields(owner = %ctx.repository.owner, repo = %ctx.repository.repo))]
async fn try_run<C, F>(
    ctx: &InvocationContext,
    inputs: &ActionInputs,
    connect: F,
    reporter: &mut dyn Reporter,
) -> Result<Outcome, LinkError>
where
    C: PullRequestClient,
    F: FnOnce(Option<&str>) -> Result<C, PrError>,
{
    let config = Config::load(inputs)?;
    debug!(pattern = %config.issue_pattern, fail_if_issue_not_found = config.fail_if_issue_not_found, "loaded configuration");

    let pr = ctx.pull_request().ok_or(LinkError::NoPullRequest)?;
    let title = pr.title.trim();
    let branch = pr.branch().trim();

    reporter.info(&format!("Title: {}", title));
    reporter.info(&format!("Branch name: {}", branch));

    let found = extract_issue_id(title, &config.issue_pattern)
        .or_else(|| extract_issue_id(branch, &config.issue_pattern));

    let Some(issue_id) = found else {
        let message = format!(
            "Issue ID matching {} was not found in title \"{}\" or branch \"{}\"",
            config.issue_pattern, title, branch
        );
        if config.fail_if_issue_not_found {
            return Err(LinkError::IssueNotFound(message));
        }
        reporter.info(&message);
        return Ok(Outcome::IssueNotFound);
    };
    reporter.info(&format!("Found issue ID: {}", issue_id));

    let link = IssueLink::new(&config.project_url, issue_id);
    let body = pr.body();
    if link.is_linked_in(body) {
        reporter.info(&format!(
            "Pull request body already contains the issue link: {}",
            link.markdown()
        ));
        return Ok(Outcome::AlreadyLinked(link));
    }

    let client = connect(config.token.as_deref())?;
    client
        .update_body(&ctx.repository, pr.number, &link.prepend_to(body))
        .await?;
    info!(pr = pr.number, issue = %link.id, "updated PR body");

    reporter.set_output(OUTPUT_ISSUE_ID, &link.id)?;
    reporter.set_output(OUTPUT_ISSUE_URL, &link.url)?;

    Ok(Outcome::Linked(link))
}
