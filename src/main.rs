mod config;
mod issue;
mod linker;
mod pr;
mod report;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use report::{GitHubActionsReporter, Outcome, Reporter};

/// PR Issue Link: finds the Jira issue key in a pull request's title or branch
/// and puts a link to it at the top of the pull request description.
///
/// Meant to run as a GitHub Actions step; every option can also be supplied
/// through the environment variables the runner sets.
#[derive(Parser, Debug)]
#[command(name = "pr-issue-link", version, about)]
struct Cli {
    #[command(flatten)]
    inputs: config::ActionInputs,

    /// Path to the webhook event payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Repository as owner/repo
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = pr::client::DEFAULT_API_URL)]
    api_url: String,

    /// File step outputs are appended to
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let in_actions = std::env::var_os("GITHUB_ACTIONS").is_some();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let mut reporter = GitHubActionsReporter::new(None, in_actions);
            reporter.set_failed(err.to_string().trim_end());
            return ExitCode::FAILURE;
        }
    };
    let mut reporter = GitHubActionsReporter::new(cli.output_file.clone(), in_actions);

    let _main_span = info_span!(
        "pr_issue_link",
        repository = cli.repository.as_deref().unwrap_or_default()
    )
    .entered();

    let outcome = execute(&cli, &mut reporter).await;
    info!(outcome = %outcome, failed = reporter.failed(), "done");
    exit_code(&outcome)
}

/// Build the invocation context and run the linker against the GitHub API.
/// A context that cannot be built is reported as a failure like any other.
async fn execute(cli: &Cli, reporter: &mut dyn Reporter) -> Outcome {
    info!("loading invocation context");
    let ctx = match pr::load_context(cli.event_path.as_deref(), cli.repository.as_deref()) {
        Ok(ctx) => ctx,
        Err(err) => {
            let message = err.to_string();
            reporter.set_failed(&message);
            return Outcome::Failed(message);
        }
    };
    debug!(has_pull_request = ctx.pull_request().is_some(), "loaded invocation context");

    let api_url = cli.api_url.as_str();
    linker::run(
        &ctx,
        &cli.inputs,
        |token| pr::GitHubClient::new(api_url, token),
        reporter,
    )
    .await
}

/// A reported failure fails the step; every other outcome succeeds.
fn exit_code(outcome: &Outcome) -> ExitCode {
    if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
