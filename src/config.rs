use clap::Args;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Matches a project key of two or more letters, a hyphen and the issue number
/// at the start of the text (e.g., "ABC-123").
pub const DEFAULT_ISSUE_PATTERN: &str = r"^[A-Za-z]{2,}-\d+";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid issue pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Input does not meet YAML 1.2 \"Core Schema\" specification: {name}. Support boolean input list: `true | True | TRUE | false | False | FALSE`")]
    InvalidBoolean { name: &'static str },
}

/// Raw action inputs as the runner hands them over.
///
/// Every value is a string; empty strings mean "not set".
#[derive(Debug, Clone, Default, Args)]
pub struct ActionInputs {
    /// Token used to update the pull request
    #[arg(long = "github-token", env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base URL the issue identifier is appended to (e.g., https://jira.example.com/browse)
    #[arg(long = "jira-project-url", env = "INPUT_JIRA-PROJECT-URL")]
    pub jira_project_url: Option<String>,

    /// Regex overriding the default issue pattern
    #[arg(long = "jira-issue-regex", env = "INPUT_JIRA-ISSUE-REGEX")]
    pub jira_issue_regex: Option<String>,

    /// "true" to fail the step when no issue identifier is found
    #[arg(long = "fail-if-issue-not-found", env = "INPUT_FAIL-IF-ISSUE-NOT-FOUND")]
    pub fail_if_issue_not_found: Option<String>,

    /// Optional TOML file providing defaults for the inputs above
    #[arg(long, env = "PR_ISSUE_LINK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Defaults read from a TOML file. Action inputs take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub jira: JiraConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraConfig {
    pub project_url: Option<String>,
    pub issue_regex: Option<String>,
    pub fail_if_issue_not_found: Option<bool>,
}

impl FileConfig {
    pub fn load_from(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: Option<String>,
    pub issue_pattern: Regex,
    pub project_url: String,
    pub fail_if_issue_not_found: bool,
}

impl Config {
    /// Resolve the configuration from action inputs, falling back to the
    /// optional config file and then to built-in defaults.
    pub fn load(inputs: &ActionInputs) -> Result<Config, ConfigError> {
        let file = match &inputs.config {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(inputs, file)
    }

    pub fn resolve(inputs: &ActionInputs, file: FileConfig) -> Result<Config, ConfigError> {
        let pattern = non_empty(&inputs.jira_issue_regex)
            .map(str::to_string)
            .or(file.jira.issue_regex)
            .unwrap_or_else(|| DEFAULT_ISSUE_PATTERN.to_string());
        let issue_pattern = Regex::new(&pattern)?;

        let project_url = non_empty(&inputs.jira_project_url)
            .map(str::to_string)
            .or(file.jira.project_url)
            .unwrap_or_default();

        let fail_if_issue_not_found = match non_empty(&inputs.fail_if_issue_not_found) {
            Some(raw) => parse_boolean("fail-if-issue-not-found", raw)?,
            None => file.jira.fail_if_issue_not_found.unwrap_or(false),
        };

        Ok(Config {
            token: non_empty(&inputs.github_token).map(str::to_string),
            issue_pattern,
            project_url,
            fail_if_issue_not_found,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_boolean(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean { name }),
    }
}
