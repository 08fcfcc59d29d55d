pub mod types;

pub use types::Outcome;

use colored::Colorize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

const OUTPUT_DELIMITER: &str = "PR_ISSUE_LINK_EOF";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write output file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Output {name} must not contain the delimiter PR_ISSUE_LINK_EOF")]
    DelimiterInValue { name: String },
}

/// The hosting platform's logging, output and failure channels.
pub trait Reporter {
    /// Write an informational line to the job log.
    fn info(&mut self, message: &str);

    /// Set a named step output.
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), ReportError>;

    /// Mark the step as failed with `message`.
    fn set_failed(&mut self, message: &str);
}

/// Reporter speaking the GitHub Actions runner protocol.
pub struct GitHubActionsReporter {
    output_file: Option<PathBuf>,
    workflow_commands: bool,
    failed: bool,
}

impl GitHubActionsReporter {
    /// `output_file` is the path from `GITHUB_OUTPUT`. With `workflow_commands`
    /// off, failures are printed for a terminal instead of as `::error::` commands.
    pub fn new(output_file: Option<PathBuf>, workflow_commands: bool) -> Self {
        Self {
            output_file,
            workflow_commands,
            failed: false,
        }
    }

    /// Whether `set_failed` has been called.
    pub fn failed(&self) -> bool {
        self.failed
    }
}

impl Reporter for GitHubActionsReporter {
    fn info(&mut self, message: &str) {
        println!("{}", message);
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<(), ReportError> {
        match &self.output_file {
            Some(path) => {
                debug!(output = name, path = %path.display(), "writing step output");
                let entry = format_output(name, value)?;
                let mut file = OpenOptions::new().append(true).create(true).open(path)?;
                file.write_all(entry.as_bytes())?;
            }
            None => {
                warn!(output = name, "GITHUB_OUTPUT not set, output not recorded");
                println!("{}", unrecorded_output_line(name, value, self.workflow_commands));
            }
        }
        Ok(())
    }

    fn set_failed(&mut self, message: &str) {
        self.failed = true;
        if self.workflow_commands {
            println!("::error::{}", escape_command_data(message));
        } else {
            println!("{} {}", "error:".red().bold(), message);
        }
    }
}

/// Render one `name<<DELIM ... DELIM` entry for the outputs file.
fn format_output(name: &str, value: &str) -> Result<String, ReportError> {
    if name.contains(OUTPUT_DELIMITER) || value.contains(OUTPUT_DELIMITER) {
        return Err(ReportError::DelimiterInValue {
            name: name.to_string(),
        });
    }
    Ok(format!(
        "{name}<<{OUTPUT_DELIMITER}\n{value}\n{OUTPUT_DELIMITER}\n"
    ))
}

/// Line printed when there is no outputs file to record `name` in.
/// Under the runner this is a warning annotation, since the output is lost.
fn unrecorded_output_line(name: &str, value: &str, workflow_commands: bool) -> String {
    if workflow_commands {
        format!(
            "::warning::{}",
            escape_command_data(&format!(
                "Output {} was not set because GITHUB_OUTPUT is not available (value: {})",
                name, value
            ))
        )
    } else {
        format!("{} {}", format!("{}:", name).as_str().cyan().bold(), value)
    }
}

/// Escape data for a workflow command so multi-line messages stay one command.
fn escape_command_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Reporter that keeps everything in memory, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub infos: Vec<String>,
    pub outputs: Vec<(String, String)>,
    pub failures: Vec<String>,
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn set_output(&mut self, name: &str, value: &str) -> Result<(), ReportError> {
        self.outputs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_failed(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}
