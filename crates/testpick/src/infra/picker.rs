//! External fuzzy picker integration.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Interactive chooser over a list of paths.
pub trait Picker {
    /// Offer `entries`, optionally pre-filtered by `query`. `Ok(None)` when the user aborts.
    fn pick(&mut self, entries: &[String], query: Option<&str>) -> Result<Option<String>>;
}

/// Picker running an external command such as `fzf`: entries go to its stdin, the selection is
/// read from its stdout.
#[derive(Debug, Clone)]
pub struct CommandPicker {
    command: String,
}

impl CommandPicker {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Picker for CommandPicker {
    fn pick(&mut self, entries: &[String], query: Option<&str>) -> Result<Option<String>> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().context("picker command is empty")?;

        let mut command = Command::new(program);
        command.args(parts);
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            command.arg("--query").arg(query);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn picker: {program}"))?;

        if let Some(mut stdin) = child.stdin.take() {
            let listing = entries.join("\n");
            // The picker may exit before reading everything.
            if let Err(err) = stdin.write_all(listing.as_bytes()) {
                tracing::debug!(error = %err, "picker closed its input early");
            }
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("picker did not exit cleanly: {program}"))?;
        if !output.status.success() {
            tracing::debug!(status = %output.status, "picker aborted");
            return Ok(None);
        }

        Ok(parse_selection(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn parse_selection(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
}
