//! Handing the resolved identifier to the test runner.

use std::io::Write;

use anyhow::Result;

use crate::domain::model::DottedPath;
use crate::infra::process::{Executor, RunStatus};

/// Join the runner prefix, the target and the pass-through options into one command line.
pub fn command_line(prefix: &str, dotted: &DottedPath, options: &str) -> String {
    [prefix.trim(), dotted.as_str(), options.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds and runs the runner command, announcing the target before and after.
pub struct RunnerInvoker<E, W> {
    prefix: String,
    executor: E,
    out: W,
}

impl<E: Executor, W: Write> RunnerInvoker<E, W> {
    pub fn new(prefix: impl Into<String>, executor: E, out: W) -> Self {
        Self {
            prefix: prefix.into(),
            executor,
            out,
        }
    }

    /// Run the target synchronously. The completion banner is printed only after a zero exit.
    pub fn invoke(&mut self, dotted: &DottedPath, options: &str) -> Result<RunStatus> {
        let line = command_line(&self.prefix, dotted, options);
        writeln!(self.out, "Running {dotted}")?;
        self.out.flush()?;
        tracing::info!(command = %line, "invoking runner");

        let status = self.executor.execute(&line)?;
        if status.success() {
            writeln!(self.out, "Finished {dotted}")?;
        } else {
            tracing::warn!(code = ?status.code, "runner failed");
        }
        Ok(status)
    }

    /// Print the command that would run without executing it.
    pub fn describe(&mut self, dotted: &DottedPath, options: &str) -> Result<()> {
        writeln!(self.out, "{dotted}")?;
        writeln!(self.out, "{}", command_line(&self.prefix, dotted, options))?;
        Ok(())
    }
}
