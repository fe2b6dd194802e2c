//! Running command lines through the platform shell.

use std::process::Command;

use anyhow::{Context, Result};

/// Exit status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes a full command line and waits for it.
pub trait Executor {
    fn execute(&mut self, command_line: &str) -> Result<RunStatus>;
}

/// Runs command lines with `sh -c` (`cmd /C` on Windows), inheriting stdio so the runner's
/// output reaches the user untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl Executor for ShellExecutor {
    fn execute(&mut self, command_line: &str) -> Result<RunStatus> {
        let (shell, flag) = shell();
        let status = Command::new(shell)
            .arg(flag)
            .arg(command_line)
            .status()
            .with_context(|| format!("failed to run `{command_line}`"))?;
        Ok(RunStatus {
            code: status.code(),
        })
    }
}

#[cfg(not(target_os = "windows"))]
fn shell() -> (&'static str, &'static str) {
    ("sh", "-c")
}

#[cfg(target_os = "windows")]
fn shell() -> (&'static str, &'static str) {
    ("cmd", "/C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn reports_exit_codes() -> Result<()> {
        let mut executor = ShellExecutor;
        assert!(executor.execute("true")?.success());
        assert_eq!(executor.execute("exit 3")?.code, Some(3));
        Ok(())
    }
}
