//! Wiring the configured collaborators into one invocation.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::app::locate;
use crate::app::normalize::NormalizeRules;
use crate::app::pipeline::Pipeline;
use crate::app::resolve::BackwardScanResolver;
use crate::app::runner::RunnerInvoker;
use crate::app::scan::Corpus;
use crate::app::selection::Disambiguator;
use crate::app::session::ShellSessionStore;
use crate::app::workflow::Workflow;
use crate::domain::errors::ResolveError;
use crate::infra::config::Config;
use crate::infra::picker::CommandPicker;
use crate::infra::process::ShellExecutor;
use crate::infra::prompt;
use crate::infra::workdir::WorkdirGuard;
use crate::ui::cli::Cli;

/// Exit status used when the user interrupts a prompt.
const INTERRUPTED: u8 = 130;

/// Primary entry point for a command-line invocation.
pub struct CliApp {
    config: Config,
}

impl CliApp {
    /// Load the layered configuration for the current directory.
    pub fn bootstrap() -> Result<Self> {
        let config = Config::load().context("failed to load configuration")?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Resolve and run the requested target, returning the process exit code.
    pub fn run(&mut self, cli: &Cli) -> Result<ExitCode> {
        let _workdir = WorkdirGuard::enter_first_existing(&self.config.workspace.source_dirs())?;

        let corpus = Corpus::from_config(".", &self.config.search)?;
        let locator = locate::from_config(&corpus, &self.config.search);
        let resolver = BackwardScanResolver::new();
        let rules = NormalizeRules::from_config(&self.config.normalize);
        let mut chooser = Disambiguator::new(prompt::stdin_reader(), io::stdout())
            .with_max_attempts(self.config.prompt.max_attempts());
        let mut picker = CommandPicker::new(self.config.picker.command());
        let store = ShellSessionStore::for_current_shell();
        tracing::debug!(session = %store.path().display(), "using session file");

        let mut workflow = Workflow {
            pipeline: Pipeline {
                corpus: &corpus,
                locator: locator.as_ref(),
                resolver: &resolver,
                chooser: &mut chooser,
                picker: &mut picker,
                rules: &rules,
            },
            store: &store,
            invoker: RunnerInvoker::new(self.config.runner.command(), ShellExecutor, io::stdout()),
            dry_run: cli.dry_run,
        };

        let outcome = workflow.run(cli.request())?;
        Ok(match outcome.status {
            None => ExitCode::SUCCESS,
            Some(status) if status.success() => ExitCode::SUCCESS,
            Some(status) => ExitCode::from(runner_exit_code(status.code)),
        })
    }
}

/// Map a failed runner status to a non-zero exit byte.
fn runner_exit_code(code: Option<i32>) -> u8 {
    code.and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
        .unwrap_or(1)
}

/// Exit code reported for an error that ended the invocation.
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(error_exit_code(err))
}

fn error_exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ResolveError>() {
        Some(ResolveError::Interrupted) => INTERRUPTED,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_codes_stay_non_zero() {
        assert_eq!(runner_exit_code(Some(3)), 3);
        assert_eq!(runner_exit_code(None), 1);
        assert_eq!(runner_exit_code(Some(-1)), 1);
        assert_eq!(runner_exit_code(Some(256)), 1);
    }

    #[test]
    fn interruption_maps_to_130() {
        let err = anyhow::Error::from(ResolveError::Interrupted);
        assert_eq!(error_exit_code(&err), 130);
        let err = anyhow::Error::from(ResolveError::NothingToRepeat).context("repeat failed");
        assert_eq!(error_exit_code(&err), 1);
    }
}
