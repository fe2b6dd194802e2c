//! One invocation: resolve or recall a target, remember it, run it.

use std::io::Write;

use anyhow::Result;

use crate::app::pipeline::Pipeline;
use crate::app::runner::RunnerInvoker;
use crate::app::session::{Session, SessionStore};
use crate::domain::model::DottedPath;
use crate::infra::process::{Executor, RunStatus};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Resolve `token` (or pick a module when absent) and run it with `options`.
    Resolve {
        token: Option<String>,
        options: String,
    },
    /// Run the remembered target again, optionally with a fresh option string.
    Repeat { override_options: Option<String> },
}

/// Result of a completed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub dotted: DottedPath,
    pub options: String,
    /// `None` for dry runs.
    pub status: Option<RunStatus>,
}

/// Drives a [`Request`] through resolution, session memory and the runner.
///
/// The session is read only when repeating and written only after a fresh target was resolved,
/// before the runner starts. Repeats, failed or interrupted resolutions and dry runs leave it
/// untouched.
pub struct Workflow<'a, E, W> {
    pub pipeline: Pipeline<'a>,
    pub store: &'a dyn SessionStore,
    pub invoker: RunnerInvoker<E, W>,
    pub dry_run: bool,
}

impl<E: Executor, W: Write> Workflow<'_, E, W> {
    pub fn run(&mut self, request: Request) -> Result<Outcome> {
        let (dotted, options) = match request {
            Request::Repeat { override_options } => self.recall(override_options)?,
            Request::Resolve { token, options } => {
                let resolution = self.pipeline.resolve(token.as_deref())?;
                if !self.dry_run {
                    let mut session = Session::default();
                    session.remember(&resolution.dotted, &options);
                    self.store.save(&session)?;
                }
                (resolution.dotted, options)
            }
        };

        if self.dry_run {
            self.invoker.describe(&dotted, &options)?;
            return Ok(Outcome {
                dotted,
                options,
                status: None,
            });
        }

        let status = self.invoker.invoke(&dotted, &options)?;
        Ok(Outcome {
            dotted,
            options,
            status: Some(status),
        })
    }

    fn recall(&self, override_options: Option<String>) -> Result<(DottedPath, String)> {
        let session = self.store.load()?;
        let (dotted, options) = session.repeat(override_options.as_deref())?;
        tracing::debug!(dotted = %dotted, options = %options, "repeating last target");
        Ok((dotted, options))
    }
}
