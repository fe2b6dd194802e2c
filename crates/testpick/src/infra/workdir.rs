//! Scoped working-directory changes.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Restores the previous working directory when dropped.
#[derive(Debug)]
pub struct WorkdirGuard {
    previous: Option<PathBuf>,
}

impl WorkdirGuard {
    /// Enter the first of `candidates` that exists as a directory. Without a match the working
    /// directory is left alone and dropping the guard does nothing.
    pub fn enter_first_existing(candidates: &[String]) -> Result<Self> {
        let Some(target) = candidates
            .iter()
            .map(Path::new)
            .find(|candidate| candidate.is_dir())
        else {
            return Ok(Self { previous: None });
        };

        let previous = env::current_dir().context("unable to determine working directory")?;
        env::set_current_dir(target)
            .with_context(|| format!("failed to enter {}", target.display()))?;
        tracing::debug!(dir = %target.display(), "entered source directory");
        Ok(Self {
            previous: Some(previous),
        })
    }

    /// Whether construction changed the working directory.
    pub fn is_active(&self) -> bool {
        self.previous.is_some()
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take()
            && let Err(err) = env::set_current_dir(&previous)
        {
            tracing::warn!(error = %err, dir = %previous.display(), "failed to restore directory");
        }
    }
}
