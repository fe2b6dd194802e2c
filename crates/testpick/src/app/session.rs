//! Session persistence utilities.

use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::errors::ResolveError;
use crate::domain::model::DottedPath;

const SESSION_DIR: &str = "testpick";
const SESSION_DIR_ENV: &str = "TESTPICK_SESSION_DIR";

/// The last target resolved in this shell and the options it ran with.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Session {
    #[serde(default)]
    pub last_dotted_path: String,
    #[serde(default)]
    pub last_options: String,
}

impl Session {
    /// Replace both remembered values.
    pub fn remember(&mut self, dotted: &DottedPath, options: &str) {
        self.last_dotted_path = dotted.as_str().to_owned();
        self.last_options = options.to_owned();
    }

    /// Target and options for a repeat run. `override_options` replaces the remembered options
    /// entirely; they are never merged.
    pub fn repeat(
        &self,
        override_options: Option<&str>,
    ) -> Result<(DottedPath, String), ResolveError> {
        if self.last_dotted_path.is_empty() {
            return Err(ResolveError::NothingToRepeat);
        }
        let options = override_options.unwrap_or(&self.last_options).to_owned();
        Ok((DottedPath::new(self.last_dotted_path.clone()), options))
    }
}

/// Where a [`Session`] lives between invocations.
pub trait SessionStore {
    /// Load the session, or an empty one on first use.
    fn load(&self) -> Result<Session>;
    fn save(&self, session: &Session) -> Result<()>;
}

/// Keeps the session for the lifetime of the invoking shell.
///
/// The file is named after the parent process, so each interactive shell sees its own session,
/// and lives in the per-user runtime directory, which does not survive logout.
#[derive(Debug, Clone)]
pub struct ShellSessionStore {
    path: PathBuf,
}

impl ShellSessionStore {
    /// Create a store keeping sessions under `dir`, keyed by `key`.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        let path = dir.as_ref().join(format!("session-{key}.json"));
        Self { path }
    }

    /// Store for the shell that launched this process.
    pub fn for_current_shell() -> Self {
        Self::new(session_dir(), &shell_key())
    }

    /// Location of the persisted session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for ShellSessionStore {
    fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read session file at {}", self.path.display()))?;
        let session = serde_json::from_str(&data)
            .with_context(|| format!("invalid session data in {}", self.path.display()))?;
        Ok(session)
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create session directory {}", dir.display()))?;
        }

        let data =
            serde_json::to_string_pretty(session).context("failed to serialize session")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write session file to {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }
}

/// In-process store, used when nothing should outlive the current invocation.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RefCell<Session>,
}

impl MemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            session: RefCell::new(session),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Session> {
        Ok(self.snapshot())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.borrow_mut() = session.clone();
        Ok(())
    }
}

fn session_dir() -> PathBuf {
    if let Some(dir) = env::var_os(SESSION_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs_next::runtime_dir()
        .unwrap_or_else(env::temp_dir)
        .join(SESSION_DIR)
}

#[cfg(unix)]
fn shell_key() -> String {
    std::os::unix::process::parent_id().to_string()
}

#[cfg(not(unix))]
fn shell_key() -> String {
    "default".to_owned()
}
