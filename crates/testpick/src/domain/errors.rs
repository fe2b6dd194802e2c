//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no file contains `{token}`")]
    NotFound { token: String },
    #[error("no class encloses `{method}` in {}", path.display())]
    NoEnclosingClass { method: String, path: PathBuf },
    #[error("invalid selection `{input}`, expected a number between 1 and {max}")]
    InvalidSelection { input: String, max: usize },
    #[error("`{path}` does not name a module below the project root")]
    EmptyTarget { path: String },
    #[error("nothing selected")]
    NothingSelected,
    #[error("interrupted")]
    Interrupted,
    #[error("no previous target to repeat")]
    NothingToRepeat,
}
