//! Domain models for targets, candidates, and resolved identifiers.

use std::fmt;
use std::path::PathBuf;

/// What kind of test a raw token names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Method,
    Class,
    ModuleOrPackage,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Method => "method",
            TargetKind::Class => "class",
            TargetKind::ModuleOrPackage => "module",
        }
    }
}

/// A file that contains the searched token, relative to the corpus root and `/`-separated.
pub type Candidate = String;

/// A class definition found above an occurrence of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOccurrence {
    pub path: PathBuf,
    pub class_name: String,
    /// 1-based line of the `class` statement.
    pub line: usize,
}

/// Fully-qualified identifier handed to the runner, e.g. `app.billing.tests.InvoiceTest`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DottedPath(String);

impl DottedPath {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|segment| !segment.is_empty())
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub kind: TargetKind,
    pub dotted: DottedPath,
}
