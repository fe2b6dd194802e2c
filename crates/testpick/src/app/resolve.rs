//! Associating a test method with the class that encloses it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::model::ClassOccurrence;

/// `class Name`, anywhere on the line so modifiers such as `public` or `export` may precede it.
static CLASS_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bclass\s+([A-Za-z_][A-Za-z0-9_]*)").expect("valid class pattern")
});

/// Finds the classes a method may belong to within one file.
pub trait ClassResolver {
    /// Return one occurrence per appearance of `method`, nearest enclosing class first and
    /// ordered from the end of the file toward its start.
    fn resolve_classes(&self, path: &Path, method: &str) -> Result<Vec<ClassOccurrence>>;
}

/// Text heuristic: walk the file bottom-up and pair each appearance of the method with the first
/// `class` line above it. No parsing is involved, so it works across dialects at the cost of
/// occasional false positives on name collisions.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackwardScanResolver;

impl BackwardScanResolver {
    pub fn new() -> Self {
        Self
    }

    /// Run the scan over already loaded contents.
    pub fn scan(&self, path: &Path, contents: &str, method: &str) -> Vec<ClassOccurrence> {
        let word = match Regex::new(&format!(r"\b{}\b", regex::escape(method))) {
            Ok(word) => word,
            Err(err) => {
                tracing::warn!(error = %err, method, "unable to build method pattern");
                return Vec::new();
            }
        };

        let lines: Vec<&str> = contents.lines().collect();
        let markers = (0..lines.len()).rev().filter(|&idx| word.is_match(lines[idx]));

        markers
            .filter_map(|marker| {
                let found = (0..=marker).rev().find_map(|idx| {
                    CLASS_DEFINITION
                        .captures(lines[idx])
                        .map(|captures| (idx, captures[1].to_owned()))
                });
                if found.is_none() {
                    tracing::debug!(line = marker + 1, method, "no class above occurrence");
                }
                found
            })
            .map(|(idx, class_name)| ClassOccurrence {
                path: path.to_path_buf(),
                class_name,
                line: idx + 1,
            })
            .collect()
    }
}

impl ClassResolver for BackwardScanResolver {
    fn resolve_classes(&self, path: &Path, method: &str) -> Result<Vec<ClassOccurrence>> {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let contents = String::from_utf8_lossy(&bytes);
        Ok(self.scan(path, &contents, method))
    }
}
