//! Walking the source tree.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{Walk, WalkBuilder};

use crate::infra::config::Search;

/// The tree searched for tests: a root plus the rules deciding which entries are visible.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    show_hidden: bool,
    ignore: Arc<GlobSet>,
}

impl Corpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            show_hidden: false,
            ignore: Arc::new(GlobSet::empty()),
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, search: &Search) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            show_hidden: search.show_hidden,
            ignore: Arc::new(build_ignore_set(&search.ignore_globs)?),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted walk honoring `.gitignore`, the hidden-file setting and configured globs.
    pub fn walk(&self) -> Walk {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .git_ignore(true)
            .require_git(false)
            .hidden(!self.show_hidden)
            .sort_by_file_path(|a, b| a.cmp(b));

        let root = self.root.clone();
        let ignore = self.ignore.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            !ignore.is_match(rel)
        });
        builder.build()
    }

    /// Every file and directory below the root, relative and `/`-separated. Directories carry a
    /// trailing `/` so they normalize to package paths.
    pub fn entries(&self) -> Vec<String> {
        let mut entries = Vec::new();
        for result in self.walk() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "scanner error");
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let mut display = self.display_path(entry.path());
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                display.push('/');
            }
            entries.push(display);
        }
        entries
    }

    /// Path relative to the root using `/` separators.
    pub fn display_path(&self, path: &Path) -> String {
        to_display_path(&self.root, path)
    }
}

fn to_display_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .filter(|segment| segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn build_ignore_set(globs: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let glob = Glob::new(glob).with_context(|| format!("invalid ignore glob `{glob}`"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build ignore matcher")
}
