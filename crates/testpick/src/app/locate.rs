//! Finding the files that mention a token.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Command;

use grep_regex::RegexMatcherBuilder;
use grep_searcher::sinks::Lossy;
use grep_searcher::{BinaryDetection, SearcherBuilder};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app::scan::Corpus;
use crate::domain::model::Candidate;
use crate::infra::config::{Search, SearchBackend};

/// `path:line:content`, as printed by `grep -rn` and friends.
static SEARCH_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?):\d+:").expect("valid search line pattern"));

/// Source of candidate files for a literal token.
///
/// Implementations match the token as a whole word and return each file once, in the order it
/// was first seen. A failing backend yields an empty list rather than an error.
pub trait Locator {
    fn locate(&self, token: &str) -> Vec<Candidate>;
}

/// Build the locator selected by configuration.
pub fn from_config(corpus: &Corpus, search: &Search) -> Box<dyn Locator> {
    match search.backend() {
        SearchBackend::Walk => Box::new(WalkLocator::new(corpus.clone())),
        SearchBackend::Command => {
            Box::new(CommandLocator::new(corpus.root(), search.command()))
        }
    }
}

/// In-process locator searching every visible file of the corpus.
#[derive(Debug, Clone)]
pub struct WalkLocator {
    corpus: Corpus,
}

impl WalkLocator {
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus }
    }
}

impl Locator for WalkLocator {
    fn locate(&self, token: &str) -> Vec<Candidate> {
        let matcher = match RegexMatcherBuilder::new()
            .word(true)
            .build(&regex::escape(token))
        {
            Ok(matcher) => matcher,
            Err(err) => {
                tracing::warn!(error = %err, token, "unable to build search matcher");
                return Vec::new();
            }
        };
        let mut searcher = SearcherBuilder::new()
            .binary_detection(BinaryDetection::quit(b'\x00'))
            .line_number(false)
            .build();

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for result in self.corpus.walk() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "search walk error");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let mut found = false;
            let outcome = searcher.search_path(
                &matcher,
                entry.path(),
                Lossy(|_, _| {
                    found = true;
                    Ok(false)
                }),
            );
            if let Err(err) = outcome {
                tracing::debug!(error = %err, path = %entry.path().display(), "skipping file");
                continue;
            }

            if found {
                let path = self.corpus.display_path(entry.path());
                push_unique(&mut candidates, &mut seen, path);
            }
        }

        tracing::debug!(token, count = candidates.len(), "walk search finished");
        candidates
    }
}

/// Locator delegating to an external search command.
///
/// The configured command line gets the token and `.` appended and runs from the root.
#[derive(Debug, Clone)]
pub struct CommandLocator {
    root: PathBuf,
    command: String,
}

impl CommandLocator {
    pub fn new(root: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            command: command.into(),
        }
    }
}

impl Locator for CommandLocator {
    fn locate(&self, token: &str) -> Vec<Candidate> {
        let mut parts = self.command.split_whitespace();
        let Some(program) = parts.next() else {
            tracing::warn!("search command is empty");
            return Vec::new();
        };

        let output = match Command::new(program)
            .args(parts)
            .arg(token)
            .arg(".")
            .current_dir(&self.root)
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(error = %err, program, "search command unavailable");
                return Vec::new();
            }
        };

        if !output.status.success() {
            // grep and rg exit with 1 when nothing matched.
            tracing::debug!(status = %output.status, program, "search command reported no match");
        }

        parse_search_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extract the distinct file paths from `path:line:content` lines, keeping first-seen order.
pub fn parse_search_output(output: &str) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for line in output.lines() {
        let Some(captures) = SEARCH_LINE.captures(line) else {
            continue;
        };
        let path = captures[1].trim_start_matches("./").to_owned();
        push_unique(&mut candidates, &mut seen, path);
    }
    candidates
}

fn push_unique(candidates: &mut Vec<Candidate>, seen: &mut HashSet<String>, path: String) {
    if seen.insert(path.clone()) {
        candidates.push(path);
    }
}
