//! Choosing one candidate out of several.

use std::fmt::Display;
use std::io::Write;

use anyhow::Result;

use crate::domain::errors::ResolveError;
use crate::infra::prompt::LineReader;

/// Resolves a list of equally valid candidates to a single index.
pub trait Chooser {
    /// Return the index of the chosen item. A single item is chosen without asking.
    fn choose(&mut self, heading: &str, items: &[String]) -> Result<usize>;
}

/// Render `items` as a 1-based enumerated listing.
pub fn render_choices<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| format!("{}) {item}\n", idx + 1))
        .collect()
}

/// Parse a 1-based answer into an index, rejecting anything outside `1..=len`.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    let number: usize = input.trim().parse().ok()?;
    (1..=len).contains(&number).then(|| number - 1)
}

/// Prompt-driven chooser. Invalid answers are rejected and asked again until the attempt budget
/// runs out.
pub struct Disambiguator<R, W> {
    reader: R,
    out: W,
    max_attempts: usize,
}

impl<R: LineReader, W: Write> Disambiguator<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self {
            reader,
            out,
            max_attempts: 3,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }
}

impl<R: LineReader, W: Write> Chooser for Disambiguator<R, W> {
    fn choose(&mut self, heading: &str, items: &[String]) -> Result<usize> {
        match items.len() {
            0 => return Err(ResolveError::NothingSelected.into()),
            1 => return Ok(0),
            _ => {}
        }

        writeln!(self.out, "{heading}")?;
        write!(self.out, "{}", render_choices(items))?;
        self.out.flush()?;

        let prompt = format!("Select [1-{}]:", items.len());
        let mut last_input = String::new();
        for attempt in 1..=self.max_attempts {
            let Some(input) = self.reader.read_line(&prompt)? else {
                return Err(ResolveError::NothingSelected.into());
            };
            if let Some(index) = parse_selection(&input, items.len()) {
                tracing::debug!(index, attempt, "selection accepted");
                return Ok(index);
            }
            writeln!(
                self.out,
                "`{}` is not a number between 1 and {}",
                input.trim(),
                items.len()
            )?;
            last_input = input;
        }

        Err(ResolveError::InvalidSelection {
            input: last_input.trim().to_owned(),
            max: items.len(),
        }
        .into())
    }
}
