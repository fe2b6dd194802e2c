//! Line input for interactive prompts.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

use crate::domain::errors::ResolveError;

/// Source of answers to prompts.
pub trait LineReader {
    /// Read one line. `Ok(None)` means the input ended; Ctrl-C surfaces as
    /// [`ResolveError::Interrupted`].
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

impl<T: LineReader + ?Sized> LineReader for Box<T> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        (**self).read_line(prompt)
    }
}

/// Pick the reader matching stdin: a line editor on a terminal, plain lines otherwise.
pub fn stdin_reader() -> Box<dyn LineReader> {
    if io::stdin().is_terminal() {
        Box::new(TerminalReader::new())
    } else {
        Box::new(PlainReader::new(io::stdin().lock(), io::stderr()))
    }
}

/// Interactive reader backed by [`Reedline`].
pub struct TerminalReader {
    editor: Reedline,
}

impl TerminalReader {
    pub fn new() -> Self {
        Self {
            editor: Reedline::create(),
        }
    }
}

impl Default for TerminalReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(prompt.to_owned()),
            DefaultPromptSegment::Empty,
        );
        match self
            .editor
            .read_line(&prompt)
            .context("failed to read from terminal")?
        {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlC => Err(ResolveError::Interrupted.into()),
            Signal::CtrlD => Ok(None),
        }
    }
}

/// Reader over any buffered input, echoing prompts to `echo`.
pub struct PlainReader<R, W> {
    input: R,
    echo: W,
}

impl<R: BufRead, W: Write> PlainReader<R, W> {
    pub fn new(input: R, echo: W) -> Self {
        Self { input, echo }
    }
}

impl<R: BufRead, W: Write> LineReader for PlainReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.echo, "{prompt} ")?;
        self.echo.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read selection")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn plain_reader_returns_lines_then_end() -> Result<()> {
        let mut echo = Vec::new();
        let mut reader = PlainReader::new(Cursor::new("2\r\nabc\n"), &mut echo);
        assert_eq!(reader.read_line("pick:")?, Some("2".to_owned()));
        assert_eq!(reader.read_line("pick:")?, Some("abc".to_owned()));
        assert_eq!(reader.read_line("pick:")?, None);
        drop(reader);
        assert_eq!(String::from_utf8(echo)?, "pick: pick: pick: ");
        Ok(())
    }
}
