use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::Split;

use crate::error::{ContextLine, Error, ErrorKind};

/// How many consumed lines are kept for error reports.
const WINDOW: usize = 4;

/// A cursor over the trimmed lines of a document.
///
/// Only the current line can be inspected without consuming it. Consumed
/// lines are remembered, with their 1-based line number, in a small trailing
/// window that is attached to any error raised through [`Lines::error`].
pub(crate) struct Lines<'a> {
    remaining: Peekable<Split<'a, char>>,
    number: usize,
    window: VecDeque<ContextLine>,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            remaining: text.split('\n').peekable(),
            number: 0,
            window: VecDeque::with_capacity(WINDOW),
        }
    }

    /// The line that would be consumed next, or `""` at the end of input.
    pub(crate) fn current(&mut self) -> &'a str {
        self.remaining.peek().copied().map_or("", str::trim)
    }

    pub(crate) fn is_empty(&mut self) -> bool {
        self.remaining.peek().is_none()
    }

    /// Consume the current line.
    pub(crate) fn consume(&mut self) -> Result<&'a str, Error> {
        match self.advance() {
            Some(line) => Ok(line),
            None => Err(self.error(ErrorKind::Structural, "Unexpected end of file")),
        }
    }

    fn advance(&mut self) -> Option<&'a str> {
        let line = self.remaining.next()?.trim();
        self.number += 1;
        tracing::trace!(number = self.number, line, "consumed");

        if self.window.len() == WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(ContextLine::new(self.number, line));

        Some(line)
    }

    /// Consume a run of blank lines, possibly empty.
    pub(crate) fn skip_blank(&mut self) {
        while !self.is_empty() && self.current().is_empty() {
            self.advance();
        }
    }

    /// Build an error pointing at the most recently consumed line.
    ///
    /// The line after it is pulled into the window too, when there is one,
    /// so the report shows what follows the failure.
    pub(crate) fn error(&mut self, kind: ErrorKind, message: &str) -> Error {
        if let Some(last) = self.window.back_mut() {
            last.mark();
        }
        self.advance();

        Error::new(kind, message).with_context(self.window.iter().cloned().collect())
    }
}
