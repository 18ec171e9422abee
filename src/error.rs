//! All errors related to reading and building changelogs.

use std::fmt;

/// The error returned when parsing a changelog fails, or when a model setter
/// is handed a value the changelog grammar can't represent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,

    message: String,

    context: Vec<ContextLine>,
}

impl Error {
    /// Create a new error without any source context.
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub(crate) fn with_context(mut self, context: Vec<ContextLine>) -> Self {
        self.context = context;
        self
    }

    /// The kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human readable description of what went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The most recently consumed lines, oldest first.
    pub fn context(&self) -> &[ContextLine] {
        &self.context
    }

    /// The 1-based number of the line the parser failed on, if known.
    pub fn line(&self) -> Option<usize> {
        self.context
            .iter()
            .find(|line| line.marked)
            .map(|line| line.number)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        if !self.context.is_empty() {
            f.write_str("\n")?;
            for line in &self.context {
                write!(f, "\n{line}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

/// One line of source shown alongside a parse error.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContextLine {
    number: usize,
    text: String,
    marked: bool,
}

impl ContextLine {
    pub(crate) fn new(number: usize, text: &str) -> Self {
        Self {
            number,
            text: text.to_owned(),
            marked: false,
        }
    }

    pub(crate) fn mark(&mut self) {
        self.marked = true;
    }

    /// The 1-based line number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// The trimmed line text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this is the line the parser failed on.
    pub fn marked(&self) -> bool {
        self.marked
    }
}

impl fmt::Display for ContextLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.marked { " -> " } else { "    " };
        write!(f, "{prefix}{}: {}", self.number, self.text)
    }
}

/// All possible error kinds returned when reading a changelog.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The document skeleton is broken: missing title, altered preamble,
    /// input ending mid-construct, a second `Unreleased` section, or content
    /// after the reference block.
    Structural,

    /// A line does not have the shape expected at this point.
    Grammar,

    /// A link is well formed but its URL or versions don't agree with the
    /// repository URL, the version label, or the service convention.
    Mismatch,

    /// A value handed to the model can't be written as a changelog.
    InvalidValue,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => f.write_str("invalid changelog structure"),
            Self::Grammar => f.write_str("invalid changelog syntax"),
            Self::Mismatch => f.write_str("inconsistent changelog link"),
            Self::InvalidValue => f.write_str("invalid changelog value"),
        }
    }
}
