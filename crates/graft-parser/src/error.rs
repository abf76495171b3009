use std::fmt;

/// An `Error` type for operations performed in the lexer and the parser.
///
/// Errors get returned alongside the resulting AST if either the lexer or the
/// parser encounter lexical or syntactical errors respectively. The AST of a
/// document with errors is incomplete and should not be used.
///
/// ## Example
/// ```rust
/// use graft_parser::Parser;
///
/// let parsed = Parser::new("{ tweet(id: ) }").parse();
/// let error = &parsed.errors()[0];
/// assert_eq!(error.message(), "expected a value, got )");
/// assert_eq!(error.index(), 12);
/// ```
#[derive(PartialEq, Eq, Clone, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub(crate) message: String,
    pub(crate) data: String,
    pub(crate) index: usize,
}

impl Error {
    /// Create a new instance of `Error`.
    pub fn new<S: Into<String>>(message: S, data: String) -> Self {
        Self {
            message: message.into(),
            data,
            index: 0,
        }
    }

    /// Create a new instance of `Error` with a `Location`.
    pub fn with_loc<S: Into<String>>(message: S, data: String, index: usize) -> Self {
        Self {
            message: message.into(),
            data,
            index,
        }
    }

    /// Get a reference to the error's data. This is usually the token that
    /// the parser has found to be lexically or syntactically incorrect.
    pub fn data(&self) -> &str {
        self.data.as_ref()
    }

    /// Get the error's index: the byte offset where the error begins in the
    /// given input.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get a reference to the error's message.
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.index;
        let end = self.index + self.data.len();

        if self.data == "EOF" {
            write!(f, "ERROR@{}:{} {:?} {}", start, start, self.message, self.data)
        } else {
            write!(f, "ERROR@{}:{} {:?} {}", start, end, self.message, self.data)
        }
    }
}
