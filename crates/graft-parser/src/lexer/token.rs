use std::fmt;

/// A token generated by the lexer.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) data: String,
    pub(crate) index: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
            index: 0,
        }
    }

    /// Get a reference to the token's kind.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Get a reference to the token's source text.
    pub fn data(&self) -> &str {
        self.data.as_str()
    }

    /// Get the byte offset of the token in the source text.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.index;
        let end = self.index + self.data.len();
        write!(f, "{:?}@{}:{} {:?}", self.kind, start, end, self.data)
    }
}

/// Tokens generated by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Bang,
    Dollar,
    Amp,
    Spread,
    Comma,
    Colon,
    Eq,
    At,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LCurly,
    RCurly,
    Pipe,
    Eof,

    Name,
    StringValue,
    Int,
    Float,
}

impl TokenKind {
    /// Whitespace, comments and commas carry no meaning in a document.
    pub fn is_ignored(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::Comma
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::Bang => "!",
            TokenKind::Dollar => "$",
            TokenKind::Amp => "&",
            TokenKind::Spread => "...",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Eq => "=",
            TokenKind::At => "@",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LCurly => "{",
            TokenKind::RCurly => "}",
            TokenKind::Pipe => "|",
            TokenKind::Eof => "EOF",
            TokenKind::Name => "a name",
            TokenKind::StringValue => "a string",
            TokenKind::Int => "an integer",
            TokenKind::Float => "a float",
        };
        f.write_str(s)
    }
}
