mod cursor;
mod token;

use crate::lexer::cursor::Cursor;
use crate::Error;
use crate::LimitTracker;

pub use token::Token;
pub use token::TokenKind;

/// Parses source text into tokens.
/// ```rust
/// use graft_parser::Lexer;
///
/// let query = "
/// query Feed($first: Int = 10) {
///     allTweets {
///         text
///         author { username }
///     }
/// }
/// ";
/// let (tokens, errors) = Lexer::new(query).lex();
/// assert_eq!(errors.len(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    index: usize,
    finished: bool,
    limit: Option<LimitTracker>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer for a source text.
    ///
    /// The Lexer is an iterator over tokens and errors:
    /// ```rust
    /// use graft_parser::Lexer;
    ///
    /// let query = "# --- a comment ---";
    ///
    /// let mut tokens = vec![];
    /// for token in Lexer::new(query) {
    ///     match token {
    ///         Ok(token) => tokens.push(token),
    ///         Err(error) => panic!("{:?}", error),
    ///     }
    /// }
    /// ```
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            index: 0,
            finished: false,
            limit: None,
        }
    }

    /// Stop with an error after `limit` tokens.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(LimitTracker::new(limit));
        self
    }

    /// Lex the full source text, consuming the lexer.
    pub fn lex(self) -> (Vec<Token>, Vec<Error>) {
        let mut tokens = vec![];
        let mut errors = vec![];

        for item in self {
            match item {
                Ok(token) => tokens.push(token),
                Err(error) => errors.push(error),
            }
        }

        (tokens, errors)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.input.is_empty() {
            let mut eof = Token::new(TokenKind::Eof, "EOF");
            eof.index = self.index;

            self.finished = true;
            return Some(Ok(eof));
        }

        if let Some(limit) = &mut self.limit {
            if limit.check_and_increment() {
                self.finished = true;
                return Some(Err(Error::with_loc(
                    "token limit reached, aborting lexing",
                    String::new(),
                    self.index,
                )));
            }
        }

        let mut c = Cursor::new(self.input);
        let result = c.advance();
        let consumed = c.consumed().len();
        let start = self.index;
        self.index += consumed;
        self.input = &self.input[consumed..];

        match result {
            Ok(kind) => {
                let mut token = Token::new(kind, c.consumed());
                token.index = start;
                Some(Ok(token))
            }
            Err(message) => Some(Err(Error::with_loc(
                message,
                c.consumed().to_string(),
                start,
            ))),
        }
    }
}

impl Cursor<'_> {
    /// Consumes exactly one token (or one erroneous lexeme) and returns its
    /// kind. Always consumes at least one character.
    fn advance(&mut self) -> Result<TokenKind, &'static str> {
        let Some(first_char) = self.bump() else {
            return Ok(TokenKind::Eof);
        };

        match first_char {
            '"' => self.string_value(),
            '#' => {
                self.eat_while(|c| !is_line_terminator(c));
                Ok(TokenKind::Comment)
            }
            '.' => {
                if self.eat_str("..") {
                    Ok(TokenKind::Spread)
                } else {
                    self.eat_while(|c| c == '.');
                    Err("unterminated spread operator")
                }
            }
            c if is_whitespace(c) => {
                self.eat_while(is_whitespace);
                Ok(TokenKind::Whitespace)
            }
            c if is_name_start(c) => {
                self.eat_while(is_name_continue);
                Ok(TokenKind::Name)
            }
            c @ '-' => self.number(c),
            c if c.is_ascii_digit() => self.number(c),
            '!' => Ok(TokenKind::Bang),
            '$' => Ok(TokenKind::Dollar),
            '&' => Ok(TokenKind::Amp),
            '(' => Ok(TokenKind::LParen),
            ')' => Ok(TokenKind::RParen),
            ':' => Ok(TokenKind::Colon),
            ',' => Ok(TokenKind::Comma),
            '=' => Ok(TokenKind::Eq),
            '@' => Ok(TokenKind::At),
            '[' => Ok(TokenKind::LBracket),
            ']' => Ok(TokenKind::RBracket),
            '{' => Ok(TokenKind::LCurly),
            '|' => Ok(TokenKind::Pipe),
            '}' => Ok(TokenKind::RCurly),
            _ => Err("unexpected character"),
        }
    }

    /// Called after the opening `"`.
    fn string_value(&mut self) -> Result<TokenKind, &'static str> {
        if self.eat_str("\"\"") {
            return self.block_string_value();
        }
        loop {
            match self.bump() {
                None => return Err("unterminated string value"),
                Some('"') => return Ok(TokenKind::StringValue),
                Some('\\') => match self.bump() {
                    Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {}
                    Some('u') => {
                        for _ in 0..4 {
                            if !self.first().is_some_and(|c| c.is_ascii_hexdigit()) {
                                self.eat_while(|c| c != '"' && !is_line_terminator(c));
                                self.eat('"');
                                return Err("invalid unicode escape sequence");
                            }
                            self.bump();
                        }
                    }
                    _ => {
                        self.eat_while(|c| c != '"' && !is_line_terminator(c));
                        self.eat('"');
                        return Err("unexpected escaped character");
                    }
                },
                Some(c) if is_line_terminator(c) => return Err("unexpected line terminator"),
                Some(_) => {}
            }
        }
    }

    /// Called after the opening `"""`.
    fn block_string_value(&mut self) -> Result<TokenKind, &'static str> {
        loop {
            if self.eat_str("\\\"\"\"") {
                continue;
            }
            if self.eat_str("\"\"\"") {
                return Ok(TokenKind::StringValue);
            }
            if self.bump().is_none() {
                return Err("unterminated block string value");
            }
        }
    }

    /// <https://spec.graphql.org/October2021/#IntValue>
    /// <https://spec.graphql.org/October2021/#FloatValue>
    fn number(&mut self, first_char: char) -> Result<TokenKind, &'static str> {
        let first_digit = if first_char == '-' {
            match self.bump() {
                Some(c) if c.is_ascii_digit() => c,
                _ => return Err("expected a digit after minus sign"),
            }
        } else {
            first_char
        };
        if first_digit == '0' && self.first().is_some_and(|c| c.is_ascii_digit()) {
            self.eat_while(|c| c.is_ascii_digit());
            return Err("numbers must not have leading zeros");
        }
        self.eat_while(|c| c.is_ascii_digit());

        let mut kind = TokenKind::Int;
        if self.first() == Some('.') {
            self.bump();
            if !self.first().is_some_and(|c| c.is_ascii_digit()) {
                return Err("expected a digit after the decimal point");
            }
            self.eat_while(|c| c.is_ascii_digit());
            kind = TokenKind::Float;
        }
        if matches!(self.first(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.first(), Some('+' | '-')) {
                self.bump();
            }
            if !self.first().is_some_and(|c| c.is_ascii_digit()) {
                return Err("expected a digit in the exponent");
            }
            self.eat_while(|c| c.is_ascii_digit());
            kind = TokenKind::Float;
        }
        if self.first().is_some_and(|c| is_name_start(c) || c == '.') {
            self.eat_while(|c| is_name_continue(c) || c == '.');
            return Err("unexpected character after a number");
        }
        Ok(kind)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{feff}') || is_line_terminator(c)
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// <https://spec.graphql.org/October2021/#NameStart>
fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// <https://spec.graphql.org/October2021/#NameContinue>
fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
