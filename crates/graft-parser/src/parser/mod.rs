mod grammar;

use crate::ast::Document;
use crate::lexer::Lexer;
use crate::Error;
use crate::LimitTracker;
use crate::LineIndex;
use crate::Location;
use crate::Token;
use crate::TokenKind;

/// Default maximum nesting of selection sets, lists and input objects.
pub const DEFAULT_RECURSION_LIMIT: usize = 500;

/// Parse a query document or a schema definition into an AST.
///
/// ## Example
///
/// ```rust
/// use graft_parser::ast::Definition;
/// use graft_parser::Parser;
///
/// let query = "
/// query Tweet($id: ID!) {
///     tweet(id: $id) {
///         text
///         writer: author { username }
///     }
/// }
/// ";
/// let parsed = Parser::new(query).parse();
/// assert!(parsed.errors().is_empty());
///
/// let Definition::Operation(operation) = &parsed.document().definitions[0] else {
///     panic!("expected an operation")
/// };
/// assert_eq!(operation.name.as_deref(), Some("Tweet"));
/// assert_eq!(operation.selection_set[0].name, "tweet");
/// ```
///
/// Parsing stops at the first syntax error: the document returned alongside
/// errors is incomplete.
#[derive(Debug)]
pub struct Parser<'input> {
    input: &'input str,
    line_index: LineIndex<'input>,
    /// Remaining significant tokens, in reverse order.
    tokens: Vec<Token>,
    errors: Vec<Error>,
    recursion_limit: LimitTracker,
    token_limit: Option<usize>,
}

/// The result of [`Parser::parse`].
#[derive(Debug)]
pub struct ParseResult {
    document: Document,
    errors: Vec<Error>,
    recursion_limit: LimitTracker,
}

impl ParseResult {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Lexing and parsing errors, in source order.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Split into the document and its errors.
    pub fn into_parts(self) -> (Document, Vec<Error>) {
        (self.document, self.errors)
    }

    /// Usage of the recursion limit while parsing.
    pub fn recursion_limit(&self) -> LimitTracker {
        self.recursion_limit
    }
}

impl<'input> Parser<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            line_index: LineIndex::new(input),
            tokens: Vec::new(),
            errors: Vec::new(),
            recursion_limit: LimitTracker::new(DEFAULT_RECURSION_LIMIT),
            token_limit: None,
        }
    }

    /// Configure the recursion limit to use while parsing.
    pub fn recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = LimitTracker::new(recursion_limit);
        self
    }

    /// Configure the limit on the number of tokens to lex, ignored ones included.
    pub fn token_limit(mut self, token_limit: usize) -> Self {
        self.token_limit = Some(token_limit);
        self
    }

    pub fn parse(mut self) -> ParseResult {
        let mut lexer = Lexer::new(self.input);
        if let Some(limit) = self.token_limit {
            lexer = lexer.with_limit(limit);
        }
        let (tokens, errors) = lexer.lex();
        if !errors.is_empty() {
            // A token stream with holes only yields confusing syntax errors
            return ParseResult {
                document: Document::default(),
                errors,
                recursion_limit: self.recursion_limit,
            };
        }
        self.tokens = tokens
            .into_iter()
            .filter(|token| !token.kind().is_ignored() && token.kind() != TokenKind::Eof)
            .collect();
        self.tokens.reverse();

        let document = grammar::document::document(&mut self);
        ParseResult {
            document,
            errors: self.errors,
            recursion_limit: self.recursion_limit,
        }
    }

    pub(crate) fn peek(&self) -> Option<TokenKind> {
        self.tokens.last().map(|token| token.kind())
    }

    pub(crate) fn peek_n(&self, n: usize) -> Option<TokenKind> {
        self.tokens
            .len()
            .checked_sub(n)
            .and_then(|index| self.tokens.get(index))
            .map(|token| token.kind())
    }

    pub(crate) fn peek_data(&self) -> Option<&str> {
        self.tokens.last().map(|token| token.data())
    }

    /// Is the next token a name with this exact text?
    pub(crate) fn at_keyword(&self, keyword: &str) -> bool {
        self.peek() == Some(TokenKind::Name) && self.peek_data() == Some(keyword)
    }

    pub(crate) fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    /// Consume the next token if it has this kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.tokens.pop();
            true
        } else {
            false
        }
    }

    /// Consume the next token, which must have this kind.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek() == Some(kind) {
            self.pop()
        } else {
            self.err(format!("expected {kind}"))
        }
    }

    /// Record an error at the next token. Always returns `None` so grammar
    /// functions can `return p.err(..)`.
    pub(crate) fn err<T>(&mut self, message: impl Into<String>) -> Option<T> {
        let message = message.into();
        let error = match self.tokens.last() {
            Some(token) => Error::with_loc(
                format!("{message}, got {}", token.data()),
                token.data().to_string(),
                token.index(),
            ),
            None => Error::with_loc(
                format!("{message}, got EOF"),
                String::from("EOF"),
                self.input.len(),
            ),
        };
        self.errors.push(error);
        None
    }

    /// Record an error about a token that was already consumed.
    pub(crate) fn err_at<T>(&mut self, message: impl Into<String>, token: &Token) -> Option<T> {
        self.errors.push(Error::with_loc(
            message,
            token.data().to_string(),
            token.index(),
        ));
        None
    }

    /// Location of the next token, or of the end of input.
    pub(crate) fn location(&self) -> Location {
        let index = self
            .tokens
            .last()
            .map_or(self.input.len(), |token| token.index());
        self.line_index.location(index)
    }

    pub(crate) fn location_of(&self, token: &Token) -> Location {
        self.line_index.location(token.index())
    }

    /// Enter one level of nesting, failing past the recursion limit.
    /// Every successful call must be balanced with [`Parser::leave`].
    pub(crate) fn enter(&mut self) -> Option<()> {
        if self.recursion_limit.check_and_increment() {
            self.err("parser recursion limit reached")
        } else {
            Some(())
        }
    }

    pub(crate) fn leave(&mut self) {
        self.recursion_limit.decrement()
    }
}
