#![doc = include_str!("../README.md")]

mod lexer;

pub mod ast;
mod error;
mod limit;
mod location;
mod parser;

pub use crate::lexer::Lexer;
pub use crate::lexer::{Token, TokenKind};
pub use crate::parser::{ParseResult, Parser, DEFAULT_RECURSION_LIMIT};

pub use crate::error::Error;
pub use crate::limit::LimitTracker;
pub use crate::location::{LineIndex, Location};
