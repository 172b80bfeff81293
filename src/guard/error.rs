//! Errors raised while compiling a guard string.

use super::token::Token;
use thiserror::Error;

/// A character the tokenizer does not recognize.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unexpected character {ch:?} at offset {offset}")]
pub struct LexError {
    pub ch: char,
    /// Byte offset into the guard string
    pub offset: usize,
}

/// A token sequence that does not form an expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected a condition, '(' or '!' but the guard ended")]
    UnexpectedEnd,

    #[error("Expected a condition, '(' or '!' but found {token} at token {position}")]
    UnexpectedToken { token: Token, position: usize },

    #[error("Guard nests deeper than {max} levels")]
    TooDeep { max: usize },
}

/// Either stage of guard compilation failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
