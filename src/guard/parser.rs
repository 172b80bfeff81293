//! Recursive-descent parser for guard token sequences.
//!
//! The grammar has no precedence between `&` and `|`:
//!
//! ```text
//! primary := CONDITION | '(' expr | '!' primary
//! expr    := primary [ ('&' | '|') expr ]
//! ```
//!
//! After a primary, the token that follows is consumed. An operator makes the
//! whole remainder its right operand, so `A & B | C` means `A & (B | C)`.
//! Any other token, normally `)`, simply ends the clause. Parentheses are
//! never checked for balance, and tokens left after the outermost clause are
//! ignored.

use super::error::ParseError;
use super::token::Token;
use crate::core::{ExprId, ExprPool};

/// Maximum recursion depth accepted by [`parse`].
pub const MAX_NESTING: usize = 256;

/// Read position over a token slice.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Index of the next unread token.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).copied()?;
        self.position += 1;
        Some(token)
    }
}

/// Build an expression tree from `tokens` into `pool`.
///
/// Returns `Ok(None)` for an empty sequence. On error every node this call
/// appended is removed again, so the pool is left as it was.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::{ConditionTable, ExprPool};
/// use guardfsm::guard::{parse, tokenize};
///
/// let mut conditions = ConditionTable::new();
/// let mut pool = ExprPool::new();
/// let tokens = tokenize("A & B | C", &mut conditions).unwrap();
/// let root = parse(&tokens, &mut pool).unwrap().unwrap();
///
/// assert_eq!(pool.render(root, &conditions), "and(A, or(B, C))");
/// ```
pub fn parse(tokens: &[Token], pool: &mut ExprPool) -> Result<Option<ExprId>, ParseError> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let mark = pool.len();
    let mut cursor = Cursor::new(tokens);
    match expr(&mut cursor, pool, 0) {
        Ok(root) => Ok(Some(root)),
        Err(err) => {
            pool.truncate(mark);
            Err(err)
        }
    }
}

fn expr(cursor: &mut Cursor<'_>, pool: &mut ExprPool, depth: usize) -> Result<ExprId, ParseError> {
    let left = primary(cursor, pool, depth)?;

    match cursor.advance() {
        Some(Token::And) => {
            let right = expr(cursor, pool, depth + 1)?;
            Ok(pool.and(left, right))
        }
        Some(Token::Or) => {
            let right = expr(cursor, pool, depth + 1)?;
            Ok(pool.or(left, right))
        }
        _ => Ok(left),
    }
}

fn primary(
    cursor: &mut Cursor<'_>,
    pool: &mut ExprPool,
    depth: usize,
) -> Result<ExprId, ParseError> {
    if depth > MAX_NESTING {
        return Err(ParseError::TooDeep { max: MAX_NESTING });
    }

    let position = cursor.position();
    match cursor.advance() {
        None => Err(ParseError::UnexpectedEnd),
        Some(Token::Condition(id)) => Ok(pool.condition(id)),
        Some(Token::Open) => expr(cursor, pool, depth + 1),
        Some(Token::Not) => {
            let child = primary(cursor, pool, depth + 1)?;
            Ok(pool.not(child))
        }
        Some(token) => Err(ParseError::UnexpectedToken { token, position }),
    }
}
