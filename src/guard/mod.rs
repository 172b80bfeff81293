//! Guard expression compiler.
//!
//! Guards are small boolean expressions over condition names, written with
//! `!`, `&`, `|` and parentheses:
//!
//! ```text
//! !(door_locked) & (key_used | forced)
//! ```
//!
//! Compilation runs in two passes. [`tokenize`] turns the source into a flat
//! token list and interns every condition name it meets. [`parse`] then
//! builds the expression tree in the machine's [`ExprPool`].
//!
//! `&` and `|` share one binding level and an operator takes everything to
//! its right as its second operand. See [`parser`] for the exact grammar.

mod error;
pub mod parser;
mod token;

pub use error::{GuardError, LexError, ParseError};
pub use parser::{parse, Cursor, MAX_NESTING};
pub use token::{tokenize, Token};

use crate::core::{ConditionTable, ExprId, ExprPool};

/// Tokenize and parse `source` in one step.
///
/// Returns `Ok(None)` when the guard contains no tokens.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::{ConditionTable, ExprPool};
/// use guardfsm::guard::compile;
///
/// let mut conditions = ConditionTable::new();
/// let mut pool = ExprPool::new();
/// let root = compile("armed & !disarmed", &mut conditions, &mut pool)
///     .unwrap()
///     .unwrap();
///
/// conditions.set(conditions.lookup("armed").unwrap(), true);
/// assert!(pool.evaluate(root, &conditions));
/// ```
pub fn compile(
    source: &str,
    conditions: &mut ConditionTable,
    pool: &mut ExprPool,
) -> Result<Option<ExprId>, GuardError> {
    let tokens = tokenize(source, conditions)?;
    Ok(parse(&tokens, pool)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_reports_lex_errors() {
        let mut conditions = ConditionTable::new();
        let mut pool = ExprPool::new();
        let err = compile("A ^ B", &mut conditions, &mut pool).unwrap_err();
        assert!(matches!(err, GuardError::Lex(LexError { ch: '^', .. })));
        assert!(pool.is_empty());
    }

    #[test]
    fn compile_reports_parse_errors() {
        let mut conditions = ConditionTable::new();
        let mut pool = ExprPool::new();
        let err = compile("A |", &mut conditions, &mut pool).unwrap_err();
        assert_eq!(err, GuardError::Parse(ParseError::UnexpectedEnd));
    }

    #[test]
    fn compiled_guard_follows_condition_values() {
        let mut conditions = ConditionTable::new();
        let mut pool = ExprPool::new();
        let root = compile("X & Y", &mut conditions, &mut pool)
            .unwrap()
            .unwrap();

        let x = conditions.lookup("X").unwrap();
        let y = conditions.lookup("Y").unwrap();
        conditions.pulse(x);
        assert!(!pool.evaluate(root, &conditions));

        conditions.set(y, true);
        assert!(pool.evaluate(root, &conditions));
    }

    #[test]
    fn errors_display_readably() {
        let err = GuardError::from(LexError { ch: '$', offset: 4 });
        assert_eq!(err.to_string(), "Unexpected character '$' at offset 4");
    }
}
