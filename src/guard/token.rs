//! Guard tokenizer.

use super::error::LexError;
use crate::core::{ConditionId, ConditionTable};
use std::fmt;

/// Lexical token of the guard language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Condition(ConditionId),
    And,
    Or,
    Open,
    Close,
    Not,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condition(id) => write!(f, "condition #{}", id.index()),
            Self::And => f.write_str("'&'"),
            Self::Or => f.write_str("'|'"),
            Self::Open => f.write_str("'('"),
            Self::Close => f.write_str("')'"),
            Self::Not => f.write_str("'!'"),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split `source` into tokens, interning condition names into `conditions`.
///
/// Names are maximal runs of ASCII letters, digits and `_`. Whitespace is
/// skipped. Names seen before a failing character stay interned.
///
/// # Example
///
/// ```rust
/// use guardfsm::core::ConditionTable;
/// use guardfsm::guard::{tokenize, Token};
///
/// let mut conditions = ConditionTable::new();
/// let tokens = tokenize("!ready & go", &mut conditions).unwrap();
///
/// let ready = conditions.lookup("ready").unwrap();
/// let go = conditions.lookup("go").unwrap();
/// assert_eq!(
///     tokens,
///     vec![Token::Not, Token::Condition(ready), Token::And, Token::Condition(go)]
/// );
/// ```
pub fn tokenize(source: &str, conditions: &mut ConditionTable) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '&' => Token::And,
            '|' => Token::Or,
            '(' => Token::Open,
            ')' => Token::Close,
            '!' => Token::Not,
            c if is_name_char(c) => {
                let mut end = offset + c.len_utf8();
                while let Some(&(next, c)) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    end = next + c.len_utf8();
                    chars.next();
                }
                Token::Condition(conditions.intern(&source[offset..end]))
            }
            ch => return Err(LexError { ch, offset }),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_and_parens() {
        let mut conditions = ConditionTable::new();
        let tokens = tokenize("&|()!", &mut conditions).unwrap();
        assert_eq!(
            tokens,
            vec![Token::And, Token::Or, Token::Open, Token::Close, Token::Not]
        );
        assert!(conditions.is_empty());
    }

    #[test]
    fn names_are_maximal_runs() {
        let mut conditions = ConditionTable::new();
        let tokens = tokenize("door_open2&&x", &mut conditions).unwrap();

        let door = conditions.lookup("door_open2").unwrap();
        let x = conditions.lookup("x").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Condition(door),
                Token::And,
                Token::And,
                Token::Condition(x)
            ]
        );
    }

    #[test]
    fn repeated_name_reuses_condition() {
        let mut conditions = ConditionTable::new();
        let tokens = tokenize("A | A", &mut conditions).unwrap();
        assert_eq!(tokens[0], tokens[2]);
        assert_eq!(conditions.len(), 1);
    }

    #[test]
    fn whitespace_is_skipped() {
        let mut conditions = ConditionTable::new();
        let tokens = tokenize(" \tA \n", &mut conditions).unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn empty_source_gives_no_tokens() {
        let mut conditions = ConditionTable::new();
        assert!(tokenize("", &mut conditions).unwrap().is_empty());
    }

    #[test]
    fn unknown_character_fails_with_offset() {
        let mut conditions = ConditionTable::new();
        let err = tokenize("A & B + C", &mut conditions).unwrap_err();
        assert_eq!(err, LexError { ch: '+', offset: 6 });
    }

    #[test]
    fn non_ascii_letters_are_rejected() {
        let mut conditions = ConditionTable::new();
        let err = tokenize("café", &mut conditions).unwrap_err();
        assert_eq!(err.ch, 'é');
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn names_before_error_stay_interned() {
        let mut conditions = ConditionTable::new();
        assert!(tokenize("seen & #", &mut conditions).is_err());
        assert!(conditions.lookup("seen").is_some());
    }
}
