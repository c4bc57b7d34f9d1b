//! Error-recovery strategies
//!
//! When a grammar rule's expectation is not met, the parser asks the
//! active [`RecoveryStrategy`] for a synthetic token of the expected shape
//! and splices it into the sequence so parsing can continue past the
//! error site. The resulting subtree is structurally valid but carries a
//! placeholder at the failure point.

use super::ast::SourceLocation;
use super::lexer::{Payload, Token, TokenKind};
use std::fmt;

/// What a grammar rule expected to find at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Kind(TokenKind),
    Char(char),
}

impl Expectation {
    /// Build the placeholder token that stands in for the expected input.
    pub fn placeholder(&self, location: SourceLocation, uid: u32) -> Token {
        match *self {
            Expectation::Kind(kind) => {
                let payload = match kind {
                    TokenKind::IntLit => Payload::Int(0),
                    _ => Payload::Spelling(String::new()),
                };
                Token {
                    kind,
                    payload,
                    location,
                    uid,
                }
            }
            Expectation::Char(c) => Token {
                kind: TokenKind::Oper,
                payload: Payload::Spelling(c.to_string()),
                location,
                uid,
            },
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Expectation::Kind(kind) => write!(f, "{}", kind.describe()),
            Expectation::Char(c) => write!(f, "'{}'", c),
        }
    }
}

/// How the synthetic token should be spliced into the sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovery {
    /// Replace the offending token; the rest of the sequence is
    /// unaffected.
    Substitute(Token),
    /// Insert before the offending token, which is re-examined by the
    /// next rule.
    Insert(Token),
}

/// Pluggable policy for resuming after a mismatched expectation.
pub trait RecoveryStrategy: fmt::Debug {
    fn recover(
        &self,
        expectation: &Expectation,
        location: SourceLocation,
        uid: u32,
    ) -> Recovery;
}

/// Single-token panic-mode substitution: the offending token is dropped
/// and a placeholder of the expected shape takes its position. The
/// default strategy.
#[derive(Debug, Default)]
pub struct PanicMode;

impl RecoveryStrategy for PanicMode {
    fn recover(
        &self,
        expectation: &Expectation,
        location: SourceLocation,
        uid: u32,
    ) -> Recovery {
        Recovery::Substitute(expectation.placeholder(location, uid))
    }
}

/// Insert-and-continue: the placeholder is spliced in front of the
/// offending token, which stays in the sequence for later rules.
#[derive(Debug, Default)]
pub struct InsertBefore;

impl RecoveryStrategy for InsertBefore {
    fn recover(
        &self,
        expectation: &Expectation,
        location: SourceLocation,
        uid: u32,
    ) -> Recovery {
        Recovery::Insert(expectation.placeholder(location, uid))
    }
}
