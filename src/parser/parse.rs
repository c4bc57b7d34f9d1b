//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: the token cursor, the parse status and diagnostic
//! list, the `expect`/recovery machinery, and the backtracking `attempt`
//! combinator. The grammar rules themselves live in `declarations` as
//! additional `impl Parser` blocks.
//!
//! # Error model
//!
//! A mismatched expectation is not a Rust error: the parser latches
//! [`ParseStatus::Error`], records a [`Diagnostic`], splices a synthetic
//! token of the expected shape into the sequence, and keeps going. Only
//! lexical failures (see [`LexError`]) abort the whole operation.

use super::ast::{Ast, NodeId, SourceLocation, TokenId};
use super::lexer::{LexError, Lexer, Token, TokenKind};
use super::recovery::{Expectation, PanicMode, Recovery, RecoveryStrategy};
use std::fmt;
use tracing::{debug, error};

/// Parser status, latched across the whole translation unit.
///
/// `Normal` is the in-progress state and is resolved to `Success` when
/// the parse finishes clean. `Aborted` is reserved for unrecoverable
/// internal conditions; no current rule produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Normal,
    Error,
    Failed,
    Aborted,
    Success,
}

/// One reported parse error, also emitted through `tracing` at the
/// moment of detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.location, self.message)
    }
}

/// Everything a parse produces: the arena (which owns the token
/// sequence), the root of the translation unit if one was built, the
/// final status, and the diagnostics in detection order.
#[derive(Debug)]
pub struct ParseOutcome {
    pub ast: Ast,
    pub root: Option<NodeId>,
    pub status: ParseStatus,
    pub diagnostics: Vec<Diagnostic>,
}

/// Recursive descent parser for the C subset.
pub struct Parser {
    pub(crate) ast: Ast,
    pub(crate) position: usize,
    pub(crate) status: ParseStatus,
    pub(crate) diagnostics: Vec<Diagnostic>,
    recovery: Box<dyn RecoveryStrategy>,
    next_uid: u32,
    last_location: SourceLocation,
}

impl Parser {
    /// Tokenize `source` and set up a parser over the result.
    pub fn new(source: &str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Set up a parser over an already-produced token sequence.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let next_uid = tokens.iter().map(|t| t.uid).max().map_or(0, |m| m + 1);
        Self {
            ast: Ast::with_tokens(tokens),
            position: 0,
            status: ParseStatus::Normal,
            diagnostics: Vec::new(),
            recovery: Box::new(PanicMode),
            next_uid,
            last_location: SourceLocation::new(1, 1),
        }
    }

    /// Replace the error-recovery strategy (panic-mode substitution by
    /// default).
    pub fn with_recovery(mut self, recovery: Box<dyn RecoveryStrategy>) -> Self {
        self.recovery = recovery;
        self
    }

    /// Parse one translation unit and hand back everything that was
    /// built. An input with no global definitions at all yields no root
    /// and status `Failed`.
    pub fn parse(mut self) -> ParseOutcome {
        let root = self.parse_translation_unit();
        let status = match (self.status, root.is_some()) {
            (ParseStatus::Normal, true) => ParseStatus::Success,
            (ParseStatus::Normal, false) => ParseStatus::Failed,
            (latched, _) => latched,
        };
        debug!(
            ?status,
            nodes = self.ast.node_count(),
            diagnostics = self.diagnostics.len(),
            "parse finished"
        );
        ParseOutcome {
            ast: self.ast,
            root,
            status,
            diagnostics: self.diagnostics,
        }
    }

    // ===== Cursor helpers =====

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.ast.tokens.get(self.position)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.ast.tokens.get(self.position + n)
    }

    pub(crate) fn advance(&mut self) {
        if let Some(token) = self.ast.tokens.get(self.position) {
            self.last_location = token.location;
            self.position += 1;
        }
    }

    pub(crate) fn check_oper(&self, spelling: &str) -> bool {
        self.peek().is_some_and(|t| t.is_oper(spelling))
    }

    pub(crate) fn match_oper(&mut self, spelling: &str) -> bool {
        if self.check_oper(spelling) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Wrap the current token in a terminal node and consume it. Callers
    /// must have peeked the token first.
    pub(crate) fn leaf_from_current(&mut self) -> NodeId {
        let node = self.ast.construct(Some(self.position));
        self.advance();
        node
    }

    /// Run a speculative sub-rule: commit the cursor on success, restore
    /// it on failure. Diagnostics, the latched status, and any spliced
    /// synthetic tokens deliberately survive a failed attempt; orphaned
    /// speculative nodes stay in the arena unreferenced.
    pub(crate) fn attempt<F>(&mut self, rule: F) -> Option<NodeId>
    where
        F: FnOnce(&mut Self) -> Option<NodeId>,
    {
        let saved = self.position;
        let result = rule(self);
        if result.is_none() {
            self.position = saved;
        }
        result
    }

    // ===== Expectations and recovery =====

    /// Consume a token of `kind`, or report, splice a synthetic
    /// placeholder, and consume that instead.
    pub(crate) fn expect_kind(&mut self, kind: TokenKind) -> TokenId {
        if self.peek().is_some_and(|t| t.kind == kind) {
            let id = self.position;
            self.advance();
            id
        } else {
            self.recover_expected(Expectation::Kind(kind))
        }
    }

    /// Consume a single-character operator token, or report, splice a
    /// synthetic placeholder, and consume that instead.
    pub(crate) fn expect_char(&mut self, c: char) -> TokenId {
        let mut buf = [0u8; 4];
        let spelling: &str = c.encode_utf8(&mut buf);
        if self.check_oper(spelling) {
            let id = self.position;
            self.advance();
            id
        } else {
            self.recover_expected(Expectation::Char(c))
        }
    }

    fn recover_expected(&mut self, expectation: Expectation) -> TokenId {
        let (location, found) = self.found_description();
        self.report(format!("expected {}{}", expectation, found), location);

        let uid = self.next_uid;
        self.next_uid += 1;
        match self.recovery.recover(&expectation, location, uid) {
            Recovery::Substitute(token) => {
                if self.position < self.ast.tokens.len() {
                    self.ast.tokens[self.position] = token;
                } else {
                    self.ast.tokens.push(token);
                }
            }
            Recovery::Insert(token) => {
                self.ast.tokens.insert(self.position, token);
            }
        }
        let id = self.position;
        self.advance();
        id
    }

    /// Record a diagnostic, latch the error status, and emit immediately.
    pub(crate) fn report(&mut self, message: String, location: SourceLocation) {
        error!(line = location.line, column = location.column, "{}", message);
        self.status = ParseStatus::Error;
        self.diagnostics.push(Diagnostic { message, location });
    }

    /// Location and ", found ..." suffix describing the current token,
    /// for diagnostics.
    pub(crate) fn found_description(&self) -> (SourceLocation, String) {
        match self.peek() {
            Some(token) => (token.location, format!(", found {}", token)),
            None => (self.last_location, ", found end of input".to_string()),
        }
    }
}
