//! C-subset front end
//!
//! This module transforms source text into an abstract syntax tree:
//! - [`symbols`]: reserved-word tables (keyword/type classification)
//! - [`lexer`]: tokenization (source text → tokens)
//! - [`parse`]: recursive descent parsing (tokens → AST)
//! - [`recovery`]: pluggable error-recovery strategies
//! - [`ast`]: arena-based AST definitions
//!
//! # Supported subset
//!
//! Top-level declarations and function definitions only: specifiers
//! (`int`, `char`, `static`, `extern`), declarators with pointer and
//! `const`-qualifier prefixes, array and function suffixes, parameter
//! lists, and K&R identifier lists. A function body is consumed as one
//! opaque compound statement; statements and expressions inside it are
//! not modeled.
//!
//! # Parser implementation
//!
//! Hand-written recursive descent with one token of lookahead and
//! single-token error recovery. No parser generator dependencies.

pub mod ast;
mod declarations;
pub mod lexer;
pub mod parse;
pub mod recovery;
pub mod symbols;

use lexer::{LexError, Lexer, Token};
use parse::{ParseOutcome, Parser};

/// Tokenize a character stream into a token sequence. Whitespace-only
/// input yields an empty sequence; lexical failures abort.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Parse a token sequence into a translation-unit AST plus final status
/// and diagnostics.
pub fn parse(tokens: Vec<Token>) -> ParseOutcome {
    Parser::from_tokens(tokens).parse()
}
