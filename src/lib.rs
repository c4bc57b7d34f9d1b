//! # Introduction
//!
//! cminus is the front end of a compiler for a small C-like imperative
//! language subset: a hand-written tokenizer and a recursive-descent
//! parser producing an arena-based AST of top-level declarations,
//! function definitions, and declarators.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Token sequence → Parser → AST + status + diagnostics
//! ```
//!
//! 1. [`parser::tokenize`] classifies the character stream into tokens,
//!    consulting the reserved-word tables for keyword/type spellings.
//! 2. [`parser::parse`] consumes the token sequence top-down; grammar
//!    mismatches are repaired in place by splicing a synthetic token of
//!    the expected shape, so one pass can report several independent
//!    errors and still return a structurally valid tree.
//!
//! The crate is library-shaped: reading source text from storage,
//! semantic analysis, and any command-line surface belong to the caller.
//!
//! ## Supported C subset
//!
//! Keywords: `if`, `else`, `while`, `return`. Types: `int`, `char`.
//! Storage classes: `static`, `extern`. Qualifier: `const`.
//! Declarators: pointers, arrays, parameter lists, K&R identifier lists.
//! Function bodies are consumed as opaque compound statements.

pub mod parser;
