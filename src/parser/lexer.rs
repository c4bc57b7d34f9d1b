//! Lexer (tokenizer) for the C subset
//!
//! Converts raw source text into a flat [`Token`] sequence consumed by the
//! parser. The scanner is a single pass with one character of lookahead;
//! identifier-shaped spellings are classified through the reserved-word
//! tables in [`super::symbols`].

use super::ast::SourceLocation;
use super::symbols::ReservedWords;
use std::fmt;
use thiserror::Error;

/// Token classification.
///
/// `StrLit` is reserved: the scanner never produces it, but diagnostics can
/// name it and the parser's expectation machinery accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    IntLit,
    StrLit,
    Oper,
    Keyword,
    DType,
    StorageClass,
    TypeQual,
}

impl TokenKind {
    /// Human-readable category name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::IntLit => "integer literal",
            TokenKind::StrLit => "string literal",
            TokenKind::Oper => "operator",
            TokenKind::Keyword => "keyword",
            TokenKind::DType => "type specifier",
            TokenKind::StorageClass => "storage class specifier",
            TokenKind::TypeQual => "type qualifier",
        }
    }

    /// True for the kinds that can open a declaration: type names, storage
    /// classes, and qualifiers.
    pub fn is_specifier(self) -> bool {
        matches!(
            self,
            TokenKind::DType | TokenKind::StorageClass | TokenKind::TypeQual
        )
    }
}

/// Token payload: a spelling or a 64-bit integer value, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Spelling(String),
    Int(i64),
}

/// One classified lexical unit.
///
/// Integer literals carry a [`Payload::Int`]; every other kind carries its
/// spelling. Tokens are produced in source order with monotonically
/// assigned `uid`s; the parser may splice in synthetic tokens (with fresh
/// `uid`s) during error recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: Payload,
    pub location: SourceLocation,
    pub uid: u32,
}

impl Token {
    /// The spelling, for any token that has one.
    pub fn spelling(&self) -> Option<&str> {
        match &self.payload {
            Payload::Spelling(s) => Some(s),
            Payload::Int(_) => None,
        }
    }

    /// The integer value of an `IntLit` token.
    pub fn int_value(&self) -> Option<i64> {
        match self.payload {
            Payload::Int(value) => Some(value),
            Payload::Spelling(_) => None,
        }
    }

    /// True if this is an operator token with exactly this spelling.
    pub fn is_oper(&self, spelling: &str) -> bool {
        self.kind == TokenKind::Oper && self.spelling() == Some(spelling)
    }

    /// True if this token can begin a declarator's pointer/qualifier
    /// prefix: the `*` operator or a type qualifier.
    pub fn begins_pointer_prefix(&self) -> bool {
        self.is_oper("*") || self.kind == TokenKind::TypeQual
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.payload) {
            (TokenKind::Ident, Payload::Spelling(s)) => {
                write!(f, "identifier '{}'", s)
            }
            (_, Payload::Spelling(s)) => write!(f, "'{}'", s),
            (_, Payload::Int(value)) => write!(f, "integer literal {}", value),
        }
    }
}

/// Fatal tokenization failure. Grammar-level problems are recovered inside
/// the parser; a lexical error aborts the whole operation.
#[derive(Debug, Error)]
#[error("lexical error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Operator and structural characters, tokenized individually or (by
/// maximal munch) in recognized two-character pairs.
const OPERATORS: [char; 20] = [
    '=', '+', '-', '*', '/', '&', '|', '^', '!', '{', '}', '[', ']', '(', ')',
    '<', '>', '%', ';', ',',
];

/// Two-character operators the scanner coalesces. One character of
/// lookahead bounds operators at two characters.
const TWO_CHAR_OPERATORS: [&str; 18] = [
    "==", "!=", "<=", ">=", "<<", ">>", "&&", "||", "++", "--", "+=", "-=",
    "*=", "/=", "%=", "&=", "|=", "->",
];

pub(crate) fn is_operator_char(c: char) -> bool {
    OPERATORS.contains(&c)
}

/// Lexer for the C subset.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    reserved: ReservedWords,
    word: String,
    number: String,
    next_uid: u32,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            reserved: ReservedWords::new(),
            // Buffers are reused across flushes: cleared, not reallocated.
            word: String::with_capacity(7),
            number: String::with_capacity(7),
            next_uid: 0,
        }
    }

    /// Tokenize the entire input. Whitespace-only input yields an empty
    /// sequence.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = match self.advance() {
            Some(ch) => ch,
            None => {
                return Err(LexError {
                    message: "unexpected end of input".to_string(),
                    location: loc,
                })
            }
        };

        if is_operator_char(ch) {
            Ok(self.operator(ch, loc))
        } else if ch.is_ascii_alphabetic() {
            Ok(self.identifier_or_reserved(ch, loc))
        } else if ch.is_ascii_digit() {
            self.integer_literal(ch, loc)
        } else {
            Err(LexError {
                message: format!("unexpected character '{}'", ch),
                location: loc,
            })
        }
    }

    /// Scan an operator, coalescing recognized two-character spellings.
    fn operator(&mut self, first: char, loc: SourceLocation) -> Token {
        let mut spelling = String::from(first);
        if let Some(next) = self.peek() {
            if is_operator_char(next) {
                spelling.push(next);
                if TWO_CHAR_OPERATORS.contains(&spelling.as_str()) {
                    self.advance();
                } else {
                    spelling.pop();
                }
            }
        }
        self.token(TokenKind::Oper, Payload::Spelling(spelling), loc)
    }

    /// Scan an identifier-shaped word and classify it through the
    /// reserved-word tables. Accumulation stops at an operator character,
    /// a space, or any non-printable character.
    fn identifier_or_reserved(&mut self, first: char, loc: SourceLocation) -> Token {
        self.word.clear();
        self.word.push(first);

        while let Some(ch) = self.peek() {
            if is_operator_char(ch) || !ch.is_ascii_graphic() {
                break;
            }
            self.word.push(ch);
            self.advance();
        }

        let kind = self.reserved.classify(&self.word);
        let spelling = self.word.clone();
        self.token(kind, Payload::Spelling(spelling), loc)
    }

    /// Scan a decimal integer literal into a 64-bit value.
    fn integer_literal(
        &mut self,
        first: char,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        self.number.clear();
        self.number.push(first);

        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.number.push(ch);
            self.advance();
        }

        let value = self.number.parse::<i64>().map_err(|_| LexError {
            message: format!("integer literal out of range: {}", self.number),
            location: loc,
        })?;

        Ok(self.token(TokenKind::IntLit, Payload::Int(value), loc))
    }

    fn token(
        &mut self,
        kind: TokenKind,
        payload: Payload,
        location: SourceLocation,
    ) -> Token {
        let uid = self.next_uid;
        self.next_uid += 1;
        Token {
            kind,
            payload,
            location,
            uid,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Peek at the current character without consuming.
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to the next character, tracking line and column.
    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().expect("tokenize failed")
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(lex("").is_empty());
        assert!(lex("   \t\n  \r\n ").is_empty());
    }

    #[test]
    fn test_reserved_word_classification() {
        for word in ["if", "else", "while", "return"] {
            let tokens = lex(word);
            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].kind, TokenKind::Keyword);
            assert_eq!(tokens[0].spelling(), Some(word));
        }
        for word in ["int", "char"] {
            let tokens = lex(word);
            assert_eq!(tokens.len(), 1);
            assert_eq!(tokens[0].kind, TokenKind::DType);
            assert_eq!(tokens[0].spelling(), Some(word));
        }
        let tokens = lex("whilst");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
    }

    #[test]
    fn test_integer_literal_value() {
        let tokens = lex("40096");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::IntLit);
        assert_eq!(tokens[0].int_value(), Some(40096));
        assert_eq!(tokens[0].spelling(), None);
    }

    #[test]
    fn test_integer_overflow_is_fatal() {
        let result = Lexer::new("99999999999999999999").tokenize();
        assert!(result.is_err());
    }

    #[test]
    fn test_unexpected_character_is_fatal() {
        let result = Lexer::new("int x @").tokenize();
        let err = result.expect_err("expected a lexical error");
        assert!(err.message.contains('@'));
    }

    #[test]
    fn test_maximal_munch_operators() {
        let tokens = lex("== != <= >= << >> && || ++ -- += -> =");
        let spellings: Vec<&str> =
            tokens.iter().filter_map(Token::spelling).collect();
        assert_eq!(
            spellings,
            vec![
                "==", "!=", "<=", ">=", "<<", ">>", "&&", "||", "++", "--",
                "+=", "->", "="
            ]
        );
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Oper));
    }

    #[test]
    fn test_adjacent_operators_split_correctly() {
        // `a<=b` is identifier, one two-character operator, identifier.
        let tokens = lex("a<=b");
        assert_eq!(tokens.len(), 3);
        assert!(tokens[1].is_oper("<="));
        // `(;` is two structural tokens, not a pair.
        let tokens = lex("(;");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_oper("("));
        assert!(tokens[1].is_oper(";"));
    }

    #[test]
    fn test_declaration_token_stream() {
        let tokens = lex("int x1 ;");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::DType);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        assert_eq!(tokens[1].spelling(), Some("x1"));
        assert!(tokens[2].is_oper(";"));
    }

    #[test]
    fn test_positions_track_lines_and_columns() {
        let tokens = lex("int x;\n  char y;");
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[2].location, SourceLocation::new(1, 6));
        assert_eq!(tokens[3].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[4].location, SourceLocation::new(2, 8));
        assert_eq!(tokens[5].location, SourceLocation::new(2, 9));

        // Line numbers never decrease across the sequence.
        let lines: Vec<usize> = tokens.iter().map(|t| t.location.line).collect();
        assert!(lines.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_uids_are_monotonic() {
        let tokens = lex("int main ( ) { return 0 ; }");
        for (index, token) in tokens.iter().enumerate() {
            assert_eq!(token.uid as usize, index);
        }
    }
}
