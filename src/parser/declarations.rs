//! Grammar rules for declarations and function definitions
//!
//! One method per non-terminal, composed top-down:
//!
//! ```text
//! translation-unit  ::= <global-definition> { <global-definition> }
//! global-definition ::= <function-definition> | <declaration>
//! function-definition ::= <specifiers> <declarator> <compound-statement>
//! declaration       ::= <specifiers> <declarator> { "," <declarator> } ";"
//! specifiers        ::= ( <type-specifier> | <storage-class-specifier> )+
//! declarator        ::= ( "*" | <type-qualifier> )* <direct-declarator>
//! direct-declarator ::= ( "(" <declarator> ")" | <identifier> | e )
//!                       <direct-declarator'>
//! direct-declarator' ::= ( "[" <constant-expression>? "]"
//!                        | "(" <parameter-list> ")"
//!                        | "(" <identifier-list> ")"
//!                        | "(" ")" )*
//! parameter-list    ::= <parameter-declaration> { "," <parameter-declaration> }
//! identifier-list   ::= <identifier> { "," <identifier> }
//! ```
//!
//! The compound-statement body of a function definition is consumed as an
//! opaque unit; statement and expression grammars are not modeled here.
//!
//! Every rule inspects at most one token of lookahead before committing.
//! `global-definition` is the only rule that backtracks: it attempts a
//! function definition and, if no body follows the declarator, rewinds
//! and retries as a declaration.
//!
//! Rules return `Option<NodeId>`: `None` is a structural dead end (no
//! alternative matched), distinct from a recoverable mismatch, which is
//! repaired in place by the `expect` machinery and never fails the rule.

use super::ast::{NodeId, NodeKind};
use super::lexer::{Token, TokenKind};
use super::parse::Parser;

impl Parser {
    /// Parse the whole translation unit into a `List` node of global
    /// definitions. `None` if not a single definition could be parsed.
    pub(crate) fn parse_translation_unit(&mut self) -> Option<NodeId> {
        let root = self.ast.construct_typed(None, NodeKind::List);
        let mut defs = 0;
        while let Some(def) = self.parse_global_defn() {
            debug_assert_eq!(self.ast.node(def).kind, NodeKind::GlobalDef);
            self.ast.append_child(root, Some(def));
            defs += 1;
        }
        if defs == 0 {
            return None;
        }
        Some(root)
    }

    /// global-definition ::= function-definition | declaration
    ///
    /// The sole backtracking point: the function-definition attempt is
    /// speculative, and on failure the cursor rewinds for the
    /// declaration retry.
    fn parse_global_defn(&mut self) -> Option<NodeId> {
        let kind = self.peek_kind()?;
        if !matches!(kind, TokenKind::DType | TokenKind::StorageClass) {
            let (location, found) = self.found_description();
            self.report(
                format!("expected type or storage class specifier{}", found),
                location,
            );
            return None;
        }

        let inner = self
            .attempt(Self::parse_func_def)
            .or_else(|| self.attempt(Self::parse_decl))?;
        let node = self.ast.construct_typed(None, NodeKind::GlobalDef);
        self.ast.append_child(node, Some(inner));
        Some(node)
    }

    /// function-definition ::= specifiers declarator compound-statement
    fn parse_func_def(&mut self) -> Option<NodeId> {
        let node = self.ast.construct_typed(None, NodeKind::FuncDef);
        let specs = self.parse_specifiers()?;
        self.ast.append_child(node, Some(specs));
        let declarator = self.parse_declarator()?;
        self.ast.append_child(node, Some(declarator));

        // Commit point: only a function body distinguishes a definition
        // from a declaration. No brace means this attempt is abandoned.
        if !self.check_oper("{") {
            return None;
        }
        let body = self.parse_compound_statement();
        self.ast.append_child(node, Some(body));
        Some(node)
    }

    /// declaration ::= specifiers declarator { "," declarator } ";"
    fn parse_decl(&mut self) -> Option<NodeId> {
        let node = self.ast.construct_typed(None, NodeKind::Decl);
        let specs = self.parse_specifiers()?;
        self.ast.append_child(node, Some(specs));
        loop {
            let declarator = self.parse_declarator()?;
            self.ast.append_child(node, Some(declarator));
            if !self.match_oper(",") {
                break;
            }
        }
        self.expect_char(';');
        Some(node)
    }

    /// specifiers ::= ( type-specifier | storage-class-specifier )+
    ///
    /// Consumes specifier tokens into terminal children of a `Specs`
    /// node. Finding none at all is reported and propagated as a dead
    /// end.
    fn parse_specifiers(&mut self) -> Option<NodeId> {
        let node = self.ast.construct_typed(None, NodeKind::Specs);
        let mut consumed = 0;
        while let Some(kind) = self.peek_kind() {
            if !matches!(kind, TokenKind::DType | TokenKind::StorageClass) {
                break;
            }
            let leaf = self.leaf_from_current();
            self.ast.append_child(node, Some(leaf));
            consumed += 1;
        }
        if consumed == 0 {
            let (location, found) = self.found_description();
            self.report(
                format!("expected type or storage class specifier{}", found),
                location,
            );
            return None;
        }
        Some(node)
    }

    /// declarator ::= ( "*" | type-qualifier )* direct-declarator
    ///
    /// The pointer/qualifier prefix tokens become terminal children in
    /// source order, followed by the direct-declarator subtree.
    fn parse_declarator(&mut self) -> Option<NodeId> {
        let node = self.ast.construct_typed(None, NodeKind::Declarator);
        while self.peek().is_some_and(Token::begins_pointer_prefix) {
            let leaf = self.leaf_from_current();
            self.ast.append_child(node, Some(leaf));
        }
        let direct = self.parse_direct_declarator()?;
        self.ast.append_child(node, Some(direct));
        Some(node)
    }

    /// direct-declarator ::= ( "(" declarator ")" | identifier | e )
    ///                       direct-declarator'
    ///
    /// A missing name is tolerated (abstract declarators, `int;`); the
    /// suffix chain may still follow.
    fn parse_direct_declarator(&mut self) -> Option<NodeId> {
        let node = self.ast.construct_typed(None, NodeKind::DirectDeclarator);
        if self.match_oper("(") {
            let inner = self.parse_declarator()?;
            self.ast.append_child(node, Some(inner));
            self.expect_char(')');
        } else if self.peek_kind() == Some(TokenKind::Ident) {
            let leaf = self.leaf_from_current();
            self.ast.append_child(node, Some(leaf));
        }
        let suffixes = self.parse_direct_declarator_prime();
        self.ast.append_child(node, suffixes);
        Some(node)
    }

    /// direct-declarator' : array and function suffixes.
    ///
    /// Yields nothing when no suffix is present, so the caller's append
    /// is a no-op. The choice between parameter list and identifier list
    /// is made from the single token after `(`: specifier kinds open a
    /// parameter list, an identifier opens an identifier list, `)`
    /// closes an empty parameter list, and anything else ends the chain.
    fn parse_direct_declarator_prime(&mut self) -> Option<NodeId> {
        let mut node: Option<NodeId> = None;
        loop {
            if self.check_oper("[") {
                let parent = self.prime_node(&mut node);
                self.advance();
                if !self.check_oper("]") {
                    let size = self.parse_constant_expression();
                    self.ast.append_child(parent, Some(size));
                }
                self.expect_char(']');
            } else if self.check_oper("(") {
                let (kind_after, closes) = match self.peek_ahead(1) {
                    Some(token) => (Some(token.kind), token.is_oper(")")),
                    None => (None, false),
                };
                let is_params = kind_after.is_some_and(TokenKind::is_specifier);
                let is_idents = kind_after == Some(TokenKind::Ident);
                if !is_params && !is_idents && !closes {
                    break;
                }
                let parent = self.prime_node(&mut node);
                self.advance();
                let list = if closes {
                    self.ast.construct_typed(None, NodeKind::List)
                } else if is_idents {
                    self.parse_identifier_list()
                } else {
                    self.parse_parameter_list()
                };
                self.ast.append_child(parent, Some(list));
                self.expect_char(')');
            } else {
                break;
            }
        }
        node
    }

    /// The suffix chain's node, allocated on first use.
    fn prime_node(&mut self, node: &mut Option<NodeId>) -> NodeId {
        match *node {
            Some(existing) => existing,
            None => {
                let fresh =
                    self.ast.construct_typed(None, NodeKind::DirectDeclarator);
                *node = Some(fresh);
                fresh
            }
        }
    }

    /// parameter-list ::= parameter-declaration { "," parameter-declaration }
    fn parse_parameter_list(&mut self) -> NodeId {
        let list = self.ast.construct_typed(None, NodeKind::List);
        loop {
            let Some(param) = self.parse_parameter_declaration() else {
                break;
            };
            self.ast.append_child(list, Some(param));
            if !self.match_oper(",") {
                break;
            }
        }
        list
    }

    /// parameter-declaration ::= specifiers declarator
    fn parse_parameter_declaration(&mut self) -> Option<NodeId> {
        let node = self.ast.construct_typed(None, NodeKind::Decl);
        let specs = self.parse_specifiers()?;
        self.ast.append_child(node, Some(specs));
        let declarator = self.parse_declarator()?;
        self.ast.append_child(node, Some(declarator));
        Some(node)
    }

    /// identifier-list ::= identifier { "," identifier }
    ///
    /// The suffix dispatch has already established that an identifier is
    /// next; anything else here is a user mistake, repaired in place.
    fn parse_identifier_list(&mut self) -> NodeId {
        let list = self.ast.construct_typed(None, NodeKind::List);
        let first = self.expect_kind(TokenKind::Ident);
        let leaf = self.ast.construct(Some(first));
        self.ast.append_child(list, Some(leaf));
        while self.match_oper(",") {
            let ident = self.expect_kind(TokenKind::Ident);
            let leaf = self.ast.construct(Some(ident));
            self.ast.append_child(list, Some(leaf));
        }
        list
    }

    /// constant-expression, reduced to an integer literal. The full
    /// expression grammar is outside this parser.
    fn parse_constant_expression(&mut self) -> NodeId {
        let token = self.expect_kind(TokenKind::IntLit);
        self.ast.construct(Some(token))
    }

    /// compound-statement, consumed as an opaque unit: the braces are
    /// balanced and everything inside is skipped. The resulting `Stat`
    /// node references the opening brace.
    fn parse_compound_statement(&mut self) -> NodeId {
        let open = self.expect_char('{');
        let node = self.ast.construct_typed(Some(open), NodeKind::Stat);
        let mut depth = 1usize;
        while depth > 0 {
            let Some(token) = self.peek() else {
                self.expect_char('}');
                break;
            };
            let opens = token.is_oper("{");
            let closes = token.is_oper("}");
            self.advance();
            if opens {
                depth += 1;
            } else if closes {
                depth -= 1;
            }
        }
        node
    }
}
