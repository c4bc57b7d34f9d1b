//! AST (Abstract Syntax Tree) definitions
//!
//! Nodes live in an arena ([`Ast`]) and reference each other by index:
//! children are owned indices, the parent back-reference is a plain index
//! used for diagnostics only. The arena also owns the token sequence the
//! tree was built from, so tokens are guaranteed to outlive every node
//! that references one and both are torn down together.

use super::lexer::Token;
use std::fmt;

/// Unique identifier for AST nodes, assigned monotonically by the arena.
pub type NodeId = usize;

/// Index of a token within the arena's token sequence.
pub type TokenId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Grammar construct a node represents.
///
/// `Nop` doubles as the terminal wrapper: a `Nop` node with a token
/// reference wraps a single consumed token, while a `Nop` node without
/// one is a functionally empty placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    GlobalDef,
    FuncDef,
    Decl,
    Stat,
    Nop,
    List,
    Specs,
    Declarator,
    DirectDeclarator,
}

/// Fixed child slots used by [`Ast::assemble`] for binary/ternary forms.
pub const LHS: usize = 0;
pub const RHS: usize = 1;
pub const OPT: usize = 2;

/// Initial child capacity of a fresh node; doubles on overflow.
pub const DEFAULT_CHILD_CAPACITY: usize = 3;

/// One node of the tree.
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// The token that introduced this node; absent for purely structural
    /// nodes such as lists.
    pub token: Option<TokenId>,
    /// Back-reference for diagnostics only, never used for traversal.
    pub parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Child ids in append order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A terminal wraps exactly one consumed token.
    pub fn is_terminal(&self) -> bool {
        self.kind == NodeKind::Nop && self.token.is_some()
    }
}

/// Arena holding every node of one translation unit plus the token
/// sequence the parser consumed to build it.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    pub tokens: Vec<Token>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena seeded with the token sequence to be consumed.
    pub fn with_tokens(tokens: Vec<Token>) -> Self {
        Self {
            nodes: Vec::new(),
            tokens,
        }
    }

    /// Allocate a terminal node wrapping `token`.
    pub fn construct(&mut self, token: Option<TokenId>) -> NodeId {
        self.construct_typed(token, NodeKind::Nop)
    }

    /// Allocate a node with an explicit kind. Structural nodes pass no
    /// token.
    pub fn construct_typed(&mut self, token: Option<TokenId>, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            kind,
            token,
            parent: None,
            children: Vec::with_capacity(DEFAULT_CHILD_CAPACITY),
        });
        id
    }

    /// Append `child` to `parent`'s child list, growing it as needed.
    /// An absent child is a legal no-op, so grammar rules stay uniform
    /// when a sub-rule yields nothing.
    pub fn append_child(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(child) = child {
            self.nodes[child].parent = Some(parent);
            self.nodes[parent].children.push(child);
        }
    }

    /// Place `left` and `right` into the fixed [`LHS`]/[`RHS`] slots and
    /// `optional` into [`OPT`], overwriting any prior children. Used for
    /// binary/ternary grammar forms.
    pub fn assemble(
        &mut self,
        root: NodeId,
        left: NodeId,
        right: NodeId,
        optional: Option<NodeId>,
    ) -> NodeId {
        self.nodes[root].children.clear();
        self.nodes[root].children.push(left);
        self.nodes[root].children.push(right);
        self.nodes[left].parent = Some(root);
        self.nodes[right].parent = Some(root);
        if let Some(opt) = optional {
            self.nodes[root].children.push(opt);
            self.nodes[opt].parent = Some(root);
        }
        root
    }

    /// Borrow a node by id. Panics on an id from another arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Child ids of a node in append order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes[id].children()
    }

    /// The token backing a node, if any.
    pub fn token_of(&self, id: NodeId) -> Option<&Token> {
        self.nodes[id].token.map(|t| &self.tokens[t])
    }

    /// Number of nodes allocated so far (including nodes orphaned by
    /// abandoned speculative parses).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
