// Integration tests for the C-subset front end

use cminus::parser::ast::NodeKind;
use cminus::parser::lexer::TokenKind;
use cminus::parser::parse::{ParseOutcome, ParseStatus};
use cminus::parser::{parse, tokenize};

fn parse_str(source: &str) -> ParseOutcome {
    let tokens = tokenize(source).expect("tokenize failed");
    parse(tokens)
}

/// Walk down a chain of single children.
fn descend(outcome: &ParseOutcome, mut id: usize, levels: usize) -> usize {
    for _ in 0..levels {
        let children = outcome.ast.children(id);
        assert_eq!(children.len(), 1, "expected a single child");
        id = children[0];
    }
    id
}

#[test]
fn test_declaration_only_translation_unit() {
    let outcome = parse_str("int x ;");
    assert_eq!(outcome.status, ParseStatus::Success);

    // List → GlobalDef → Decl
    let root = outcome.root.expect("missing root");
    let decl = descend(&outcome, root, 2);
    assert_eq!(outcome.ast.node(decl).kind, NodeKind::Decl);

    let specs = outcome.ast.children(decl)[0];
    let spec_kinds: Vec<TokenKind> = outcome
        .ast
        .children(specs)
        .iter()
        .filter_map(|&leaf| outcome.ast.token_of(leaf).map(|t| t.kind))
        .collect();
    assert_eq!(spec_kinds, vec![TokenKind::DType]);

    let declarator = outcome.ast.children(decl)[1];
    let name = descend(&outcome, declarator, 2);
    let token = outcome.ast.token_of(name).expect("name token");
    assert_eq!(token.spelling(), Some("x"));
}

#[test]
fn test_several_globals_in_one_unit() {
    let source = r#"
        static int counter ;

        int add(int a, int b) {
            return a + b;
        }

        char *name ;
    "#;
    let outcome = parse_str(source);
    assert_eq!(outcome.status, ParseStatus::Success);
    assert!(outcome.diagnostics.is_empty());

    let root = outcome.root.expect("missing root");
    let globals = outcome.ast.children(root);
    assert_eq!(globals.len(), 3);

    let kinds: Vec<NodeKind> = globals
        .iter()
        .map(|&g| outcome.ast.node(descend(&outcome, g, 1)).kind)
        .collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Decl, NodeKind::FuncDef, NodeKind::Decl]
    );
}

#[test]
fn test_nested_function_body_is_skipped_whole() {
    let source = r#"
        int main() {
            if (1) {
                while (0) {
                    return 2;
                }
            }
            return 0;
        }
    "#;
    let outcome = parse_str(source);
    assert_eq!(outcome.status, ParseStatus::Success);

    let root = outcome.root.expect("missing root");
    let func = descend(&outcome, root, 2);
    assert_eq!(outcome.ast.node(func).kind, NodeKind::FuncDef);
    // The body is one opaque statement node regardless of nesting.
    let body = outcome.ast.children(func)[2];
    assert_eq!(outcome.ast.node(body).kind, NodeKind::Stat);
    assert!(outcome.ast.children(body).is_empty());
}

#[test]
fn test_empty_token_sequence_fails_cleanly() {
    let tokens = tokenize("  \n\t  ").expect("tokenize failed");
    assert!(tokens.is_empty());

    let outcome = parse(tokens);
    assert_eq!(outcome.status, ParseStatus::Failed);
    assert!(outcome.root.is_none());
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_token_positions_feed_the_tree() {
    let outcome = parse_str("int x ;\nint y ;");
    assert_eq!(outcome.status, ParseStatus::Success);
    let root = outcome.root.expect("missing root");
    let globals = outcome.ast.children(root);

    let line_of = |global: usize| {
        let decl = descend(&outcome, global, 1);
        let declarator = outcome.ast.children(decl)[1];
        let name = descend(&outcome, declarator, 2);
        outcome.ast.token_of(name).expect("name token").location.line
    };
    assert_eq!(line_of(globals[0]), 1);
    assert_eq!(line_of(globals[1]), 2);
}

#[test]
fn test_complex_declarator_nest() {
    // Pointer to an array: a parenthesized inner declarator with a
    // pointer prefix, then an array suffix on the group.
    let outcome = parse_str("int (*table)[16] ;");
    assert_eq!(outcome.status, ParseStatus::Success);
    assert!(outcome.diagnostics.is_empty());

    let root = outcome.root.expect("missing root");
    let decl = descend(&outcome, root, 2);
    let declarator = outcome.ast.children(decl)[1];
    let direct = descend(&outcome, declarator, 1);

    // The group and the suffix chain.
    let children = outcome.ast.children(direct);
    assert_eq!(children.len(), 2);
    let inner = children[0];
    assert_eq!(outcome.ast.node(inner).kind, NodeKind::Declarator);
    let star = outcome.ast.children(inner)[0];
    assert!(outcome.ast.token_of(star).is_some_and(|t| t.is_oper("*")));

    let suffixes = children[1];
    let size = descend(&outcome, suffixes, 1);
    let token = outcome.ast.token_of(size).expect("size token");
    assert_eq!(token.int_value(), Some(16));
}
