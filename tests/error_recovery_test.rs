// Error-recovery tests: malformed input must produce diagnostics with
// positions, a latched error status, and a structurally valid tree.

use cminus::parser::parse::{ParseOutcome, ParseStatus, Parser};
use cminus::parser::recovery::InsertBefore;
use cminus::parser::{parse, tokenize};

fn parse_str(source: &str) -> ParseOutcome {
    let tokens = tokenize(source).expect("tokenize failed");
    parse(tokens)
}

#[test]
fn test_missing_closing_paren_recovers() {
    let outcome = parse_str("int ( x");

    assert_eq!(outcome.status, ParseStatus::Error);
    // Exactly one diagnostic names the missing ')', at the position the
    // parser gave up on it.
    let about_paren: Vec<_> = outcome
        .diagnostics
        .iter()
        .filter(|d| d.message.contains("')'"))
        .collect();
    assert_eq!(about_paren.len(), 1);
    assert_eq!(about_paren[0].location.line, 1);

    // Recovery still produced a tree.
    assert!(outcome.root.is_some());
}

#[test]
fn test_two_independent_errors_in_one_pass() {
    // A declaration missing its ';' and a stray identifier where a
    // specifier is required.
    let outcome = parse_str("int x\nchar y");

    assert_eq!(outcome.status, ParseStatus::Error);
    assert_eq!(outcome.diagnostics.len(), 2);
    assert!(outcome.diagnostics[0].message.contains("';'"));
    assert!(outcome.diagnostics[1]
        .message
        .contains("type or storage class specifier"));
    // The second error is reported on the second line.
    assert_eq!(outcome.diagnostics[1].location.line, 2);
    assert!(outcome.root.is_some());
}

#[test]
fn test_unterminated_function_body() {
    let outcome = parse_str("int main() { return 0;");

    assert_eq!(outcome.status, ParseStatus::Error);
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.message.contains("'}'")));
    assert!(outcome.root.is_some());
}

#[test]
fn test_malformed_identifier_list_repairs_in_place() {
    // In `int f(a, 1) ;` the second list entry is not an identifier; the
    // parser substitutes a placeholder and finishes the declaration.
    let outcome = parse_str("int f(a, 1) ;");

    assert_eq!(outcome.status, ParseStatus::Error);
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.message.contains("identifier")));
    assert!(outcome.root.is_some());
}

#[test]
fn test_insert_before_strategy_recovers_too() {
    let tokens = tokenize("int ( x").expect("tokenize failed");
    let outcome = Parser::from_tokens(tokens)
        .with_recovery(Box::new(InsertBefore))
        .parse();

    assert_eq!(outcome.status, ParseStatus::Error);
    assert!(outcome
        .diagnostics
        .iter()
        .any(|d| d.message.contains("')'")));
    assert!(outcome.root.is_some());
}

#[test]
fn test_error_status_latches_across_later_globals() {
    // The first declaration has a stray ']' where its ';' belongs; the
    // substituted placeholder closes it, the second declaration parses
    // clean, and the status stays latched on Error.
    let outcome = parse_str("int x ]\nint y ;");

    assert_eq!(outcome.status, ParseStatus::Error);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert!(outcome.diagnostics[0].message.contains("';'"));
    let root = outcome.root.expect("missing root");
    assert_eq!(outcome.ast.children(root).len(), 2);
}
