// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end inspection tests: lex, parse, inspect at a caret.

use pqm_ast::{NodeKind, Position};
use pqm_inspect::{Inspected, NodeRole, PositionIdentifier};
use pqm_lexer::Lexer;
use pqm_parser::{ParseResult, Parser};

fn parse(source: &str) -> ParseResult {
    Parser::new(Lexer::new(source).tokenize().tokens).parse()
}

fn inspect(parsed: &ParseResult, line: u32, column: u32) -> Inspected {
    Inspected::try_from(Position::new(line, column), &parsed.map, &parsed.leaf_ids).unwrap()
}

fn inspect_at(source: &str, line: u32, column: u32) -> Inspected {
    inspect(&parse(source), line, column)
}

fn scope_keys(inspected: &Inspected) -> Vec<&str> {
    inspected.scope.keys().map(String::as_str).collect()
}

fn expect_local(inspected: &Inspected, name: &str) -> pqm_ast::node::XorNode {
    match &inspected.position_identifier {
        Some(PositionIdentifier::Local { identifier, definition }) => {
            assert_eq!(identifier.literal, name);
            // A resolved identifier is always backed by its scope entry.
            assert_eq!(inspected.scope.get(name), Some(definition));
            *definition
        }
        other => panic!("expected Local {{ {} }}, got {:?}", name, other),
    }
}

// =============================================================================
// Let expressions
// =============================================================================

#[test]
fn let_bindings_are_all_visible_in_the_body() {
    let parsed = parse("let x = 1, y = x in y");
    let inspected = inspect(&parsed, 0, 21);

    assert_eq!(scope_keys(&inspected), vec!["x", "y"]);
    assert_eq!(inspected.scope["x"].kind, NodeKind::LiteralExpression);
    assert_eq!(inspected.scope["y"].kind, NodeKind::IdentifierExpression);
    expect_local(&inspected, "y");
}

#[test]
fn only_preceding_bindings_are_visible_in_a_value() {
    // Caret inside y's value: x is visible, y is not.
    let inspected = inspect_at("let x = 1, y = x in y", 0, 16);
    assert_eq!(scope_keys(&inspected), vec!["x"]);
    let definition = expect_local(&inspected, "x");
    assert_eq!(definition.kind, NodeKind::LiteralExpression);
}

#[test]
fn unresolvable_identifier_is_undefined() {
    let inspected = inspect_at("let x = 1 in z", 0, 14);
    assert_eq!(scope_keys(&inspected), vec!["x"]);
    match &inspected.position_identifier {
        Some(PositionIdentifier::Undefined { identifier }) => {
            assert_eq!(identifier.literal, "z");
        }
        other => panic!("expected Undefined {{ z }}, got {:?}", other),
    }
}

#[test]
fn caret_on_a_binding_key_resolves_to_its_value() {
    // Caret at the end of the key `y` itself.
    let inspected = inspect_at("let x = 1, y = x in y", 0, 12);
    let definition = expect_local(&inspected, "y");
    assert_eq!(definition.kind, NodeKind::IdentifierExpression);
}

// =============================================================================
// Functions and each
// =============================================================================

#[test]
fn function_parameters_are_in_scope_in_the_body() {
    let inspected = inspect_at("(a, b) => a + b", 0, 11);
    assert_eq!(scope_keys(&inspected), vec!["a", "b"]);
    let definition = expect_local(&inspected, "a");
    assert_eq!(definition.kind, NodeKind::Parameter);
}

#[test]
fn parameter_ascriptions_do_not_bind() {
    let inspected = inspect_at("(a as number, b) => a", 0, 21);
    assert_eq!(scope_keys(&inspected), vec!["a", "b"]);
    expect_local(&inspected, "a");
}

#[test]
fn inner_parameters_shadow_outer_bindings() {
    let inspected = inspect_at("let x = 1 in (x) => x", 0, 21);
    assert_eq!(scope_keys(&inspected), vec!["x"]);
    let definition = expect_local(&inspected, "x");
    assert_eq!(definition.kind, NodeKind::Parameter);
}

#[test]
fn each_binds_the_implicit_underscore() {
    let inspected = inspect_at("each _ + 1", 0, 6);
    assert_eq!(scope_keys(&inspected), vec!["_"]);
    let definition = expect_local(&inspected, "_");
    assert_eq!(definition.kind, NodeKind::EachExpression);
}

#[test]
fn caret_on_a_leaf_start_selects_the_predecessor() {
    // The caret sits exactly on `_`'s start, so the `each` keyword is the
    // selected leaf; scope still accumulates, but there is no caret name.
    let inspected = inspect_at("each _ + 1", 0, 5);
    assert_eq!(scope_keys(&inspected), vec!["_"]);
    assert_eq!(inspected.position_identifier, None);
    assert_eq!(inspected.nodes[0].node.kind, NodeKind::Constant);
}

// =============================================================================
// Records and sections
// =============================================================================

#[test]
fn record_fields_are_mutually_visible() {
    let inspected = inspect_at("[f = 1, g = f]", 0, 13);
    assert_eq!(scope_keys(&inspected), vec!["f", "g"]);
    let definition = expect_local(&inspected, "f");
    assert_eq!(definition.kind, NodeKind::LiteralExpression);
}

#[test]
fn section_members_are_mutually_visible() {
    let inspected = inspect_at("section S; a = 1; b = a;", 0, 23);
    assert_eq!(scope_keys(&inspected), vec!["a", "b"]);
    let definition = expect_local(&inspected, "a");
    assert_eq!(definition.kind, NodeKind::LiteralExpression);
}

// =============================================================================
// Recursive @
// =============================================================================

#[test]
fn at_sign_makes_a_binding_visible_to_itself() {
    let parsed = parse("let f = @f in f");
    // Caret just after the name of `@f`.
    let inspected = inspect(&parsed, 0, 10);
    assert_eq!(scope_keys(&inspected), vec!["f"]);
    let definition = expect_local(&inspected, "f");
    assert_eq!(definition.kind, NodeKind::IdentifierExpression);

    // Caret just after the `@` itself resolves the same way.
    let on_at = inspect(&parsed, 0, 9);
    expect_local(&on_at, "f");
}

// =============================================================================
// Degenerate carets and interrupted parses
// =============================================================================

#[test]
fn empty_document_yields_the_default_inspection() {
    let inspected = inspect_at("", 0, 0);
    assert!(inspected.nodes.is_empty());
    assert!(inspected.scope.is_empty());
    assert_eq!(inspected.position_identifier, None);
}

#[test]
fn caret_before_the_first_token_yields_the_default_inspection() {
    let inspected = inspect_at("let x = 1 in x", 0, 0);
    assert!(inspected.nodes.is_empty());
    assert!(inspected.scope.is_empty());
    assert_eq!(inspected.position_identifier, None);
}

#[test]
fn non_identifier_caret_has_no_position_identifier() {
    let inspected = inspect_at("1 + 2", 0, 3);
    assert_eq!(inspected.position_identifier, None);
}

#[test]
fn interrupted_parse_still_yields_scope() {
    let parsed = parse("let x = 1, y = ");
    assert!(!parsed.is_ok());
    let inspected = inspect(&parsed, 0, 15);

    assert_eq!(scope_keys(&inspected), vec!["x"]);
    assert_eq!(inspected.position_identifier, None);
    // The chain ends at the unfinished let, a context node.
    let last = inspected.nodes.last().unwrap();
    assert_eq!(last.node.kind, NodeKind::LetExpression);
    assert!(last.node.is_context());
}

#[test]
fn context_identifier_expression_supplies_no_caret_name() {
    // `@` at the very end: its identifier expression never completed and
    // has no name to resolve.
    let parsed = parse("let x = @");
    let inspected = inspect(&parsed, 0, 9);
    assert_eq!(inspected.position_identifier, None);
}

// =============================================================================
// Structural properties
// =============================================================================

#[test]
fn ancestors_are_chained_nearest_first() {
    let parsed = parse("let x = 1, y = x in y");
    let inspected = inspect(&parsed, 0, 21);

    // Leaf, its identifier expression, the let.
    assert_eq!(
        inspected.nodes.iter().map(|a| &a.role).collect::<Vec<_>>(),
        vec![
            &NodeRole::Child { parent: NodeKind::IdentifierExpression, slot: Some(0) },
            &NodeRole::LetBody,
            &NodeRole::Root,
        ]
    );
    for pair in inspected.nodes.windows(2) {
        assert_eq!(parsed.map.parent_id(pair[0].node.id), Some(pair[1].node.id));
    }
}

#[test]
fn value_roles_name_their_binding() {
    // Caret inside y's value expression.
    let inspected = inspect_at("let x = 1, y = x in y", 0, 16);
    assert!(inspected
        .nodes
        .iter()
        .any(|a| a.role == NodeRole::LetBindingValue { name: "y".to_string() }));

    let in_field = inspect_at("[f = 1, g = f]", 0, 13);
    assert!(in_field
        .nodes
        .iter()
        .any(|a| a.role == NodeRole::FieldValue { name: "g".to_string() }));
}

#[test]
fn inspection_is_idempotent() {
    let parsed = parse("let x = 1, y = x in y");
    let first = inspect(&parsed, 0, 21);
    let second = inspect(&parsed, 0, 21);
    assert_eq!(first, second);
}
