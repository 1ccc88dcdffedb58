//! Unit tests for the AST module.
//!
//! Covers deep copies, node counting, dumps and literal quoting.

use super::{
    ast::Module,
    dump::{quote_buffer, quote_byte, quote_char, quote_string},
    expressions::{
        BinaryExpression, ComparisonExpression, Expression, ExpressionKind, VariableDeclaration,
    },
    operators::{BinaryOperator, ComparisonOperator},
    statements::{Enum, Statement, StatementKind, WhileLoop},
};
use crate::{lexer::tokens::IntegerWidth, Span};

fn identifier(name: &str) -> Expression {
    Expression::new(ExpressionKind::Identifier(name.to_string()), Span::new(0, 1))
}

fn integer(value: i64) -> Expression {
    Expression::new(
        ExpressionKind::Integer {
            value,
            width: IntegerWidth::Int,
        },
        Span::new(0, 1),
    )
}

fn addition() -> Expression {
    Expression::new(
        ExpressionKind::Binary(BinaryExpression {
            operator: BinaryOperator::Add,
            left: Box::new(identifier("a")),
            right: Box::new(integer(1)),
        }),
        Span::new(0, 5),
    )
}

#[test]
fn test_clone_is_deep_and_equal() {
    let original = Statement::new(
        StatementKind::WhileLoop(WhileLoop {
            condition: identifier("running"),
            content: vec![Statement::new(
                StatementKind::Expression(addition()),
                Span::new(10, 15),
            )],
        }),
        Span::new(0, 16),
    );

    let mut copy = original.clone();
    assert_eq!(copy, original);
    assert_eq!(copy.node_count(), original.node_count());

    if let StatementKind::WhileLoop(while_loop) = &mut copy.kind {
        while_loop.content.clear();
    }
    assert_ne!(copy, original);
    assert_eq!(original.node_count(), 6);
}

#[test]
fn test_node_count() {
    let declaration = VariableDeclaration {
        is_static: false,
        is_wild: false,
        is_ref: false,
        name: "x".to_string(),
        optional_type: Some(Box::new(identifier("int"))),
        optional_initializer: Some(Box::new(addition())),
        span: Span::new(0, 12),
    };
    let statement = Statement::new(StatementKind::Variable(declaration), Span::new(0, 12));
    let module = Module::new(vec![statement.clone(), statement], Span::new(0, 24));

    assert_eq!(module.len(), 2);
    assert_eq!(module.node_count(), 10);
}

#[test]
fn test_binary_dump() {
    assert_eq!(
        addition().to_string(),
        "{\"type\": \"binary\", \"operator\": \"add\", \"left\": {\"type\": \"identifier\", \"name\": \"a\"}, \"right\": {\"type\": \"integer\", \"width\": \"int\", \"value\": 1}}"
    );
}

#[test]
fn test_comparison_dump() {
    let comparison = Expression::new(
        ExpressionKind::Comparison(ComparisonExpression {
            operators: vec![ComparisonOperator::Less, ComparisonOperator::GreaterEqual],
            operands: vec![identifier("a"), identifier("b"), identifier("c")],
        }),
        Span::new(0, 10),
    );

    let dump = comparison.to_string();
    assert!(dump.starts_with("{\"type\": \"comparison\", \"operators\": [\"less\", \"greater_equal\"]"));
}

#[test]
fn test_statement_dump() {
    let enum_v = Statement::new(
        StatementKind::Enum(Enum {
            name: "Color".to_string(),
            members: vec!["Red".to_string(), "Green".to_string()],
            values: vec![0, 5],
        }),
        Span::new(0, 20),
    );

    assert_eq!(
        enum_v.to_string(),
        "{\"type\": \"enum\", \"name\": \"Color\", \"members\": [\"Red\", \"Green\"], \"values\": [0, 5]}"
    );
    assert_eq!(
        Statement::new(StatementKind::Break, Span::new(0, 5)).to_string(),
        "{\"type\": \"break\"}"
    );
}

#[test]
fn test_dump_ignores_spans() {
    let mut moved = addition();
    moved.span = Span::new(100, 105);

    assert_eq!(moved.to_string(), addition().to_string());
}

#[test]
fn test_quote_char() {
    assert_eq!(quote_char('a'), "'a'");
    assert_eq!(quote_char('\n'), "'\\n'");
    assert_eq!(quote_char('\''), "'\\''");
    assert_eq!(quote_char('"'), "'\"'");
    assert_eq!(quote_char('\u{1B}'), "'\\x1B'");
    assert_eq!(quote_char('é'), "'é'");
}

#[test]
fn test_quote_string() {
    assert_eq!(quote_string("Hello, world!"), "\"Hello, world!\"");
    assert_eq!(quote_string("tab\there \"quoted\""), "\"tab\\there \\\"quoted\\\"\"");
    assert_eq!(quote_string("back\\slash"), "\"back\\\\slash\"");
}

#[test]
fn test_quote_bytes() {
    assert_eq!(quote_byte(b'a'), "b'a'");
    assert_eq!(quote_byte(0xFF), "b'\\xFF'");
    assert_eq!(quote_buffer(b"ok\x00\x80"), "b\"ok\\0\\x80\"");
}
