use crate::{
    ast::{
        expressions::{
            BinaryExpression, CallExpression, ComparisonExpression, Expression, ExpressionKind,
            IndexExpression, LambdaExpression, ScopeExpression, TemplatizeExpression,
            TernaryExpression, UnaryExpression,
        },
        operators::{BinaryOperator, UnaryOperator},
    },
    errors::errors::ErrorImpl,
    lexer::tokens::{Delimiter, Keyword, Operator, TokenKind, TokenValue},
    Position, Span,
};

use super::{
    lookups::{
        BindingPower, BINARY_LOOKUP, COMPARISON_LOOKUP, INPLACE_LOOKUP, LOGICAL_LOOKUP,
        PREFIX_LOOKUP,
    },
    parser::Parser,
    stmt::{parse_arguments, parse_block, parse_variable_declaration},
    types::{parse_function_type, parse_return_type, parse_template_arguments, parse_type_chain},
};

/// Parses one expression.
///
/// # Arguments
///
/// * `parser` - The parser, positioned at the first token of the expression
/// * `ignore_newline` - Whether newlines may appear between tokens
/// * `filter_type` - Restrict the grammar to type expressions
///
/// # Returns
///
/// The expression, possibly containing `Invalid` nodes. Never fails.
pub fn parse_expression(
    parser: &mut Parser<'_>,
    ignore_newline: bool,
    filter_type: bool,
) -> Expression {
    let start = parser.start(ignore_newline);
    if !parser.enter(ignore_newline) {
        return Expression::invalid(parser.span_from(start));
    }

    let expression = if filter_type {
        parse_type_chain(parser, ignore_newline)
    } else {
        parse_inplace(parser, ignore_newline)
    };

    parser.leave();
    expression
}

/// Runs a right-recursive level one nesting deeper.
fn descend(
    parser: &mut Parser<'_>,
    ignore_newline: bool,
    level: fn(&mut Parser<'_>, bool) -> Expression,
) -> Expression {
    let start = parser.start(ignore_newline);
    if !parser.enter(ignore_newline) {
        return Expression::invalid(parser.span_from(start));
    }

    let expression = level(parser, ignore_newline);
    parser.leave();
    expression
}

/// Counts the nodes a loop wraps around its own result, which bounds how
/// deep left-leaning trees such as `a + b + c` or `f()()()` get.
struct Chain {
    entered: usize,
    exceeded: bool,
}

impl Chain {
    fn new() -> Self {
        Chain {
            entered: 0,
            exceeded: false,
        }
    }

    /// Returns false past the depth limit, reporting only the first refusal.
    fn grow(&mut self, parser: &mut Parser<'_>, position: Position) -> bool {
        if parser.enter_chain() {
            self.entered += 1;
            return true;
        }

        if !self.exceeded {
            parser.nesting_too_deep(position);
            self.exceeded = true;
        }
        false
    }

    fn finish(self, parser: &mut Parser<'_>) {
        parser.leave_chain(self.entered);
    }
}

fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    let span = Span::new(left.span.start, right.span.end.max(left.span.end));

    Expression::new(
        ExpressionKind::Binary(BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }),
        span,
    )
}

fn unary(operator: UnaryOperator, operand: Expression, span: Span) -> Expression {
    Expression::new(
        ExpressionKind::Unary(UnaryExpression {
            operator,
            operand: Box::new(operand),
        }),
        span,
    )
}

fn parse_inplace(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let left = parse_ternary(parser, ignore_newline);

    let token = parser.current_token(ignore_newline);
    match token.get_operator().and_then(|op| INPLACE_LOOKUP.get(&op).copied()) {
        Some(operator) => {
            parser.advance(ignore_newline);
            let right = parse_expression(parser, ignore_newline, false);
            binary(operator, left, right)
        }
        None => left,
    }
}

/// `value if condition else otherwise`
fn parse_ternary(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let start = parser.start(ignore_newline);
    let value = parse_logical(parser, ignore_newline, BindingPower::LogicalOr);

    if !parser.current_token(ignore_newline).is_keyword(Keyword::If) {
        return value;
    }
    parser.advance(ignore_newline);

    let condition = parse_logical(parser, ignore_newline, BindingPower::LogicalOr);
    let otherwise = if parser.expect_keyword(Keyword::Else, ignore_newline) {
        descend(parser, ignore_newline, parse_ternary)
    } else {
        Expression::invalid(parser.span_from(parser.start(ignore_newline)))
    };

    Expression::new(
        ExpressionKind::Ternary(TernaryExpression {
            condition: Box::new(condition),
            value: Box::new(value),
            otherwise: Box::new(otherwise),
        }),
        parser.span_from(start),
    )
}

/// `or`, `xor` and `and`, with `not` operands.
fn parse_logical(parser: &mut Parser<'_>, ignore_newline: bool, bp: BindingPower) -> Expression {
    let mut left = parse_not(parser, ignore_newline);
    let mut chain = Chain::new();

    loop {
        let token = parser.current_token(ignore_newline);
        let (operator, power) =
            match token.get_operator().and_then(|op| LOGICAL_LOOKUP.get(&op).copied()) {
                Some(entry) => entry,
                None => break,
            };

        if power < bp {
            break;
        }

        parser.advance(ignore_newline);
        let right = parse_logical(parser, ignore_newline, power.next());
        if chain.grow(parser, token.position) {
            left = binary(operator, left, right);
        }
    }

    chain.finish(parser);
    left
}

fn parse_not(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let token = parser.current_token(ignore_newline);

    if token.is_operator(Operator::Not) {
        parser.advance(ignore_newline);
        let operand = descend(parser, ignore_newline, parse_not);
        let span = parser.span_from(token.position.offset);
        return unary(UnaryOperator::Not, operand, span);
    }

    parse_comparison(parser, ignore_newline)
}

/// A whole chain such as `a < b <= c` becomes a single node.
fn parse_comparison(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let first = parse_binary(parser, ignore_newline, BindingPower::Range);

    let mut operators = vec![];
    let mut rest = vec![];

    loop {
        let token = parser.current_token(ignore_newline);
        match token.get_operator().and_then(|op| COMPARISON_LOOKUP.get(&op).copied()) {
            Some(operator) => {
                parser.advance(ignore_newline);
                operators.push(operator);
                rest.push(parse_binary(parser, ignore_newline, BindingPower::Range));
            }
            None => break,
        }
    }

    if operators.is_empty() {
        return first;
    }

    let end = rest.last().map(|last| last.span.end).unwrap_or(first.span.end);
    let span = Span::new(first.span.start, end);

    let mut operands = vec![first];
    operands.extend(rest);

    Expression::new(
        ExpressionKind::Comparison(ComparisonExpression {
            operators,
            operands,
        }),
        span,
    )
}

/// Left-associative binary levels from `..` down to `* / % @`.
pub fn parse_binary(parser: &mut Parser<'_>, ignore_newline: bool, bp: BindingPower) -> Expression {
    let mut left = parse_unary(parser, ignore_newline);
    let mut chain = Chain::new();

    loop {
        let token = parser.current_token(ignore_newline);
        let (operator, power) =
            match token.get_operator().and_then(|op| BINARY_LOOKUP.get(&op).copied()) {
                Some(entry) => entry,
                None => break,
            };

        if power < bp {
            break;
        }

        parser.advance(ignore_newline);
        let right = parse_binary(parser, ignore_newline, power.next());
        if chain.grow(parser, token.position) {
            left = binary(operator, left, right);
        }
    }

    chain.finish(parser);
    left
}

fn parse_unary(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let token = parser.current_token(ignore_newline);

    match token.get_operator().and_then(|op| PREFIX_LOOKUP.get(&op).copied()) {
        Some(operator) => {
            parser.advance(ignore_newline);
            let operand = descend(parser, ignore_newline, parse_unary);
            let span = parser.span_from(token.position.offset);
            unary(operator, operand, span)
        }
        None => parse_pow(parser, ignore_newline),
    }
}

/// `^` stays left-associative; its right operand may carry a prefix operator.
fn parse_pow(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let mut left = parse_postfix(parser, ignore_newline);
    let mut chain = Chain::new();

    loop {
        let token = parser.current_token(ignore_newline);
        if !token.is_operator(Operator::Pow) {
            break;
        }
        parser.advance(ignore_newline);

        let next = parser.current_token(ignore_newline);
        let is_prefixed = next
            .get_operator()
            .map(|op| PREFIX_LOOKUP.contains_key(&op))
            .unwrap_or(false);

        let right = if is_prefixed {
            descend(parser, ignore_newline, parse_unary)
        } else {
            parse_postfix(parser, ignore_newline)
        };
        if chain.grow(parser, token.position) {
            left = binary(BinaryOperator::Pow, left, right);
        }
    }

    chain.finish(parser);
    left
}

fn parse_postfix(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let primary = parse_primary(parser, ignore_newline);
    parse_chain(parser, ignore_newline, primary, false)
}

/// Applies calls, indexing, scoping, templatization and postfix `++`/`--`
/// in the order they appear. Type expressions only take scoping, indexing
/// (static-array sizes) and templatization.
pub fn parse_chain(
    parser: &mut Parser<'_>,
    ignore_newline: bool,
    mut value: Expression,
    filter_type: bool,
) -> Expression {
    let start = value.span.start;
    let mut previous_was_scope = false;
    let mut chain = Chain::new();

    loop {
        let token = parser.current_token(ignore_newline);
        if !starts_suffix(&token.value, filter_type) {
            break;
        }

        // Past the depth limit the suffix is parsed around a placeholder and dropped
        let within_limit = chain.grow(parser, token.position);
        let target = if within_limit {
            std::mem::replace(&mut value, Expression::invalid(Span::default()))
        } else {
            Expression::invalid(value.span)
        };

        match parse_suffix(parser, ignore_newline, target, start, previous_was_scope, filter_type) {
            Ok((suffixed, is_scope)) => {
                if within_limit {
                    value = suffixed;
                }
                previous_was_scope = is_scope;
            }
            Err(unchanged) => {
                if within_limit {
                    value = unchanged;
                }
                break;
            }
        }
    }

    chain.finish(parser);
    value
}

fn starts_suffix(value: &TokenValue, filter_type: bool) -> bool {
    match value {
        TokenValue::Delimiter(
            Delimiter::Dot | Delimiter::Exclamation | Delimiter::SquareBracketOpen,
        ) => true,
        TokenValue::Delimiter(Delimiter::ParenthesesOpen)
        | TokenValue::Operator(Operator::Increment | Operator::Decrement) => !filter_type,
        _ => false,
    }
}

/// Applies the suffix under the cursor to `value`.
///
/// # Returns
///
/// The suffixed expression and whether the suffix was a scope step, or
/// `value` itself when the suffix is malformed and the chain must stop.
fn parse_suffix(
    parser: &mut Parser<'_>,
    ignore_newline: bool,
    value: Expression,
    start: usize,
    previous_was_scope: bool,
    filter_type: bool,
) -> Result<(Expression, bool), Expression> {
    let token = parser.advance(ignore_newline);

    let suffixed = match token.value {
        TokenValue::Delimiter(Delimiter::ParenthesesOpen) => {
            let (arguments, _) = parse_list(parser, Delimiter::ParenthesesClose, |parser| {
                parse_expression(parser, true, false)
            });

            ExpressionKind::Call(CallExpression {
                callee: Box::new(value),
                arguments,
            })
        }
        TokenValue::Delimiter(Delimiter::SquareBracketOpen) => {
            let (arguments, _) = parse_list(parser, Delimiter::SquareBracketClose, |parser| {
                parse_expression(parser, true, filter_type)
            });

            ExpressionKind::Index(IndexExpression {
                indexee: Box::new(value),
                arguments,
            })
        }
        TokenValue::Delimiter(Delimiter::Dot) => {
            let name = match parser.expect_identifier(ignore_newline) {
                Some(name) => name,
                None => return Err(value),
            };

            let kind = match value.kind {
                ExpressionKind::Scope(mut scope) if previous_was_scope => {
                    scope.scope_names.push(name);
                    ExpressionKind::Scope(scope)
                }
                kind => ExpressionKind::Scope(ScopeExpression {
                    value: Box::new(Expression::new(kind, value.span)),
                    scope_names: vec![name],
                }),
            };
            return Ok((Expression::new(kind, parser.span_from(start)), true));
        }
        TokenValue::Delimiter(Delimiter::Exclamation) => {
            let template_arguments = parse_template_arguments(parser, ignore_newline);

            ExpressionKind::Templatize(TemplatizeExpression {
                value: Box::new(value),
                template_arguments,
            })
        }
        TokenValue::Operator(Operator::Increment) => ExpressionKind::Unary(UnaryExpression {
            operator: UnaryOperator::PostIncrement,
            operand: Box::new(value),
        }),
        TokenValue::Operator(Operator::Decrement) => ExpressionKind::Unary(UnaryExpression {
            operator: UnaryOperator::PostDecrement,
            operand: Box::new(value),
        }),
        _ => return Err(value),
    };

    Ok((Expression::new(suffixed, parser.span_from(start)), false))
}

/// Parses the items of a bracketed list up to `closing`.
///
/// The opening bracket must already be consumed. Newlines are ignored and a
/// trailing comma is accepted.
///
/// # Returns
///
/// The items, and whether the list ended with a comma.
pub fn parse_list<'a, T>(
    parser: &mut Parser<'a>,
    closing: Delimiter,
    mut parse_item: impl FnMut(&mut Parser<'a>) -> T,
) -> (Vec<T>, bool) {
    let mut items = vec![];
    let mut trailing_comma = false;

    loop {
        let token = parser.current_token(true);

        if token.is_delimiter(closing) {
            parser.advance(true);
            break;
        }
        if token.kind == TokenKind::EndOfInput {
            parser.error(ErrorImpl::UnexpectedEndOfInput, token.position);
            break;
        }

        items.push(parse_item(parser));

        let token = parser.current_token(true);
        if token.is_delimiter(Delimiter::Comma) {
            parser.advance(true);
            trailing_comma = true;
            continue;
        }
        trailing_comma = false;

        if token.is_delimiter(closing) {
            parser.advance(true);
        } else if token.kind == TokenKind::EndOfInput {
            parser.error(ErrorImpl::UnexpectedEndOfInput, token.position);
        } else {
            parser.error(
                ErrorImpl::MissingListSeparator {
                    closing: closing.as_str().to_string(),
                    found: token.to_string(),
                },
                token.position,
            );
        }
        break;
    }

    (items, trailing_comma)
}

/// Parses a parenthesized group. One item without a trailing comma is a
/// plain grouping, anything else is a tuple.
pub fn parse_tuple(parser: &mut Parser<'_>, filter_type: bool) -> Expression {
    let start = parser.start(true);
    parser.advance(true);

    let (mut items, trailing_comma) = parse_list(parser, Delimiter::ParenthesesClose, |parser| {
        parse_expression(parser, true, filter_type)
    });

    if items.len() == 1 && !trailing_comma {
        if let Some(item) = items.pop() {
            return item;
        }
    }

    Expression::new(ExpressionKind::Tuple(items), parser.span_from(start))
}

fn parse_primary(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let token = parser.current_token(ignore_newline);
    let start = token.position.offset;

    let kind = match token.value {
        TokenValue::Identifier(name) => ExpressionKind::Identifier(name),
        TokenValue::Character(character) => ExpressionKind::Character(character),
        TokenValue::Byte(byte) => ExpressionKind::Byte(byte),
        TokenValue::String(mut string) => {
            parser.advance(ignore_newline);
            while let TokenValue::String(next) = parser.current_token(ignore_newline).value {
                string.push_str(&next);
                parser.advance(ignore_newline);
            }
            return Expression::new(ExpressionKind::String(string), parser.span_from(start));
        }
        TokenValue::Buffer(mut buffer) => {
            parser.advance(ignore_newline);
            while let TokenValue::Buffer(next) = parser.current_token(ignore_newline).value {
                buffer.extend(next);
                parser.advance(ignore_newline);
            }
            return Expression::new(ExpressionKind::Buffer(buffer), parser.span_from(start));
        }
        TokenValue::Integer(value, width) => ExpressionKind::Integer { value, width },
        TokenValue::UnsignedInteger(value, width) => {
            ExpressionKind::UnsignedInteger { value, width }
        }
        TokenValue::Float(value) => ExpressionKind::Float(value),
        TokenValue::Double(value) => ExpressionKind::Double(value),
        TokenValue::ImaginaryFloat(value) => ExpressionKind::ImaginaryFloat(value),
        TokenValue::ImaginaryDouble(value) => ExpressionKind::ImaginaryDouble(value),

        TokenValue::Delimiter(Delimiter::ParenthesesOpen) => return parse_tuple(parser, false),
        TokenValue::Delimiter(Delimiter::SquareBracketOpen) => {
            parser.advance(ignore_newline);
            let (items, _) = parse_list(parser, Delimiter::SquareBracketClose, |parser| {
                parse_expression(parser, true, false)
            });
            return Expression::new(ExpressionKind::Array(items), parser.span_from(start));
        }
        TokenValue::Delimiter(Delimiter::CurlyBracketOpen) => return parse_dict(parser, ignore_newline),

        TokenValue::Keyword(Keyword::Def) => {
            if parser.peek_token(1, ignore_newline).is_delimiter(Delimiter::Exclamation) {
                return parse_function_type(parser, ignore_newline);
            }
            return parse_lambda(parser, ignore_newline);
        }
        TokenValue::Keyword(Keyword::Static | Keyword::Wild | Keyword::Ref) => {
            let declaration = parse_variable_declaration(parser, ignore_newline);
            let span = declaration.span;
            return Expression::new(ExpressionKind::Variable(declaration), span);
        }

        _ => {
            match token.kind {
                // Already reported by the lexer
                TokenKind::Invalid => {
                    parser.advance(ignore_newline);
                }
                TokenKind::EndOfInput => {
                    parser.error(ErrorImpl::UnexpectedEndOfInput, token.position);
                }
                _ => {
                    parser.error(
                        ErrorImpl::UnexpectedTokenDetailed {
                            token: token.to_string(),
                            message: String::from("expected an expression"),
                        },
                        token.position,
                    );
                    if !token.is_recovery_anchor() {
                        parser.advance(ignore_newline);
                    }
                }
            }
            return Expression::invalid(parser.span_from(start));
        }
    };

    parser.advance(ignore_newline);
    Expression::new(kind, parser.span_from(start))
}

/// `{key: value, ...}`
fn parse_dict(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let start = parser.start(ignore_newline);
    parser.advance(ignore_newline);

    let (pairs, _) = parse_list(parser, Delimiter::CurlyBracketClose, |parser| {
        let key = parse_expression(parser, true, false);
        let value = if parser.expect_delimiter(Delimiter::Colon, true) {
            parse_expression(parser, true, false)
        } else {
            Expression::invalid(parser.span_from(parser.start(true)))
        };
        (key, value)
    });

    let (keys, values) = pairs.into_iter().unzip();
    Expression::new(ExpressionKind::Dict { keys, values }, parser.span_from(start))
}

/// `def (arguments) -> [ref] Type body`
fn parse_lambda(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let start = parser.start(ignore_newline);
    parser.advance(ignore_newline);

    let (arguments, optional_variadic_argument) =
        if parser.expect_delimiter(Delimiter::ParenthesesOpen, ignore_newline) {
            parse_arguments(parser)
        } else {
            (vec![], None)
        };

    let (is_return_type_ref, optional_return_type) = parse_return_type(parser, ignore_newline);

    let saved = parser.set_loop_depth(0);
    let content = parse_block(parser);
    parser.set_loop_depth(saved);

    Expression::new(
        ExpressionKind::Lambda(LambdaExpression {
            arguments,
            optional_variadic_argument: optional_variadic_argument.map(Box::new),
            is_return_type_ref,
            optional_return_type: optional_return_type.map(Box::new),
            content,
        }),
        parser.span_from(start),
    )
}
