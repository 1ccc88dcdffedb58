use crate::{
    ast::expressions::{Expression, ExpressionKind, FunctionTypeExpression},
    errors::errors::ErrorImpl,
    lexer::tokens::{Delimiter, Keyword, Token, TokenKind, TokenValue},
};

use super::{
    expr::{parse_chain, parse_expression, parse_list, parse_tuple},
    parser::Parser,
};

/// Parses a type expression.
pub fn parse_type(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    parse_expression(parser, ignore_newline, true)
}

/// The type grammar: a type primary followed by scoping, indexing and
/// templatization.
pub fn parse_type_chain(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let primary = parse_type_primary(parser, ignore_newline);
    parse_chain(parser, ignore_newline, primary, true)
}

/// Accepts an identifier, an integer, a parenthesized tuple of types or a
/// function type.
///
/// Integers only make sense as static-array sizes, as in `int[5]`.
fn parse_type_primary(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let token = parser.current_token(ignore_newline);
    let start = token.position.offset;

    match token.value {
        TokenValue::Identifier(name) => {
            parser.advance(ignore_newline);
            Expression::new(ExpressionKind::Identifier(name), parser.span_from(start))
        }
        TokenValue::Integer(value, width) => {
            parser.advance(ignore_newline);
            Expression::new(ExpressionKind::Integer { value, width }, parser.span_from(start))
        }
        TokenValue::UnsignedInteger(value, width) => {
            parser.advance(ignore_newline);
            Expression::new(
                ExpressionKind::UnsignedInteger { value, width },
                parser.span_from(start),
            )
        }
        TokenValue::Delimiter(Delimiter::ParenthesesOpen) => parse_tuple(parser, true),
        TokenValue::Keyword(Keyword::Def)
            if parser.peek_token(1, ignore_newline).is_delimiter(Delimiter::Exclamation) =>
        {
            parse_function_type(parser, ignore_newline)
        }
        _ => {
            if token.kind == TokenKind::EndOfInput {
                parser.error(ErrorImpl::UnexpectedEndOfInput, token.position);
            } else {
                parser.error(
                    ErrorImpl::NonTypeExpression {
                        found: token.to_string(),
                    },
                    token.position,
                );
                if !token.is_recovery_anchor() {
                    parser.advance(ignore_newline);
                }
            }
            Expression::invalid(parser.span_from(start))
        }
    }
}

/// Parses what follows the `!` of a templatization: `!T` or `!(T, U)`.
pub fn parse_template_arguments(parser: &mut Parser<'_>, ignore_newline: bool) -> Vec<Expression> {
    if parser
        .current_token(ignore_newline)
        .is_delimiter(Delimiter::ParenthesesOpen)
    {
        parser.advance(ignore_newline);
        let (arguments, _) = parse_list(parser, Delimiter::ParenthesesClose, |parser| {
            parse_type(parser, true)
        });
        return arguments;
    }

    vec![parse_type_primary(parser, ignore_newline)]
}

/// Parses the template parameters of a declaration, `!T` or `!(T, U)`.
///
/// The parser must be on the `!`.
pub fn parse_template_parameters(parser: &mut Parser<'_>) -> Vec<String> {
    parser.advance(false);
    let token = parser.current_token(false);

    if let Some(name) = token.get_identifier() {
        let name = name.to_string();
        parser.advance(false);
        return vec![name];
    }

    if token.is_delimiter(Delimiter::ParenthesesOpen) {
        parser.advance(false);
        let (names, _) = parse_list(parser, Delimiter::ParenthesesClose, |parser| {
            let token = parser.current_token(true);
            match token.get_identifier() {
                Some(name) => {
                    let name = name.to_string();
                    parser.advance(true);
                    Some(name)
                }
                None => {
                    malformed_template(parser, &token);
                    None
                }
            }
        });
        return names.into_iter().flatten().collect();
    }

    malformed_template(parser, &token);
    vec![]
}

fn malformed_template(parser: &mut Parser<'_>, token: &Token) {
    parser.error(
        ErrorImpl::MalformedTemplateArguments {
            found: token.to_string(),
        },
        token.position,
    );
    if !token.is_recovery_anchor() {
        parser.advance(true);
    }
}

/// Parses an optional `-> [ref] Type`.
///
/// # Returns
///
/// Whether the return type is a reference, and the type if there is one.
pub fn parse_return_type(parser: &mut Parser<'_>, ignore_newline: bool) -> (bool, Option<Expression>) {
    if !parser
        .current_token(ignore_newline)
        .is_delimiter(Delimiter::Arrow)
    {
        return (false, None);
    }
    parser.advance(ignore_newline);

    let is_ref = parser.current_token(ignore_newline).is_keyword(Keyword::Ref);
    if is_ref {
        parser.advance(ignore_newline);
    }

    (is_ref, Some(parse_type(parser, ignore_newline)))
}

/// `def!(ref A, B) -> [ref] C`
pub fn parse_function_type(parser: &mut Parser<'_>, ignore_newline: bool) -> Expression {
    let start = parser.start(ignore_newline);
    parser.advance(ignore_newline);
    parser.advance(ignore_newline);

    let mut are_arguments_refs = vec![];
    let mut argument_types = vec![];

    if parser.expect_delimiter(Delimiter::ParenthesesOpen, ignore_newline) {
        let (arguments, _) = parse_list(parser, Delimiter::ParenthesesClose, |parser| {
            let is_ref = parser.current_token(true).is_keyword(Keyword::Ref);
            if is_ref {
                parser.advance(true);
            }
            (is_ref, parse_type(parser, true))
        });

        for (is_ref, argument_type) in arguments {
            are_arguments_refs.push(is_ref);
            argument_types.push(argument_type);
        }
    }

    let (is_return_type_ref, optional_return_type) = parse_return_type(parser, ignore_newline);

    Expression::new(
        ExpressionKind::FunctionType(FunctionTypeExpression {
            are_arguments_refs,
            argument_types,
            is_return_type_ref,
            optional_return_type: optional_return_type.map(Box::new),
        }),
        parser.span_from(start),
    )
}
