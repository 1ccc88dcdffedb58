use crate::{
    ast::{
        expressions::{Expression, VariableDeclaration},
        statements::{
            Alias, Class, DoWhileLoop, Enum, ForLoop, Function, IfBranch, Import, Include, Return,
            Statement, StatementKind, Struct, WhileLoop,
        },
    },
    errors::errors::ErrorImpl,
    lexer::tokens::{Delimiter, Keyword, Operator, Token, TokenKind, TokenValue},
};

use super::{
    expr::{parse_expression, parse_list},
    lookups::STATEMENT_LOOKUP,
    parser::Parser,
    types::{parse_return_type, parse_template_parameters, parse_type},
};

/// Parses one statement.
///
/// Keywords dispatch through `STATEMENT_LOOKUP`. An identifier followed by
/// `:` is tried as a variable declaration, and anything else becomes an
/// expression statement.
pub fn parse_statement(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    if !parser.enter(true) {
        return Statement::invalid(parser.span_from(start));
    }

    let token = parser.current_token(true);
    let handler = match token.value {
        TokenValue::Keyword(keyword) => STATEMENT_LOOKUP.get(&keyword).copied(),
        _ => None,
    };

    let statement = match handler {
        Some(handler) => handler(parser),
        None if token.kind == TokenKind::Identifier
            && parser.peek_token(1, false).is_delimiter(Delimiter::Colon) =>
        {
            parse_probed_declaration(parser)
        }
        None => parse_expression_stmt(parser),
    };

    parser.leave();
    statement
}

/// `name: Type = value` is told apart from an expression by trying it first.
///
/// When neither reading parses cleanly the declaration is kept, its
/// diagnostics being the more precise ones.
fn parse_probed_declaration(parser: &mut Parser<'_>) -> Statement {
    let checkpoint = parser.checkpoint();
    let before = parser.diagnostics().len();

    let declaration = parse_var_decl_stmt(parser);
    if parser.diagnostics().len() == before {
        return declaration;
    }

    parser.restore(checkpoint);
    let expression = parse_expression_stmt(parser);
    if parser.diagnostics().len() == before {
        return expression;
    }

    parser.restore(checkpoint);
    parse_var_decl_stmt(parser)
}

fn parse_expression_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    let expression = parse_expression(parser, false, false);
    let span = parser.span_from(start);

    parse_terminator(parser);
    Statement::new(StatementKind::Expression(expression), span)
}

/// Ends a simple statement.
///
/// A newline or `;` is consumed. `}` and the end of input are left for the
/// enclosing block. Anything else is reported and skipped.
pub fn parse_terminator(parser: &mut Parser<'_>) {
    let token = parser.current_token(false);

    if token.kind == TokenKind::Newline || token.is_delimiter(Delimiter::Semicolon) {
        parser.advance(false);
        return;
    }

    if token.kind == TokenKind::EndOfInput || token.is_delimiter(Delimiter::CurlyBracketClose) {
        return;
    }

    parser.error(
        ErrorImpl::MissingTerminator {
            found: token.to_string(),
        },
        token.position,
    );
    parser.advance(false);
}

/// Parses a body: `{ statements }` or `: statement`.
pub fn parse_block(parser: &mut Parser<'_>) -> Vec<Statement> {
    let token = parser.current_token(true);

    if token.is_delimiter(Delimiter::Colon) {
        parser.advance(true);
        return vec![parse_statement(parser)];
    }

    if !token.is_delimiter(Delimiter::CurlyBracketOpen) {
        parser.expected(String::from("`{` or `:`"), &token);
        return vec![];
    }

    if !parser.enter(true) {
        return vec![];
    }
    parser.advance(true);

    let mut statements = vec![];

    loop {
        let token = parser.current_token(true);

        if token.is_delimiter(Delimiter::CurlyBracketClose) {
            parser.advance(true);
            break;
        }
        if token.kind == TokenKind::EndOfInput {
            parser.error(ErrorImpl::UnexpectedEndOfInput, token.position);
            break;
        }
        if token.is_delimiter(Delimiter::Semicolon) {
            parser.advance(true);
            continue;
        }

        let before = parser.offset();
        statements.push(parse_statement(parser));

        if parser.offset() == before {
            parser.advance(true);
        }
    }

    parser.leave();
    statements
}

/// Parses a body one loop deeper.
fn parse_loop_body(parser: &mut Parser<'_>) -> Vec<Statement> {
    let saved = parser.set_loop_depth(parser.loop_depth() + 1);
    let content = parse_block(parser);
    parser.set_loop_depth(saved);
    content
}

/// Parses a function or class body, where enclosing loops no longer apply.
fn parse_detached_body(parser: &mut Parser<'_>) -> Vec<Statement> {
    let saved = parser.set_loop_depth(0);
    let content = parse_block(parser);
    parser.set_loop_depth(saved);
    content
}

/// `[static] [wild] [ref] name [: Type] [= value]`
pub fn parse_variable_declaration(
    parser: &mut Parser<'_>,
    ignore_newline: bool,
) -> VariableDeclaration {
    let start = parser.start(ignore_newline);

    let mut is_static = false;
    let mut is_wild = false;
    let mut is_ref = false;

    loop {
        let token = parser.current_token(ignore_newline);
        match token.value {
            TokenValue::Keyword(Keyword::Static) => is_static = true,
            TokenValue::Keyword(Keyword::Wild) => is_wild = true,
            TokenValue::Keyword(Keyword::Ref) => is_ref = true,
            _ => break,
        }
        parser.advance(ignore_newline);
    }

    let name = parser.expect_identifier(ignore_newline).unwrap_or_default();

    let optional_type = if parser
        .current_token(ignore_newline)
        .is_delimiter(Delimiter::Colon)
    {
        parser.advance(ignore_newline);
        Some(Box::new(parse_type(parser, ignore_newline)))
    } else {
        None
    };

    let optional_initializer = if parser
        .current_token(ignore_newline)
        .is_operator(Operator::Assign)
    {
        parser.advance(ignore_newline);
        Some(Box::new(parse_expression(parser, ignore_newline, false)))
    } else {
        None
    };

    VariableDeclaration {
        is_static,
        is_wild,
        is_ref,
        name,
        optional_type,
        optional_initializer,
        span: parser.span_from(start),
    }
}

/// Parses an argument list after its `(`: declarations, the last of which
/// may be variadic (`...rest`).
pub fn parse_arguments(
    parser: &mut Parser<'_>,
) -> (Vec<VariableDeclaration>, Option<VariableDeclaration>) {
    let (items, _) = parse_list(parser, Delimiter::ParenthesesClose, |parser| {
        let token = parser.current_token(true);
        let ellipsis = if token.is_delimiter(Delimiter::Ellipsis) {
            parser.advance(true);
            Some(token.position)
        } else {
            None
        };
        (ellipsis, parse_variable_declaration(parser, true))
    });

    let count = items.len();
    let mut arguments = vec![];
    let mut variadic = None;

    for (index, (ellipsis, declaration)) in items.into_iter().enumerate() {
        match ellipsis {
            Some(_) if index + 1 == count => variadic = Some(declaration),
            Some(position) => {
                parser.error(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: declaration.name.clone(),
                        message: String::from("only the last argument can be variadic"),
                    },
                    position,
                );
                arguments.push(declaration);
            }
            None => arguments.push(declaration),
        }
    }

    (arguments, variadic)
}

pub fn parse_var_decl_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    let declaration = parse_variable_declaration(parser, false);
    let span = parser.span_from(start);

    parse_terminator(parser);
    Statement::new(StatementKind::Variable(declaration), span)
}

/// Parses `[.]name(.name)*`, the path of an import or include.
fn parse_module_path(parser: &mut Parser<'_>) -> (Vec<String>, bool) {
    let relative = parser.current_token(false).is_delimiter(Delimiter::Dot);
    if relative {
        parser.advance(false);
    }

    let mut path = vec![];
    if let Some(name) = parser.expect_identifier(false) {
        path.push(name);

        while parser.current_token(false).is_delimiter(Delimiter::Dot) {
            parser.advance(false);
            match parser.expect_identifier(false) {
                Some(name) => path.push(name),
                None => break,
            }
        }
    }

    (path, relative)
}

pub fn parse_import_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let (path, relative) = parse_module_path(parser);

    let optional_alias = if parser.current_token(false).is_keyword(Keyword::As) {
        parser.advance(false);
        parser.expect_identifier(false)
    } else {
        None
    };
    let span = parser.span_from(start);

    parse_terminator(parser);
    Statement::new(
        StatementKind::Import(Import {
            path,
            relative,
            optional_alias,
        }),
        span,
    )
}

pub fn parse_include_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let (path, relative) = parse_module_path(parser);
    let span = parser.span_from(start);

    parse_terminator(parser);
    Statement::new(StatementKind::Include(Include { path, relative }), span)
}

/// `def name ...` declares a function, any other `def` starts an expression.
pub fn parse_def_stmt(parser: &mut Parser<'_>) -> Statement {
    if parser.peek_token(1, false).kind == TokenKind::Identifier {
        let start = parser.start(true);
        return parse_function(parser, false, false, start);
    }

    parse_expression_stmt(parser)
}

pub fn parse_incase_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let token = parser.current_token(false);
    match token.value {
        TokenValue::Keyword(Keyword::Static)
            if parser.peek_token(1, false).is_keyword(Keyword::Def) =>
        {
            parser.advance(false);
            parse_function(parser, true, true, start)
        }
        TokenValue::Keyword(Keyword::Static)
            if starts_type_declaration(&parser.peek_token(1, false)) =>
        {
            let static_token = parser.advance(false);
            parse_static_type_declaration(parser, true, &static_token, start)
        }
        TokenValue::Keyword(Keyword::Def) => parse_function(parser, true, false, start),
        TokenValue::Keyword(Keyword::Class) => parse_class(parser, true, start),
        TokenValue::Keyword(Keyword::Struct) => parse_struct(parser, true, start),
        TokenValue::Keyword(Keyword::Alias) => parse_alias(parser, true, start),
        _ => {
            parser.expected(String::from("a declaration after `incase`"), &token);
            Statement::invalid(parser.span_from(start))
        }
    }
}

/// `static def ...` or a static variable declaration.
pub fn parse_static_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    let next = parser.peek_token(1, false);

    if next.is_keyword(Keyword::Def) {
        parser.advance(true);
        return parse_function(parser, false, true, start);
    }

    if starts_type_declaration(&next) {
        let static_token = parser.advance(true);
        return parse_static_type_declaration(parser, false, &static_token, start);
    }

    parse_var_decl_stmt(parser)
}

fn starts_type_declaration(token: &Token) -> bool {
    token.is_keyword(Keyword::Class)
        || token.is_keyword(Keyword::Struct)
        || token.is_keyword(Keyword::Alias)
}

/// Classes, structs and aliases cannot be static. The `static` is reported
/// and the declaration after it parsed as usual.
fn parse_static_type_declaration(
    parser: &mut Parser<'_>,
    is_incase: bool,
    static_token: &Token,
    start: usize,
) -> Statement {
    parser.error(
        ErrorImpl::UnexpectedTokenDetailed {
            token: static_token.to_string(),
            message: String::from("only functions and variables can be static"),
        },
        static_token.position,
    );

    let token = parser.current_token(false);
    if token.is_keyword(Keyword::Class) {
        parse_class(parser, is_incase, start)
    } else if token.is_keyword(Keyword::Struct) {
        parse_struct(parser, is_incase, start)
    } else {
        parse_alias(parser, is_incase, start)
    }
}

/// `def name(.name)*[!T] (arguments) [-> [ref] Type] body`
///
/// The parser must be on `def`.
fn parse_function(
    parser: &mut Parser<'_>,
    is_incase: bool,
    is_static: bool,
    start: usize,
) -> Statement {
    parser.advance(false);

    let mut identifiers = vec![];
    if let Some(name) = parser.expect_identifier(false) {
        identifiers.push(name);

        while parser.current_token(false).is_delimiter(Delimiter::Dot) {
            parser.advance(false);
            match parser.expect_identifier(false) {
                Some(name) => identifiers.push(name),
                None => break,
            }
        }
    }

    let template_arguments = if parser
        .current_token(false)
        .is_delimiter(Delimiter::Exclamation)
    {
        parse_template_parameters(parser)
    } else {
        vec![]
    };

    let (arguments, optional_variadic_argument) =
        if parser.expect_delimiter(Delimiter::ParenthesesOpen, false) {
            parse_arguments(parser)
        } else {
            (vec![], None)
        };

    let (is_return_type_ref, optional_return_type) = parse_return_type(parser, false);
    let content = parse_detached_body(parser);

    Statement::new(
        StatementKind::Function(Function {
            is_incase,
            is_static,
            identifiers,
            template_arguments,
            arguments,
            optional_variadic_argument,
            is_return_type_ref,
            optional_return_type,
            content,
        }),
        parser.span_from(start),
    )
}

/// Parses the name and optional template parameters of a class or struct.
fn parse_type_header(parser: &mut Parser<'_>) -> (String, Vec<String>) {
    parser.advance(false);
    let name = parser.expect_identifier(false).unwrap_or_default();

    let template_arguments = if parser
        .current_token(false)
        .is_delimiter(Delimiter::Exclamation)
    {
        parse_template_parameters(parser)
    } else {
        vec![]
    };

    (name, template_arguments)
}

pub fn parse_class_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parse_class(parser, false, start)
}

fn parse_class(parser: &mut Parser<'_>, is_incase: bool, start: usize) -> Statement {
    let (name, template_arguments) = parse_type_header(parser);

    let optional_base_type = if parser.current_token(true).is_keyword(Keyword::Inherits) {
        parser.advance(true);
        Some(parse_type(parser, false))
    } else {
        None
    };

    let content = parse_detached_body(parser);

    Statement::new(
        StatementKind::Class(Class {
            is_incase,
            name,
            template_arguments,
            optional_base_type,
            content,
        }),
        parser.span_from(start),
    )
}

pub fn parse_struct_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parse_struct(parser, false, start)
}

fn parse_struct(parser: &mut Parser<'_>, is_incase: bool, start: usize) -> Statement {
    let (name, template_arguments) = parse_type_header(parser);

    let token = parser.current_token(true);
    if token.is_keyword(Keyword::Inherits) {
        parser.error(ErrorImpl::StructInheritance { name: name.clone() }, token.position);
        parser.advance(true);
        // Parsed for recovery only
        parse_type(parser, false);
    }

    let content = parse_detached_body(parser);

    Statement::new(
        StatementKind::Struct(Struct {
            is_incase,
            name,
            template_arguments,
            content,
        }),
        parser.span_from(start),
    )
}

/// `enum Name { A, B = 5, C }`
///
/// Values count up from the previous one. Members repeating an earlier name
/// or value are reported and left out.
pub fn parse_enum_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let name = parser.expect_identifier(false).unwrap_or_default();

    let mut members: Vec<String> = vec![];
    let mut values: Vec<u64> = vec![];

    if parser.expect_delimiter(Delimiter::CurlyBracketOpen, true) {
        let mut counter = 0u64;

        parse_list(parser, Delimiter::CurlyBracketClose, |parser| {
            let position = parser.get_position(true);
            let member = match parser.expect_identifier(true) {
                Some(member) => member,
                None => return,
            };

            let mut value = counter;
            if parser.current_token(true).is_operator(Operator::Assign) {
                parser.advance(true);
                if let Some(explicit) = parse_enum_value(parser) {
                    value = explicit;
                }
            }
            counter = value.saturating_add(1);

            if members.contains(&member) {
                parser.error(ErrorImpl::DuplicateEnumMember { name: member }, position);
            } else if values.contains(&value) {
                parser.error(ErrorImpl::DuplicateEnumValue { value }, position);
            } else {
                members.push(member);
                values.push(value);
            }
        });
    }

    Statement::new(
        StatementKind::Enum(Enum {
            name,
            members,
            values,
        }),
        parser.span_from(start),
    )
}

fn parse_enum_value(parser: &mut Parser<'_>) -> Option<u64> {
    let token = parser.current_token(true);

    let value = match token.value {
        TokenValue::Integer(value, _) if value >= 0 => Some(value as u64),
        TokenValue::UnsignedInteger(value, _) => Some(value),
        _ => None,
    };

    match value {
        Some(_) => {
            parser.advance(true);
        }
        None => {
            parser.error(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: token.to_string(),
                    message: String::from("enum values are non-negative integers"),
                },
                token.position,
            );
            if !token.is_recovery_anchor() {
                parser.advance(true);
            }
        }
    }

    value
}

pub fn parse_alias_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parse_alias(parser, false, start)
}

/// `alias Name expression`
fn parse_alias(parser: &mut Parser<'_>, is_incase: bool, start: usize) -> Statement {
    parser.advance(false);
    let name = parser.expect_identifier(false).unwrap_or_default();
    let expression = parse_expression(parser, false, false);
    let span = parser.span_from(start);

    parse_terminator(parser);
    Statement::new(
        StatementKind::Alias(Alias {
            is_incase,
            name,
            expression,
        }),
        span,
    )
}

/// `if cond body (elif cond body)* (else body)?`
pub fn parse_if_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let mut branch_conditions = vec![parse_expression(parser, false, false)];
    let mut branch_contents = vec![parse_block(parser)];
    let mut optional_else_content = None;

    loop {
        let token = parser.current_token(true);

        if token.is_keyword(Keyword::Elif) {
            parser.advance(true);
            branch_conditions.push(parse_expression(parser, false, false));
            branch_contents.push(parse_block(parser));
        } else if token.is_keyword(Keyword::Else) {
            parser.advance(true);
            optional_else_content = Some(parse_block(parser));
            break;
        } else {
            break;
        }
    }

    Statement::new(
        StatementKind::IfBranch(IfBranch {
            branch_conditions,
            branch_contents,
            optional_else_content,
        }),
        parser.span_from(start),
    )
}

pub fn parse_while_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let condition = parse_expression(parser, false, false);
    let content = parse_loop_body(parser);

    Statement::new(
        StatementKind::WhileLoop(WhileLoop { condition, content }),
        parser.span_from(start),
    )
}

/// `do body while cond`
pub fn parse_do_while_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let content = parse_loop_body(parser);

    let condition = if parser.expect_keyword(Keyword::While, true) {
        parse_expression(parser, false, false)
    } else {
        Expression::invalid(parser.span_from(parser.start(true)))
    };
    let span = parser.span_from(start);

    parse_terminator(parser);
    Statement::new(
        StatementKind::DoWhileLoop(DoWhileLoop { condition, content }),
        span,
    )
}

/// `for a, b in iteratee body`
pub fn parse_for_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let mut iterators = vec![];
    if let Some(name) = parser.expect_identifier(false) {
        iterators.push(name);

        while parser.current_token(false).is_delimiter(Delimiter::Comma) {
            parser.advance(false);
            match parser.expect_identifier(false) {
                Some(name) => iterators.push(name),
                None => break,
            }
        }
    }

    parser.expect_keyword(Keyword::In, false);
    let iteratee = parse_expression(parser, false, false);
    let content = parse_loop_body(parser);

    Statement::new(
        StatementKind::ForLoop(ForLoop {
            iterators,
            iteratee,
            content,
        }),
        parser.span_from(start),
    )
}

/// `break` or `continue`
pub fn parse_loop_control_stmt(parser: &mut Parser<'_>) -> Statement {
    let token = parser.advance(true);

    if parser.config().validate_loop_control && parser.loop_depth() == 0 {
        parser.error(
            ErrorImpl::LoopControlOutsideLoop {
                keyword: token.to_string(),
            },
            token.position,
        );
    }

    let kind = if token.is_keyword(Keyword::Break) {
        StatementKind::Break
    } else {
        StatementKind::Continue
    };
    let span = token.span();

    parse_terminator(parser);
    Statement::new(kind, span)
}

/// `return [value, ...]`
pub fn parse_return_stmt(parser: &mut Parser<'_>) -> Statement {
    let start = parser.start(true);
    parser.advance(true);

    let mut values = vec![];
    if !parser.current_token(false).is_terminator() {
        values.push(parse_expression(parser, false, false));

        while parser.current_token(false).is_delimiter(Delimiter::Comma) {
            parser.advance(false);
            values.push(parse_expression(parser, false, false));
        }
    }
    let span = parser.span_from(start);

    parse_terminator(parser);
    Statement::new(StatementKind::Return(Return { values }), span)
}
