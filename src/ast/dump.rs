//! Textual dump of the AST.
//!
//! Every node renders as a single line of JSON-like text, for example
//! `{"type": "binary", "operator": "add", "left": {...}, "right": {...}}`.
//! Spans are left out so two parses of equivalent code dump the same.
//! Literal values are written back as source literals through the
//! `quote_*` helpers, which the lexer reads back to the same value.

use std::fmt::{Display, Formatter, Result};

use super::{
    ast::Module,
    expressions::{Expression, ExpressionKind, VariableDeclaration},
    statements::{Statement, StatementKind},
};

fn escape(character: char, quote: char) -> Option<String> {
    let escaped = match character {
        '\0' => "\\0",
        '\n' => "\\n",
        '\r' => "\\r",
        '\t' => "\\t",
        '\u{0B}' => "\\v",
        '\u{08}' => "\\b",
        '\u{07}' => "\\a",
        '\u{0C}' => "\\f",
        '\\' => "\\\\",
        _ if character == quote => {
            return Some(format!("\\{}", quote));
        }
        _ if character.is_control() => {
            return Some(format!("\\x{:02X}", character as u32));
        }
        _ => return None,
    };

    Some(String::from(escaped))
}

/// Renders a character as a character literal, `'a'` or `'\n'`.
pub fn quote_char(character: char) -> String {
    match escape(character, '\'') {
        Some(escaped) => format!("'{}'", escaped),
        None => format!("'{}'", character),
    }
}

/// Renders a string as a string literal with escapes for control characters.
pub fn quote_string(string: &str) -> String {
    let mut quoted = String::from("\"");

    for character in string.chars() {
        match escape(character, '"') {
            Some(escaped) => quoted.push_str(&escaped),
            None => quoted.push(character),
        }
    }

    quoted.push('"');
    quoted
}

fn escape_byte(byte: u8, quote: char) -> String {
    let character = byte as char;

    if !byte.is_ascii() {
        return format!("\\x{:02X}", byte);
    }

    match escape(character, quote) {
        Some(escaped) => escaped,
        None => character.to_string(),
    }
}

/// Renders a byte as a byte literal, `b'a'` or `b'\xFF'`.
pub fn quote_byte(byte: u8) -> String {
    format!("b'{}'", escape_byte(byte, '\''))
}

/// Renders bytes as a buffer literal, `b"..."`.
pub fn quote_buffer(buffer: &[u8]) -> String {
    let mut quoted = String::from("b\"");

    for byte in buffer {
        quoted.push_str(&escape_byte(*byte, '"'));
    }

    quoted.push('"');
    quoted
}

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> Result {
    write!(f, "[")?;
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

fn write_names(f: &mut Formatter<'_>, names: &[String]) -> Result {
    let quoted = names
        .iter()
        .map(|name| quote_string(name))
        .collect::<Vec<String>>();

    write!(f, "[{}]", quoted.join(", "))
}

fn write_optional<T: Display>(f: &mut Formatter<'_>, item: Option<&T>) -> Result {
    match item {
        Some(item) => write!(f, "{}", item),
        None => write!(f, "null"),
    }
}

impl Display for VariableDeclaration {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{{\"type\": \"variable_declaration\", \"is_static\": {}, \"is_wild\": {}, \"is_ref\": {}, \"name\": {}, \"optional_type\": ",
            self.is_static,
            self.is_wild,
            self.is_ref,
            quote_string(&self.name)
        )?;
        write_optional(f, self.optional_type.as_deref())?;
        write!(f, ", \"optional_initializer\": ")?;
        write_optional(f, self.optional_initializer.as_deref())?;
        write!(f, "}}")
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        // Declarations share their dump with the statement form
        if let ExpressionKind::Variable(declaration) = &self.kind {
            return write!(f, "{}", declaration);
        }

        write!(f, "{{\"type\": \"{}\"", self.name())?;

        match &self.kind {
            ExpressionKind::Invalid | ExpressionKind::Variable(_) => {}
            ExpressionKind::Identifier(name) => write!(f, ", \"name\": {}", quote_string(name))?,
            ExpressionKind::Character(value) => write!(f, ", \"value\": {}", quote_char(*value))?,
            ExpressionKind::String(value) => write!(f, ", \"value\": {}", quote_string(value))?,
            ExpressionKind::Buffer(value) => write!(f, ", \"value\": {}", quote_buffer(value))?,
            ExpressionKind::Byte(value) => write!(f, ", \"value\": {}", quote_byte(*value))?,
            ExpressionKind::Integer { value, width } => {
                write!(f, ", \"width\": \"{}\", \"value\": {}", width.name(), value)?
            }
            ExpressionKind::UnsignedInteger { value, width } => {
                write!(f, ", \"width\": \"{}\", \"value\": {}", width.name(), value)?
            }
            ExpressionKind::Float(value) | ExpressionKind::ImaginaryFloat(value) => {
                write!(f, ", \"value\": {:?}", value)?
            }
            ExpressionKind::Double(value) | ExpressionKind::ImaginaryDouble(value) => {
                write!(f, ", \"value\": {:?}", value)?
            }
            ExpressionKind::Tuple(values) | ExpressionKind::Array(values) => {
                write!(f, ", \"values\": ")?;
                write_list(f, values)?;
            }
            ExpressionKind::Dict { keys, values } => {
                write!(f, ", \"keys\": ")?;
                write_list(f, keys)?;
                write!(f, ", \"values\": ")?;
                write_list(f, values)?;
            }
            ExpressionKind::Unary(unary) => write!(
                f,
                ", \"operator\": \"{}\", \"operand\": {}",
                unary.operator, unary.operand
            )?,
            ExpressionKind::Binary(binary) => write!(
                f,
                ", \"operator\": \"{}\", \"left\": {}, \"right\": {}",
                binary.operator, binary.left, binary.right
            )?,
            ExpressionKind::Ternary(ternary) => write!(
                f,
                ", \"condition\": {}, \"value\": {}, \"otherwise\": {}",
                ternary.condition, ternary.value, ternary.otherwise
            )?,
            ExpressionKind::Comparison(comparison) => {
                let operators = comparison
                    .operators
                    .iter()
                    .map(|operator| format!("\"{}\"", operator))
                    .collect::<Vec<String>>();
                write!(f, ", \"operators\": [{}], \"operands\": ", operators.join(", "))?;
                write_list(f, &comparison.operands)?;
            }
            ExpressionKind::Call(call) => {
                write!(f, ", \"callee\": {}, \"arguments\": ", call.callee)?;
                write_list(f, &call.arguments)?;
            }
            ExpressionKind::Index(index) => {
                write!(f, ", \"indexee\": {}, \"arguments\": ", index.indexee)?;
                write_list(f, &index.arguments)?;
            }
            ExpressionKind::Lambda(lambda) => {
                write!(f, ", \"arguments\": ")?;
                write_list(f, &lambda.arguments)?;
                write!(f, ", \"optional_variadic_argument\": ")?;
                write_optional(f, lambda.optional_variadic_argument.as_deref())?;
                write!(
                    f,
                    ", \"is_return_type_ref\": {}, \"optional_return_type\": ",
                    lambda.is_return_type_ref
                )?;
                write_optional(f, lambda.optional_return_type.as_deref())?;
                write!(f, ", \"content\": ")?;
                write_list(f, &lambda.content)?;
            }
            ExpressionKind::FunctionType(function_type) => {
                write!(f, ", \"are_arguments_refs\": ")?;
                write_list(f, &function_type.are_arguments_refs)?;
                write!(f, ", \"argument_types\": ")?;
                write_list(f, &function_type.argument_types)?;
                write!(
                    f,
                    ", \"is_return_type_ref\": {}, \"optional_return_type\": ",
                    function_type.is_return_type_ref
                )?;
                write_optional(f, function_type.optional_return_type.as_deref())?;
            }
            ExpressionKind::Scope(scope) => {
                write!(f, ", \"value\": {}, \"scope_names\": ", scope.value)?;
                write_names(f, &scope.scope_names)?;
            }
            ExpressionKind::Templatize(templatize) => {
                write!(f, ", \"value\": {}, \"template_arguments\": ", templatize.value)?;
                write_list(f, &templatize.template_arguments)?;
            }
        }

        write!(f, "}}")
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if let StatementKind::Variable(declaration) = &self.kind {
            return write!(f, "{}", declaration);
        }

        write!(f, "{{\"type\": \"{}\"", self.name())?;

        match &self.kind {
            StatementKind::Invalid
            | StatementKind::Variable(_)
            | StatementKind::Break
            | StatementKind::Continue => {}
            StatementKind::Expression(expression) => {
                write!(f, ", \"expression\": {}", expression)?
            }
            StatementKind::Import(import_v) => {
                write!(f, ", \"path\": ")?;
                write_names(f, &import_v.path)?;
                write!(f, ", \"relative\": {}, \"optional_alias\": ", import_v.relative)?;
                match &import_v.optional_alias {
                    Some(alias) => write!(f, "{}", quote_string(alias))?,
                    None => write!(f, "null")?,
                }
            }
            StatementKind::Include(include) => {
                write!(f, ", \"path\": ")?;
                write_names(f, &include.path)?;
                write!(f, ", \"relative\": {}", include.relative)?;
            }
            StatementKind::Function(function) => {
                write!(
                    f,
                    ", \"is_incase\": {}, \"is_static\": {}, \"identifiers\": ",
                    function.is_incase, function.is_static
                )?;
                write_names(f, &function.identifiers)?;
                write!(f, ", \"template_arguments\": ")?;
                write_names(f, &function.template_arguments)?;
                write!(f, ", \"arguments\": ")?;
                write_list(f, &function.arguments)?;
                write!(f, ", \"optional_variadic_argument\": ")?;
                write_optional(f, function.optional_variadic_argument.as_ref())?;
                write!(
                    f,
                    ", \"is_return_type_ref\": {}, \"optional_return_type\": ",
                    function.is_return_type_ref
                )?;
                write_optional(f, function.optional_return_type.as_ref())?;
                write!(f, ", \"content\": ")?;
                write_list(f, &function.content)?;
            }
            StatementKind::Class(class) => {
                write!(
                    f,
                    ", \"is_incase\": {}, \"name\": {}, \"template_arguments\": ",
                    class.is_incase,
                    quote_string(&class.name)
                )?;
                write_names(f, &class.template_arguments)?;
                write!(f, ", \"optional_base_type\": ")?;
                write_optional(f, class.optional_base_type.as_ref())?;
                write!(f, ", \"content\": ")?;
                write_list(f, &class.content)?;
            }
            StatementKind::Struct(struct_v) => {
                write!(
                    f,
                    ", \"is_incase\": {}, \"name\": {}, \"template_arguments\": ",
                    struct_v.is_incase,
                    quote_string(&struct_v.name)
                )?;
                write_names(f, &struct_v.template_arguments)?;
                write!(f, ", \"content\": ")?;
                write_list(f, &struct_v.content)?;
            }
            StatementKind::Enum(enum_v) => {
                write!(f, ", \"name\": {}, \"members\": ", quote_string(&enum_v.name))?;
                write_names(f, &enum_v.members)?;
                write!(f, ", \"values\": ")?;
                write_list(f, &enum_v.values)?;
            }
            StatementKind::Alias(alias) => write!(
                f,
                ", \"is_incase\": {}, \"name\": {}, \"expression\": {}",
                alias.is_incase,
                quote_string(&alias.name),
                alias.expression
            )?,
            StatementKind::IfBranch(if_branch) => {
                write!(f, ", \"branch_conditions\": ")?;
                write_list(f, &if_branch.branch_conditions)?;
                write!(f, ", \"branch_contents\": [")?;
                for (index, content) in if_branch.branch_contents.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write_list(f, content)?;
                }
                write!(f, "], \"optional_else_content\": ")?;
                match &if_branch.optional_else_content {
                    Some(content) => write_list(f, content)?,
                    None => write!(f, "null")?,
                }
            }
            StatementKind::WhileLoop(while_loop) => {
                write!(f, ", \"condition\": {}, \"content\": ", while_loop.condition)?;
                write_list(f, &while_loop.content)?;
            }
            StatementKind::DoWhileLoop(do_while_loop) => {
                write!(f, ", \"condition\": {}, \"content\": ", do_while_loop.condition)?;
                write_list(f, &do_while_loop.content)?;
            }
            StatementKind::ForLoop(for_loop) => {
                write!(f, ", \"iterators\": ")?;
                write_names(f, &for_loop.iterators)?;
                write!(f, ", \"iteratee\": {}, \"content\": ", for_loop.iteratee)?;
                write_list(f, &for_loop.content)?;
            }
            StatementKind::Return(return_v) => {
                write!(f, ", \"values\": ")?;
                write_list(f, &return_v.values)?;
            }
        }

        write!(f, "}}")
    }
}

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{{\"type\": \"module\", \"statements\": ")?;
        write_list(f, &self.statements)?;
        write!(f, "}}")
    }
}
