use crate::{lexer::tokens::IntegerWidth, Span};

use super::{
    operators::{BinaryOperator, ComparisonOperator, UnaryOperator},
    statements::Statement,
};

/// Expression
///
/// A node of the expression tree. Every child is exclusively owned, so
/// `Clone` is a deep copy and dropping the root frees each child once.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// Placeholder left behind by a parse error
    Invalid,

    Identifier(String),

    Character(char),
    String(String),
    Buffer(Vec<u8>),
    Byte(u8),
    Integer { value: i64, width: IntegerWidth },
    UnsignedInteger { value: u64, width: IntegerWidth },
    Float(f32),
    Double(f64),
    ImaginaryFloat(f32),
    ImaginaryDouble(f64),

    Tuple(Vec<Expression>),
    Array(Vec<Expression>),
    Dict {
        keys: Vec<Expression>,
        values: Vec<Expression>,
    },

    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Ternary(TernaryExpression),
    Comparison(ComparisonExpression),
    Call(CallExpression),
    Index(IndexExpression),

    Variable(VariableDeclaration),
    Lambda(LambdaExpression),
    FunctionType(FunctionTypeExpression),

    Scope(ScopeExpression),
    Templatize(TemplatizeExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

/// `value if condition else otherwise`
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpression {
    pub condition: Box<Expression>,
    pub value: Box<Expression>,
    pub otherwise: Box<Expression>,
}

/// A whole comparison chain such as `a < b == c`.
///
/// There is always exactly one operator less than there are operands.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonExpression {
    pub operators: Vec<ComparisonOperator>,
    pub operands: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub indexee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

/// `[static] [wild] [ref] name: Type = initializer`
///
/// Used on its own as a statement, inline as an expression, and for the
/// arguments of functions and lambdas.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub is_static: bool,
    pub is_wild: bool,
    pub is_ref: bool,
    pub name: String,
    pub optional_type: Option<Box<Expression>>,
    pub optional_initializer: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpression {
    pub arguments: Vec<VariableDeclaration>,
    pub optional_variadic_argument: Option<Box<VariableDeclaration>>,
    pub is_return_type_ref: bool,
    pub optional_return_type: Option<Box<Expression>>,
    pub content: Vec<Statement>,
}

/// `def!(ref A, B) -> ref C`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeExpression {
    pub are_arguments_refs: Vec<bool>,
    pub argument_types: Vec<Expression>,
    pub is_return_type_ref: bool,
    pub optional_return_type: Option<Box<Expression>>,
}

/// `value.a.b.c`
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeExpression {
    pub value: Box<Expression>,
    pub scope_names: Vec<String>,
}

/// `value!T` or `value!(T, U)`
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatizeExpression {
    pub value: Box<Expression>,
    pub template_arguments: Vec<Expression>,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Expression { kind, span }
    }

    pub fn invalid(span: Span) -> Self {
        Expression {
            kind: ExpressionKind::Invalid,
            span,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, ExpressionKind::Invalid)
    }

    /// Returns the name of the node kind, as used in dumps.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            ExpressionKind::Invalid => "invalid",
            ExpressionKind::Identifier(_) => "identifier",
            ExpressionKind::Character(_) => "char",
            ExpressionKind::String(_) => "string",
            ExpressionKind::Buffer(_) => "buffer",
            ExpressionKind::Byte(_) => "byte",
            ExpressionKind::Integer { .. } => "integer",
            ExpressionKind::UnsignedInteger { .. } => "uinteger",
            ExpressionKind::Float(_) => "float",
            ExpressionKind::Double(_) => "double",
            ExpressionKind::ImaginaryFloat(_) => "ifloat",
            ExpressionKind::ImaginaryDouble(_) => "idouble",
            ExpressionKind::Tuple(_) => "tuple",
            ExpressionKind::Array(_) => "array",
            ExpressionKind::Dict { .. } => "dict",
            ExpressionKind::Unary(_) => "unary",
            ExpressionKind::Binary(_) => "binary",
            ExpressionKind::Ternary(_) => "ternary",
            ExpressionKind::Comparison(_) => "comparison",
            ExpressionKind::Call(_) => "call",
            ExpressionKind::Index(_) => "index",
            ExpressionKind::Variable(_) => "variable_declaration",
            ExpressionKind::Lambda(_) => "lambda",
            ExpressionKind::FunctionType(_) => "function_type",
            ExpressionKind::Scope(_) => "scope",
            ExpressionKind::Templatize(_) => "templatize",
        }
    }

    /// Counts this node and every node it owns, statements included.
    pub fn node_count(&self) -> usize {
        let children = match &self.kind {
            ExpressionKind::Tuple(values) | ExpressionKind::Array(values) => count_all(values),
            ExpressionKind::Dict { keys, values } => count_all(keys) + count_all(values),
            ExpressionKind::Unary(unary) => unary.operand.node_count(),
            ExpressionKind::Binary(binary) => binary.left.node_count() + binary.right.node_count(),
            ExpressionKind::Ternary(ternary) => {
                ternary.condition.node_count()
                    + ternary.value.node_count()
                    + ternary.otherwise.node_count()
            }
            ExpressionKind::Comparison(comparison) => count_all(&comparison.operands),
            ExpressionKind::Call(call) => call.callee.node_count() + count_all(&call.arguments),
            ExpressionKind::Index(index) => {
                index.indexee.node_count() + count_all(&index.arguments)
            }
            ExpressionKind::Variable(declaration) => declaration.child_count(),
            ExpressionKind::Lambda(lambda) => {
                lambda
                    .arguments
                    .iter()
                    .map(|argument| 1 + argument.child_count())
                    .sum::<usize>()
                    + lambda
                        .optional_variadic_argument
                        .as_ref()
                        .map_or(0, |argument| 1 + argument.child_count())
                    + lambda
                        .optional_return_type
                        .as_ref()
                        .map_or(0, |return_type| return_type.node_count())
                    + lambda
                        .content
                        .iter()
                        .map(|statement| statement.node_count())
                        .sum::<usize>()
            }
            ExpressionKind::FunctionType(function_type) => {
                count_all(&function_type.argument_types)
                    + function_type
                        .optional_return_type
                        .as_ref()
                        .map_or(0, |return_type| return_type.node_count())
            }
            ExpressionKind::Scope(scope) => scope.value.node_count(),
            ExpressionKind::Templatize(templatize) => {
                templatize.value.node_count() + count_all(&templatize.template_arguments)
            }
            _ => 0,
        };

        1 + children
    }
}

impl VariableDeclaration {
    /// Counts the type and initializer nodes, not the declaration itself.
    pub fn child_count(&self) -> usize {
        self.optional_type
            .as_ref()
            .map_or(0, |expression| expression.node_count())
            + self
                .optional_initializer
                .as_ref()
                .map_or(0, |expression| expression.node_count())
    }
}

pub(crate) fn count_all(expressions: &[Expression]) -> usize {
    expressions
        .iter()
        .map(|expression| expression.node_count())
        .sum()
}
