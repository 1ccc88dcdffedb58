use crate::Span;

use super::expressions::{count_all, Expression, VariableDeclaration};

/// Statement
///
/// A node of the statement tree, owning its expressions and nested bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Placeholder left behind by a parse error
    Invalid,

    Expression(Expression),
    Variable(VariableDeclaration),

    Import(Import),
    Include(Include),

    Function(Function),
    Class(Class),
    Struct(Struct),
    Enum(Enum),
    Alias(Alias),

    IfBranch(IfBranch),
    WhileLoop(WhileLoop),
    DoWhileLoop(DoWhileLoop),
    ForLoop(ForLoop),

    Break,
    Continue,
    Return(Return),
}

/// `import .a.b as c`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: Vec<String>,
    pub relative: bool,
    pub optional_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub path: Vec<String>,
    pub relative: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub is_incase: bool,
    pub is_static: bool,
    /// Dotted name, `def Point.length()` gives `["Point", "length"]`
    pub identifiers: Vec<String>,
    pub template_arguments: Vec<String>,
    pub arguments: Vec<VariableDeclaration>,
    pub optional_variadic_argument: Option<VariableDeclaration>,
    pub is_return_type_ref: bool,
    pub optional_return_type: Option<Expression>,
    pub content: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub is_incase: bool,
    pub name: String,
    pub template_arguments: Vec<String>,
    pub optional_base_type: Option<Expression>,
    pub content: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub is_incase: bool,
    pub name: String,
    pub template_arguments: Vec<String>,
    pub content: Vec<Statement>,
}

/// Enum members and their values, paired by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub members: Vec<String>,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub is_incase: bool,
    pub name: String,
    pub expression: Expression,
}

/// An `if`/`elif` chain; conditions and contents are paired by index.
#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub branch_conditions: Vec<Expression>,
    pub branch_contents: Vec<Vec<Statement>>,
    pub optional_else_content: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: Expression,
    pub content: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileLoop {
    pub condition: Expression,
    pub content: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub iterators: Vec<String>,
    pub iteratee: Expression,
    pub content: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub values: Vec<Expression>,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Statement { kind, span }
    }

    pub fn invalid(span: Span) -> Self {
        Statement {
            kind: StatementKind::Invalid,
            span,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, StatementKind::Invalid)
    }

    /// Returns the name of the node kind, as used in dumps.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            StatementKind::Invalid => "invalid",
            StatementKind::Expression(_) => "expression",
            StatementKind::Variable(_) => "variable_declaration",
            StatementKind::Import(_) => "import",
            StatementKind::Include(_) => "include",
            StatementKind::Function(_) => "function",
            StatementKind::Class(_) => "class",
            StatementKind::Struct(_) => "struct",
            StatementKind::Enum(_) => "enum",
            StatementKind::Alias(_) => "alias",
            StatementKind::IfBranch(_) => "if_branch",
            StatementKind::WhileLoop(_) => "while_loop",
            StatementKind::DoWhileLoop(_) => "do_while_loop",
            StatementKind::ForLoop(_) => "for_loop",
            StatementKind::Break => "break",
            StatementKind::Continue => "continue",
            StatementKind::Return(_) => "return",
        }
    }

    /// Counts this node and every node it owns, expressions included.
    pub fn node_count(&self) -> usize {
        let optional = |expression: &Option<Expression>| {
            expression.as_ref().map_or(0, |expression| expression.node_count())
        };

        let children = match &self.kind {
            StatementKind::Expression(expression) => expression.node_count(),
            StatementKind::Variable(declaration) => declaration.child_count(),
            StatementKind::Function(function) => {
                function
                    .arguments
                    .iter()
                    .map(|argument| 1 + argument.child_count())
                    .sum::<usize>()
                    + function
                        .optional_variadic_argument
                        .as_ref()
                        .map_or(0, |argument| 1 + argument.child_count())
                    + optional(&function.optional_return_type)
                    + count_body(&function.content)
            }
            StatementKind::Class(class) => {
                optional(&class.optional_base_type) + count_body(&class.content)
            }
            StatementKind::Struct(struct_v) => count_body(&struct_v.content),
            StatementKind::Alias(alias) => alias.expression.node_count(),
            StatementKind::IfBranch(if_branch) => {
                count_all(&if_branch.branch_conditions)
                    + if_branch
                        .branch_contents
                        .iter()
                        .map(|content| count_body(content))
                        .sum::<usize>()
                    + if_branch
                        .optional_else_content
                        .as_ref()
                        .map_or(0, |content| count_body(content))
            }
            StatementKind::WhileLoop(while_loop) => {
                while_loop.condition.node_count() + count_body(&while_loop.content)
            }
            StatementKind::DoWhileLoop(do_while_loop) => {
                do_while_loop.condition.node_count() + count_body(&do_while_loop.content)
            }
            StatementKind::ForLoop(for_loop) => {
                for_loop.iteratee.node_count() + count_body(&for_loop.content)
            }
            StatementKind::Return(return_v) => count_all(&return_v.values),
            _ => 0,
        };

        1 + children
    }
}

pub(crate) fn count_body(statements: &[Statement]) -> usize {
    statements
        .iter()
        .map(|statement| statement.node_count())
        .sum()
}
