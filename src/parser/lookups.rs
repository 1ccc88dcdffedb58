use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::{
        operators::{BinaryOperator, ComparisonOperator, UnaryOperator},
        statements::Statement,
    },
    lexer::tokens::{Keyword, Operator},
};

use super::{parser::Parser, stmt::*};

/// Binding powers of the left-associative binary levels, loosest first.
///
/// Levels between them (`not`, comparisons, unary prefixes and `^`) have
/// their own functions in the expression cascade.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Range,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Shift,
    Additive,
    Multiplicative,
    /// Tighter than every binary level, stops any loop
    Unary,
}

impl BindingPower {
    /// The level right operands are parsed at, which makes the level left-associative.
    pub fn next(self) -> BindingPower {
        match self {
            BindingPower::LogicalOr => BindingPower::LogicalXor,
            BindingPower::LogicalXor => BindingPower::LogicalAnd,
            BindingPower::LogicalAnd => BindingPower::Range,
            BindingPower::Range => BindingPower::BitwiseOr,
            BindingPower::BitwiseOr => BindingPower::BitwiseXor,
            BindingPower::BitwiseXor => BindingPower::BitwiseAnd,
            BindingPower::BitwiseAnd => BindingPower::Shift,
            BindingPower::Shift => BindingPower::Additive,
            BindingPower::Additive => BindingPower::Multiplicative,
            BindingPower::Multiplicative | BindingPower::Unary => BindingPower::Unary,
        }
    }
}

pub type StmtHandler = fn(&mut Parser<'_>) -> Statement;

lazy_static! {
    /// `or`, `xor` and `and`, parsed above `not`.
    pub static ref LOGICAL_LOOKUP: HashMap<Operator, (BinaryOperator, BindingPower)> = {
        let mut map = HashMap::new();
        map.insert(Operator::Or, (BinaryOperator::Or, BindingPower::LogicalOr));
        map.insert(Operator::Xor, (BinaryOperator::Xor, BindingPower::LogicalXor));
        map.insert(Operator::And, (BinaryOperator::And, BindingPower::LogicalAnd));
        map
    };

    /// Binary levels parsed below comparisons.
    pub static ref BINARY_LOOKUP: HashMap<Operator, (BinaryOperator, BindingPower)> = {
        let mut map = HashMap::new();
        map.insert(Operator::Range, (BinaryOperator::Range, BindingPower::Range));
        map.insert(Operator::BitOr, (BinaryOperator::BitOr, BindingPower::BitwiseOr));
        // `~` between two operands is exclusive or
        map.insert(Operator::BitNot, (BinaryOperator::BitXor, BindingPower::BitwiseXor));
        map.insert(Operator::BitAnd, (BinaryOperator::BitAnd, BindingPower::BitwiseAnd));
        map.insert(Operator::BitLShift, (BinaryOperator::BitLShift, BindingPower::Shift));
        map.insert(Operator::BitRShift, (BinaryOperator::BitRShift, BindingPower::Shift));
        map.insert(Operator::Add, (BinaryOperator::Add, BindingPower::Additive));
        map.insert(Operator::Sub, (BinaryOperator::Sub, BindingPower::Additive));
        map.insert(Operator::Mul, (BinaryOperator::Mul, BindingPower::Multiplicative));
        map.insert(Operator::Div, (BinaryOperator::Div, BindingPower::Multiplicative));
        map.insert(Operator::Mod, (BinaryOperator::Mod, BindingPower::Multiplicative));
        map.insert(Operator::Dot, (BinaryOperator::Dot, BindingPower::Multiplicative));
        map
    };

    pub static ref INPLACE_LOOKUP: HashMap<Operator, BinaryOperator> = {
        let mut map = HashMap::new();
        map.insert(Operator::Assign, BinaryOperator::Assign);
        map.insert(Operator::IAdd, BinaryOperator::IAdd);
        map.insert(Operator::ISub, BinaryOperator::ISub);
        map.insert(Operator::IMul, BinaryOperator::IMul);
        map.insert(Operator::IDiv, BinaryOperator::IDiv);
        map.insert(Operator::IMod, BinaryOperator::IMod);
        map.insert(Operator::IDot, BinaryOperator::IDot);
        map.insert(Operator::IPow, BinaryOperator::IPow);
        map.insert(Operator::IBitAnd, BinaryOperator::IBitAnd);
        map.insert(Operator::IBitOr, BinaryOperator::IBitOr);
        map.insert(Operator::IBitXor, BinaryOperator::IBitXor);
        map.insert(Operator::IBitLShift, BinaryOperator::IBitLShift);
        map.insert(Operator::IBitRShift, BinaryOperator::IBitRShift);
        map
    };

    pub static ref COMPARISON_LOOKUP: HashMap<Operator, ComparisonOperator> = {
        let mut map = HashMap::new();
        map.insert(Operator::Equal, ComparisonOperator::Equal);
        map.insert(Operator::NotEqual, ComparisonOperator::NotEqual);
        map.insert(Operator::Less, ComparisonOperator::Less);
        map.insert(Operator::Greater, ComparisonOperator::Greater);
        map.insert(Operator::LessEqual, ComparisonOperator::LessEqual);
        map.insert(Operator::GreaterEqual, ComparisonOperator::GreaterEqual);
        map
    };

    pub static ref PREFIX_LOOKUP: HashMap<Operator, UnaryOperator> = {
        let mut map = HashMap::new();
        map.insert(Operator::Add, UnaryOperator::Positive);
        map.insert(Operator::Sub, UnaryOperator::Negative);
        map.insert(Operator::Not, UnaryOperator::Not);
        map.insert(Operator::BitNot, UnaryOperator::BitNot);
        map.insert(Operator::Increment, UnaryOperator::PreIncrement);
        map.insert(Operator::Decrement, UnaryOperator::PreDecrement);
        map
    };

    /// Statements introduced by a keyword. Anything else is a variable
    /// declaration or an expression statement.
    pub static ref STATEMENT_LOOKUP: HashMap<Keyword, StmtHandler> = {
        let mut map: HashMap<Keyword, StmtHandler> = HashMap::new();
        map.insert(Keyword::Import, parse_import_stmt);
        map.insert(Keyword::Include, parse_include_stmt);
        map.insert(Keyword::Def, parse_def_stmt);
        map.insert(Keyword::Incase, parse_incase_stmt);
        map.insert(Keyword::Static, parse_static_stmt);
        map.insert(Keyword::Class, parse_class_stmt);
        map.insert(Keyword::Struct, parse_struct_stmt);
        map.insert(Keyword::Enum, parse_enum_stmt);
        map.insert(Keyword::Alias, parse_alias_stmt);
        map.insert(Keyword::If, parse_if_stmt);
        map.insert(Keyword::While, parse_while_stmt);
        map.insert(Keyword::Do, parse_do_while_stmt);
        map.insert(Keyword::For, parse_for_stmt);
        map.insert(Keyword::Break, parse_loop_control_stmt);
        map.insert(Keyword::Continue, parse_loop_control_stmt);
        map.insert(Keyword::Return, parse_return_stmt);
        map.insert(Keyword::Wild, parse_var_decl_stmt);
        map.insert(Keyword::Ref, parse_var_decl_stmt);
        map
    };
}
