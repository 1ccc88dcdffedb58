use std::fmt::Display;

/// Unary Operators
///
/// Prefix operators come first, the postfix `++` and `--` forms last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Positive,
    Negative,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOperator {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOperator::Positive => "positive",
            UnaryOperator::Negative => "negative",
            UnaryOperator::Not => "not",
            UnaryOperator::BitNot => "bit_not",
            UnaryOperator::PreIncrement => "pre_increment",
            UnaryOperator::PreDecrement => "pre_decrement",
            UnaryOperator::PostIncrement => "post_increment",
            UnaryOperator::PostDecrement => "post_decrement",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(
            self,
            UnaryOperator::PostIncrement | UnaryOperator::PostDecrement
        )
    }
}

/// Binary Operators
///
/// Includes assignment and in-place forms, which share the binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Assign,
    Range,

    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Dot,
    Pow,

    IAdd,
    ISub,
    IMul,
    IDiv,
    IMod,
    IDot,
    IPow,

    And,
    Or,
    Xor,

    BitAnd,
    BitOr,
    BitXor,
    BitLShift,
    BitRShift,

    IBitAnd,
    IBitOr,
    IBitXor,
    IBitLShift,
    IBitRShift,
}

impl BinaryOperator {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOperator::Assign => "assign",
            BinaryOperator::Range => "range",
            BinaryOperator::Add => "add",
            BinaryOperator::Sub => "sub",
            BinaryOperator::Mul => "mul",
            BinaryOperator::Div => "div",
            BinaryOperator::Mod => "mod",
            BinaryOperator::Dot => "dot",
            BinaryOperator::Pow => "pow",
            BinaryOperator::IAdd => "iadd",
            BinaryOperator::ISub => "isub",
            BinaryOperator::IMul => "imul",
            BinaryOperator::IDiv => "idiv",
            BinaryOperator::IMod => "imod",
            BinaryOperator::IDot => "idot",
            BinaryOperator::IPow => "ipow",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Xor => "xor",
            BinaryOperator::BitAnd => "bit_and",
            BinaryOperator::BitOr => "bit_or",
            BinaryOperator::BitXor => "bit_xor",
            BinaryOperator::BitLShift => "bit_lshift",
            BinaryOperator::BitRShift => "bit_rshift",
            BinaryOperator::IBitAnd => "ibit_and",
            BinaryOperator::IBitOr => "ibit_or",
            BinaryOperator::IBitXor => "ibit_xor",
            BinaryOperator::IBitLShift => "ibit_lshift",
            BinaryOperator::IBitRShift => "ibit_rshift",
        }
    }

    /// Whether the operator writes back into its left operand.
    pub fn is_inplace(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Assign
                | BinaryOperator::IAdd
                | BinaryOperator::ISub
                | BinaryOperator::IMul
                | BinaryOperator::IDiv
                | BinaryOperator::IMod
                | BinaryOperator::IDot
                | BinaryOperator::IPow
                | BinaryOperator::IBitAnd
                | BinaryOperator::IBitOr
                | BinaryOperator::IBitXor
                | BinaryOperator::IBitLShift
                | BinaryOperator::IBitRShift
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl ComparisonOperator {
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "equal",
            ComparisonOperator::NotEqual => "not_equal",
            ComparisonOperator::Less => "less",
            ComparisonOperator::Greater => "greater",
            ComparisonOperator::LessEqual => "less_equal",
            ComparisonOperator::GreaterEqual => "greater_equal",
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
