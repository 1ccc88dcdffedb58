use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{Position, Span, MK_DELIMITER, MK_OPERATOR};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, Keyword> = {
        let mut map = HashMap::new();
        map.insert("import", Keyword::Import);
        map.insert("include", Keyword::Include);
        map.insert("as", Keyword::As);
        map.insert("def", Keyword::Def);
        map.insert("class", Keyword::Class);
        map.insert("inherits", Keyword::Inherits);
        map.insert("struct", Keyword::Struct);
        map.insert("enum", Keyword::Enum);
        map.insert("alias", Keyword::Alias);
        map.insert("ref", Keyword::Ref);
        map.insert("wild", Keyword::Wild);
        map.insert("incase", Keyword::Incase);
        map.insert("static", Keyword::Static);
        map.insert("if", Keyword::If);
        map.insert("elif", Keyword::Elif);
        map.insert("else", Keyword::Else);
        map.insert("for", Keyword::For);
        map.insert("in", Keyword::In);
        map.insert("while", Keyword::While);
        map.insert("do", Keyword::Do);
        map.insert("break", Keyword::Break);
        map.insert("continue", Keyword::Continue);
        map.insert("return", Keyword::Return);
        map
    };

    /// Operators spelled as words. Checked before the keyword table.
    pub static ref OPERATOR_WORD_LOOKUP: HashMap<&'static str, Operator> = {
        let mut map = HashMap::new();
        map.insert("not", Operator::Not);
        map.insert("and", Operator::And);
        map.insert("or", Operator::Or);
        map.insert("xor", Operator::Xor);
        map
    };

    /// Punctuation, longest spelling first so the first hit is the longest match.
    pub static ref SYMBOL_LOOKUP: Vec<(&'static str, TokenKind, TokenValue)> = {
        let mut table = vec![
            MK_OPERATOR!("<<=", IBitLShift),
            MK_OPERATOR!(">>=", IBitRShift),
            MK_DELIMITER!("...", Ellipsis),

            MK_OPERATOR!("++", Increment),
            MK_OPERATOR!("--", Decrement),
            MK_OPERATOR!("+=", IAdd),
            MK_OPERATOR!("-=", ISub),
            MK_OPERATOR!("*=", IMul),
            MK_OPERATOR!("/=", IDiv),
            MK_OPERATOR!("%=", IMod),
            MK_OPERATOR!("@=", IDot),
            MK_OPERATOR!("^=", IPow),
            MK_OPERATOR!("&=", IBitAnd),
            MK_OPERATOR!("|=", IBitOr),
            MK_OPERATOR!("~=", IBitXor),
            MK_OPERATOR!("==", Equal),
            MK_OPERATOR!("!=", NotEqual),
            MK_OPERATOR!("<=", LessEqual),
            MK_OPERATOR!(">=", GreaterEqual),
            MK_OPERATOR!("<<", BitLShift),
            MK_OPERATOR!(">>", BitRShift),
            MK_OPERATOR!("&&", And),
            MK_OPERATOR!("||", Or),
            MK_OPERATOR!("..", Range),
            MK_DELIMITER!("->", Arrow),

            MK_OPERATOR!("=", Assign),
            MK_OPERATOR!("+", Add),
            MK_OPERATOR!("-", Sub),
            MK_OPERATOR!("*", Mul),
            MK_OPERATOR!("/", Div),
            MK_OPERATOR!("%", Mod),
            MK_OPERATOR!("@", Dot),
            MK_OPERATOR!("^", Pow),
            MK_OPERATOR!("<", Less),
            MK_OPERATOR!(">", Greater),
            MK_OPERATOR!("~", BitNot),
            MK_OPERATOR!("&", BitAnd),
            MK_OPERATOR!("|", BitOr),

            MK_DELIMITER!(".", Dot),
            MK_DELIMITER!(",", Comma),
            MK_DELIMITER!(":", Colon),
            MK_DELIMITER!(";", Semicolon),
            MK_DELIMITER!("!", Exclamation),
            MK_DELIMITER!("(", ParenthesesOpen),
            MK_DELIMITER!(")", ParenthesesClose),
            MK_DELIMITER!("{", CurlyBracketOpen),
            MK_DELIMITER!("}", CurlyBracketClose),
            MK_DELIMITER!("[", SquareBracketOpen),
            MK_DELIMITER!("]", SquareBracketClose),
        ];
        table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        table
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Operator,
    Delimiter,

    Character,
    String,
    Buffer,
    Byte,

    Integer,
    UnsignedInteger,
    Float,
    Double,
    ImaginaryFloat,
    ImaginaryDouble,

    Comment,
    Newline,
    EndOfInput,
    Invalid,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    Import,
    Include,
    As,
    Def,
    Class,
    Inherits,
    Struct,
    Enum,
    Alias,
    Ref,
    Wild,
    Incase,
    Static,
    If,
    Elif,
    Else,
    For,
    In,
    While,
    Do,
    Break,
    Continue,
    Return,
}

impl Keyword {
    /// The keyword as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Import => "import",
            Keyword::Include => "include",
            Keyword::As => "as",
            Keyword::Def => "def",
            Keyword::Class => "class",
            Keyword::Inherits => "inherits",
            Keyword::Struct => "struct",
            Keyword::Enum => "enum",
            Keyword::Alias => "alias",
            Keyword::Ref => "ref",
            Keyword::Wild => "wild",
            Keyword::Incase => "incase",
            Keyword::Static => "static",
            Keyword::If => "if",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::For => "for",
            Keyword::In => "in",
            Keyword::While => "while",
            Keyword::Do => "do",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::Return => "return",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Dot, // @
    Pow, // ^

    IAdd,
    ISub,
    IMul,
    IDiv,
    IMod,
    IDot,
    IPow,

    Assign,
    Range, // ..

    Increment,
    Decrement,

    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    Not,
    And,
    Or,
    Xor,

    BitNot, // ~, also the infix bitwise xor
    BitAnd,
    BitOr,
    BitLShift,
    BitRShift,

    IBitAnd,
    IBitOr,
    IBitXor,
    IBitLShift,
    IBitRShift,
}

impl Operator {
    /// The operator as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Dot => "@",
            Operator::Pow => "^",
            Operator::IAdd => "+=",
            Operator::ISub => "-=",
            Operator::IMul => "*=",
            Operator::IDiv => "/=",
            Operator::IMod => "%=",
            Operator::IDot => "@=",
            Operator::IPow => "^=",
            Operator::Assign => "=",
            Operator::Range => "..",
            Operator::Increment => "++",
            Operator::Decrement => "--",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Not => "not",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Xor => "xor",
            Operator::BitNot => "~",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitLShift => "<<",
            Operator::BitRShift => ">>",
            Operator::IBitAnd => "&=",
            Operator::IBitOr => "|=",
            Operator::IBitXor => "~=",
            Operator::IBitLShift => "<<=",
            Operator::IBitRShift => ">>=",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Delimiter {
    Dot,
    Comma,
    Colon,
    Semicolon,
    Exclamation,
    ParenthesesOpen,
    ParenthesesClose,
    CurlyBracketOpen,
    CurlyBracketClose,
    SquareBracketOpen,
    SquareBracketClose,
    Arrow,
    Ellipsis,
}

impl Delimiter {
    /// The delimiter as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Dot => ".",
            Delimiter::Comma => ",",
            Delimiter::Colon => ":",
            Delimiter::Semicolon => ";",
            Delimiter::Exclamation => "!",
            Delimiter::ParenthesesOpen => "(",
            Delimiter::ParenthesesClose => ")",
            Delimiter::CurlyBracketOpen => "{",
            Delimiter::CurlyBracketClose => "}",
            Delimiter::SquareBracketOpen => "[",
            Delimiter::SquareBracketClose => "]",
            Delimiter::Arrow => "->",
            Delimiter::Ellipsis => "...",
        }
    }

    pub fn is_closing(&self) -> bool {
        matches!(
            self,
            Delimiter::ParenthesesClose | Delimiter::CurlyBracketClose | Delimiter::SquareBracketClose
        )
    }
}

impl Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage width selected by an integer literal's suffix.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum IntegerWidth {
    Byte,
    Short,
    Int,
    Long,
}

impl IntegerWidth {
    pub fn bits(&self) -> u32 {
        match self {
            IntegerWidth::Byte => 8,
            IntegerWidth::Short => 16,
            IntegerWidth::Int => 32,
            IntegerWidth::Long => 64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntegerWidth::Byte => "byte",
            IntegerWidth::Short => "short",
            IntegerWidth::Int => "int",
            IntegerWidth::Long => "long",
        }
    }

    pub fn signed_max(&self) -> u64 {
        (1u64 << (self.bits() - 1)) - 1
    }

    pub fn unsigned_max(&self) -> u64 {
        match self {
            IntegerWidth::Long => u64::MAX,
            _ => (1u64 << self.bits()) - 1,
        }
    }
}

impl Display for IntegerWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded payload of a token, matching its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Identifier(String),
    Keyword(Keyword),
    Operator(Operator),
    Delimiter(Delimiter),

    Character(char),
    String(String),
    Buffer(Vec<u8>),
    Byte(u8),

    Integer(i64, IntegerWidth),
    UnsignedInteger(u64, IntegerWidth),
    Float(f32),
    Double(f64),
    ImaginaryFloat(f32),
    ImaginaryDouble(f64),

    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub position: Position,
    pub length: usize,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            TokenValue::None => match self.kind {
                TokenKind::Newline => write!(f, "newline"),
                TokenKind::EndOfInput => write!(f, "end of input"),
                _ => write!(f, "{}", self.kind),
            },
            TokenValue::Identifier(name) => write!(f, "{}", name),
            TokenValue::Keyword(keyword) => write!(f, "{}", keyword),
            TokenValue::Operator(operator) => write!(f, "{}", operator),
            TokenValue::Delimiter(delimiter) => write!(f, "{}", delimiter),
            TokenValue::Character(_) => write!(f, "character literal"),
            TokenValue::String(_) => write!(f, "string literal"),
            TokenValue::Buffer(_) => write!(f, "buffer literal"),
            TokenValue::Byte(_) => write!(f, "byte literal"),
            TokenValue::Integer(value, _) => write!(f, "{}", value),
            TokenValue::UnsignedInteger(value, _) => write!(f, "{}u", value),
            TokenValue::Float(value) => write!(f, "{}f", value),
            TokenValue::Double(value) => write!(f, "{}", value),
            TokenValue::ImaginaryFloat(value) => write!(f, "{}if", value),
            TokenValue::ImaginaryDouble(value) => write!(f, "{}i", value),
            TokenValue::Comment(_) => write!(f, "comment"),
        }
    }
}

impl Token {
    pub fn span(&self) -> Span {
        Span {
            start: self.position.offset,
            end: self.position.offset + self.length,
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.value == TokenValue::Keyword(keyword)
    }

    pub fn is_operator(&self, operator: Operator) -> bool {
        self.value == TokenValue::Operator(operator)
    }

    pub fn is_delimiter(&self, delimiter: Delimiter) -> bool {
        self.value == TokenValue::Delimiter(delimiter)
    }

    pub fn get_operator(&self) -> Option<Operator> {
        match self.value {
            TokenValue::Operator(operator) => Some(operator),
            _ => None,
        }
    }

    pub fn get_identifier(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Whether the token ends a simple statement.
    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, TokenKind::Newline | TokenKind::EndOfInput)
            || self.is_delimiter(Delimiter::Semicolon)
            || self.is_delimiter(Delimiter::CurlyBracketClose)
    }

    /// Whether skipping the token during recovery would unbalance an enclosing construct.
    pub fn is_recovery_anchor(&self) -> bool {
        match self.value {
            TokenValue::Delimiter(delimiter) => {
                delimiter.is_closing() || delimiter == Delimiter::Semicolon
            }
            _ => matches!(self.kind, TokenKind::Newline | TokenKind::EndOfInput),
        }
    }

    fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    pub fn debug(&self) -> String {
        if self.is_one_of_many(&[
            TokenKind::Identifier,
            TokenKind::Keyword,
            TokenKind::Operator,
            TokenKind::Delimiter,
        ]) {
            format!("{} ({})", self.kind, self)
        } else {
            format!("{} ({:?})", self.kind, self.value)
        }
    }
}
