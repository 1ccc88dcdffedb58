use std::{fmt::Display, rc::Rc};

use log::debug;
use thiserror::Error;

use crate::Position;

/// A recorded lexical or syntactic error.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    internal_error: ErrorImpl,
    position: Position,
}

impl Diagnostic {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Diagnostic {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_family(&self) -> ErrorFamily {
        match &self.internal_error {
            ErrorImpl::UnrecognisedCharacter { .. }
            | ErrorImpl::UnterminatedLiteral { .. }
            | ErrorImpl::EmptyCharacter
            | ErrorImpl::NewlineInLiteral { .. }
            | ErrorImpl::InvalidEscape { .. }
            | ErrorImpl::ExpectedHexDigit { .. }
            | ErrorImpl::InvalidCodePoint { .. }
            | ErrorImpl::NonByteCharacter { .. }
            | ErrorImpl::WideEscapeInByteContext { .. }
            | ErrorImpl::InvalidNumberSuffix { .. }
            | ErrorImpl::IntegerOutOfRange { .. }
            | ErrorImpl::UnexpectedEndOfInput => ErrorFamily::Lexical,
            _ => ErrorFamily::Syntactic,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedCharacter { .. } => "UnrecognisedCharacter",
            ErrorImpl::UnterminatedLiteral { .. } => "UnterminatedLiteral",
            ErrorImpl::EmptyCharacter => "EmptyCharacter",
            ErrorImpl::NewlineInLiteral { .. } => "NewlineInLiteral",
            ErrorImpl::InvalidEscape { .. } => "InvalidEscape",
            ErrorImpl::ExpectedHexDigit { .. } => "ExpectedHexDigit",
            ErrorImpl::InvalidCodePoint { .. } => "InvalidCodePoint",
            ErrorImpl::NonByteCharacter { .. } => "NonByteCharacter",
            ErrorImpl::WideEscapeInByteContext { .. } => "WideEscapeInByteContext",
            ErrorImpl::InvalidNumberSuffix { .. } => "InvalidNumberSuffix",
            ErrorImpl::IntegerOutOfRange { .. } => "IntegerOutOfRange",
            ErrorImpl::UnexpectedEndOfInput => "UnexpectedEndOfInput",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::MissingTerminator { .. } => "MissingTerminator",
            ErrorImpl::MissingListSeparator { .. } => "MissingListSeparator",
            ErrorImpl::MalformedTemplateArguments { .. } => "MalformedTemplateArguments",
            ErrorImpl::NonTypeExpression { .. } => "NonTypeExpression",
            ErrorImpl::DuplicateEnumMember { .. } => "DuplicateEnumMember",
            ErrorImpl::DuplicateEnumValue { .. } => "DuplicateEnumValue",
            ErrorImpl::StructInheritance { .. } => "StructInheritance",
            ErrorImpl::LoopControlOutsideLoop { .. } => "LoopControlOutsideLoop",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedCharacter { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedLiteral { literal } => {
                ErrorTip::Suggestion(format!("The {} literal is never closed", literal))
            }
            ErrorImpl::EmptyCharacter => {
                ErrorTip::Suggestion(String::from("A character cannot be closed empty"))
            }
            ErrorImpl::NewlineInLiteral { literal } => ErrorTip::Suggestion(format!(
                "A {} literal cannot span lines, use `\\n` or a triple-quoted string",
                literal
            )),
            ErrorImpl::InvalidEscape { escape } => {
                ErrorTip::Suggestion(format!("Unknown escape sequence `\\{}`", escape))
            }
            ErrorImpl::ExpectedHexDigit { found } => ErrorTip::Suggestion(format!(
                "Expected a hexadecimal digit, found `{}`",
                found
            )),
            ErrorImpl::InvalidCodePoint { value } => ErrorTip::Suggestion(format!(
                "`0x{:X}` is not a valid unicode code point",
                value
            )),
            ErrorImpl::NonByteCharacter { character } => ErrorTip::Suggestion(format!(
                "`{}` does not fit in a byte, use an `\\x` escape instead",
                character
            )),
            ErrorImpl::WideEscapeInByteContext { escape } => ErrorTip::Suggestion(format!(
                "`\\{}` escapes are not allowed in byte literals",
                escape
            )),
            ErrorImpl::InvalidNumberSuffix { suffix } => {
                ErrorTip::Suggestion(format!("Invalid number suffix `{}`", suffix))
            }
            ErrorImpl::IntegerOutOfRange { literal, width } => ErrorTip::Suggestion(format!(
                "`{}` does not fit in a {}",
                literal, width
            )),
            ErrorImpl::UnexpectedEndOfInput => ErrorTip::Suggestion(String::from(
                "Expected a token but reached the end of file",
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "Was expecting {}, found `{}`",
                expected, found
            )),
            ErrorImpl::MissingTerminator { found } => ErrorTip::Suggestion(format!(
                "Unexpected `{}` after statement, did you miss a semicolon or newline?",
                found
            )),
            ErrorImpl::MissingListSeparator { closing, found } => ErrorTip::Suggestion(format!(
                "Was expecting a comma or a closing `{}`, found `{}`",
                closing, found
            )),
            ErrorImpl::MalformedTemplateArguments { found } => ErrorTip::Suggestion(format!(
                "Template arguments must be a name or a parenthesized list of names, found `{}`",
                found
            )),
            ErrorImpl::NonTypeExpression { found } => {
                ErrorTip::Suggestion(format!("`{}` cannot denote a type", found))
            }
            ErrorImpl::DuplicateEnumMember { name } => {
                ErrorTip::Suggestion(format!("Enum member `{}` is declared twice", name))
            }
            ErrorImpl::DuplicateEnumValue { value } => {
                ErrorTip::Suggestion(format!("Enum value `{}` is used twice", value))
            }
            ErrorImpl::StructInheritance { name } => ErrorTip::Suggestion(format!(
                "Struct `{}` cannot inherit, use a class instead",
                name
            )),
            ErrorImpl::LoopControlOutsideLoop { keyword } => {
                ErrorTip::Suggestion(format!("`{}` can only be used inside a loop", keyword))
            }
            ErrorImpl::NestingTooDeep { limit } => ErrorTip::Suggestion(format!(
                "Nesting exceeds the limit of {} levels",
                limit
            )),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.position.line, self.position.column, self.internal_error
        )
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFamily {
    Lexical,
    Syntactic,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised character: {character:?}")]
    UnrecognisedCharacter { character: char },
    #[error("unterminated {literal} literal")]
    UnterminatedLiteral { literal: String },
    #[error("a character cannot be closed empty")]
    EmptyCharacter,
    #[error("newline inside a {literal} literal")]
    NewlineInLiteral { literal: String },
    #[error("invalid escape sequence: \\{escape}")]
    InvalidEscape { escape: char },
    #[error("expected a hexadecimal digit, found {found:?}")]
    ExpectedHexDigit { found: String },
    #[error("invalid code point: 0x{value:X}")]
    InvalidCodePoint { value: u32 },
    #[error("non-byte character in byte context: {character:?}")]
    NonByteCharacter { character: char },
    #[error("\\{escape} escape inside a byte literal")]
    WideEscapeInByteContext { escape: char },
    #[error("invalid number suffix: {suffix:?}")]
    InvalidNumberSuffix { suffix: String },
    #[error("integer literal {literal:?} out of range for {width}")]
    IntegerOutOfRange { literal: String, width: String },
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    // Syntactic
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected {expected}, found {found:?}")]
    ExpectedToken { expected: String, found: String },
    #[error("missing statement terminator before {found:?}")]
    MissingTerminator { found: String },
    #[error("expected a comma or {closing:?}, found {found:?}")]
    MissingListSeparator { closing: String, found: String },
    #[error("malformed template argument list at {found:?}")]
    MalformedTemplateArguments { found: String },
    #[error("{found:?} is not a type expression")]
    NonTypeExpression { found: String },
    #[error("duplicate enum member {name:?}")]
    DuplicateEnumMember { name: String },
    #[error("duplicate enum value {value}")]
    DuplicateEnumValue { value: u64 },
    #[error("struct {name:?} cannot inherit")]
    StructInheritance { name: String },
    #[error("{keyword:?} outside of a loop")]
    LoopControlOutsideLoop { keyword: String },
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// The ordered diagnostics of one source unit.
///
/// A diagnostic at the same offset as the last recorded one is dropped, so a
/// single bad token does not cascade into a wall of identical reports.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    unit: Rc<String>,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(unit: Rc<String>) -> Self {
        Diagnostics {
            unit,
            items: vec![],
        }
    }

    pub fn unit(&self) -> &Rc<String> {
        &self.unit
    }

    /// Records a diagnostic.
    ///
    /// # Returns
    ///
    /// Returns false when it was dropped as a duplicate.
    pub fn push(&mut self, diagnostic: Diagnostic) -> bool {
        if let Some(last) = self.items.last() {
            if last.position.offset == diagnostic.position.offset {
                return false;
            }
        }

        debug!("[{}] {}", self.unit, diagnostic);
        self.items.push(diagnostic);
        true
    }

    pub fn error(&mut self, error_impl: ErrorImpl, position: Position) -> bool {
        self.push(Diagnostic::new(error_impl, position))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    /// Drops everything recorded after the first `len` diagnostics.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
