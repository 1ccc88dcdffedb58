//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_OPERATOR!` / `MK_DELIMITER!` - Creates an entry of the punctuation lookup table
//!
//! These macros reduce boilerplate in the lexer implementation.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The decoded TokenValue
/// * `$position` - Where the token starts
/// * `$length` - Length of the token in code points
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Newline, TokenValue::None, start, 1);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $position:expr, $length:expr) => {
        Token {
            kind: $kind,
            value: $value,
            position: $position,
            length: $length,
        }
    };
}

/// Creates a punctuation table entry for an operator.
///
/// # Example
///
/// ```ignore
/// MK_OPERATOR!("+=", IAdd)
/// ```
#[macro_export]
macro_rules! MK_OPERATOR {
    ($text:literal, $operator:ident) => {
        (
            $text,
            TokenKind::Operator,
            TokenValue::Operator(Operator::$operator),
        )
    };
}

/// Creates a punctuation table entry for a delimiter.
///
/// # Example
///
/// ```ignore
/// MK_DELIMITER!("->", Arrow)
/// ```
#[macro_export]
macro_rules! MK_DELIMITER {
    ($text:literal, $delimiter:ident) => {
        (
            $text,
            TokenKind::Delimiter,
            TokenValue::Delimiter(Delimiter::$delimiter),
        )
    };
}
