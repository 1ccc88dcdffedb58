use std::rc::Rc;

use log::trace;

use crate::{
    errors::errors::{Diagnostics, ErrorImpl},
    Position, MK_TOKEN,
};

use super::tokens::{
    IntegerWidth, Token, TokenKind, TokenValue, OPERATOR_WORD_LOOKUP, RESERVED_LOOKUP,
    SYMBOL_LOOKUP,
};

/// A cursor into a code-point buffer.
///
/// The lexer has no state besides its position, so copying it is how the
/// parser peeks ahead and backtracks.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    source: &'a [char],
    pos: usize,
    line: usize,
    column: usize,
}

/// Exponent collected while scanning a floating literal.
#[derive(Debug, Clone, Copy)]
struct Exponent {
    binary: bool,
    value: i64,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a [char]) -> Lexer<'a> {
        Lexer {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn at(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    pub fn peek(&self, n: usize) -> Option<char> {
        self.source.get(self.pos + n).copied()
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn get_position(&self) -> Position {
        Position {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Consumes one code point, keeping the line and column counters in sync.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.at()?;
        self.pos += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    pub fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(index, ch)| self.peek(index) == Some(ch))
    }

    fn text_from(&self, offset: usize) -> String {
        self.source[offset..self.pos].iter().collect()
    }

    fn make_token(&self, kind: TokenKind, value: TokenValue, start: Position) -> Token {
        MK_TOKEN!(kind, value, start, self.pos - start.offset)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.at() {
            if ch != '\n' && ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Lexes the token under the cursor and moves past it.
    ///
    /// Malformed input is reported to `diagnostics` and comes back as a
    /// `TokenKind::Invalid` token, so the caller can resynchronize. Unless
    /// the cursor is already at the end of input, it always moves forward.
    pub fn lex(&mut self, diagnostics: &mut Diagnostics) -> Token {
        self.skip_whitespace();
        let start = self.get_position();

        let ch = match self.at() {
            Some(ch) => ch,
            None => return self.make_token(TokenKind::EndOfInput, TokenValue::None, start),
        };

        if ch == '\n' {
            self.advance();
            return self.make_token(TokenKind::Newline, TokenValue::None, start);
        }

        // b'x' and b"xyz"
        if (ch == 'b' || ch == 'B') && matches!(self.peek(1), Some('\'') | Some('"')) {
            self.advance();
            return if self.at() == Some('\'') {
                self.lex_character(start, true, diagnostics)
            } else {
                self.lex_string(start, true, diagnostics)
            };
        }

        if ch.is_alphabetic() || ch == '_' {
            return self.lex_word(start);
        }

        if ch.is_ascii_digit() || (ch == '.' && matches!(self.peek(1), Some(d) if d.is_ascii_digit()))
        {
            return self.lex_number(start, diagnostics);
        }

        match ch {
            '\'' => self.lex_character(start, false, diagnostics),
            '"' => self.lex_string(start, false, diagnostics),
            '#' => self.lex_comment(start),
            _ => self.lex_symbol(start, diagnostics),
        }
    }

    fn lex_word(&mut self, start: Position) -> Token {
        while let Some(ch) = self.at() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let word = self.text_from(start.offset);

        if let Some(operator) = OPERATOR_WORD_LOOKUP.get(word.as_str()) {
            self.make_token(TokenKind::Operator, TokenValue::Operator(*operator), start)
        } else if let Some(keyword) = RESERVED_LOOKUP.get(word.as_str()) {
            self.make_token(TokenKind::Keyword, TokenValue::Keyword(*keyword), start)
        } else {
            self.make_token(TokenKind::Identifier, TokenValue::Identifier(word), start)
        }
    }

    fn lex_comment(&mut self, start: Position) -> Token {
        self.advance();

        while let Some(ch) = self.at() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }

        let text = self.text_from(start.offset + 1);
        self.make_token(TokenKind::Comment, TokenValue::Comment(text), start)
    }

    fn lex_symbol(&mut self, start: Position, diagnostics: &mut Diagnostics) -> Token {
        for (text, kind, value) in SYMBOL_LOOKUP.iter() {
            if self.starts_with(text) {
                self.advance_n(text.chars().count());
                return self.make_token(*kind, value.clone(), start);
            }
        }

        if let Some(character) = self.advance() {
            diagnostics.error(ErrorImpl::UnrecognisedCharacter { character }, start);
        }
        self.make_token(TokenKind::Invalid, TokenValue::None, start)
    }

    /// Decodes an escape sequence. The cursor sits right after the backslash.
    ///
    /// # Returns
    ///
    /// The escaped code point, or None after the problem was reported.
    fn lex_escape(
        &mut self,
        byte: bool,
        backslash: Position,
        diagnostics: &mut Diagnostics,
    ) -> Option<u32> {
        // A newline or the end of input is left for the literal to report
        let escape = match self.at() {
            Some('\n') | None => return None,
            Some(escape) => escape,
        };

        let simple = match escape {
            '0' => Some(0x00),
            'n' => Some(0x0A),
            'r' => Some(0x0D),
            't' => Some(0x09),
            'v' => Some(0x0B),
            'b' => Some(0x08),
            'a' => Some(0x07),
            'f' => Some(0x0C),
            '\\' | '\'' | '"' => Some(escape as u32),
            _ => None,
        };

        self.advance();

        if simple.is_some() {
            return simple;
        }

        let width = match escape {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            _ => {
                diagnostics.error(ErrorImpl::InvalidEscape { escape }, backslash);
                return None;
            }
        };

        let wide_in_byte = byte && width > 2;
        if wide_in_byte {
            diagnostics.error(ErrorImpl::WideEscapeInByteContext { escape }, backslash);
        }

        let mut value: u32 = 0;
        for _ in 0..width {
            match self.at().and_then(|ch| ch.to_digit(16)) {
                Some(digit) => {
                    value = value * 16 + digit;
                    self.advance();
                }
                None => {
                    let found = match self.at() {
                        Some(ch) => ch.to_string(),
                        None => String::from("end of input"),
                    };
                    diagnostics.error(ErrorImpl::ExpectedHexDigit { found }, self.get_position());
                    return None;
                }
            }
        }

        if wide_in_byte {
            None
        } else {
            Some(value)
        }
    }

    fn lex_character(&mut self, start: Position, byte: bool, diagnostics: &mut Diagnostics) -> Token {
        let literal = if byte { "byte character" } else { "character" };
        self.advance();

        let position = self.get_position();
        let value = match self.at() {
            None => {
                diagnostics.error(ErrorImpl::UnexpectedEndOfInput, position);
                return self.make_token(TokenKind::Invalid, TokenValue::None, start);
            }
            Some('\'') => {
                self.advance();
                diagnostics.error(ErrorImpl::EmptyCharacter, start);
                return self.make_token(TokenKind::Invalid, TokenValue::None, start);
            }
            Some('\n') => {
                diagnostics.error(
                    ErrorImpl::NewlineInLiteral {
                        literal: String::from(literal),
                    },
                    position,
                );
                return self.make_token(TokenKind::Invalid, TokenValue::None, start);
            }
            Some('\\') => {
                self.advance();
                self.lex_escape(byte, position, diagnostics)
            }
            Some(character) => {
                self.advance();
                if byte && character as u32 > 0x7F {
                    diagnostics.error(ErrorImpl::NonByteCharacter { character }, position);
                    None
                } else {
                    Some(character as u32)
                }
            }
        };

        if self.at() == Some('\'') {
            self.advance();
        } else {
            diagnostics.error(
                ErrorImpl::UnterminatedLiteral {
                    literal: String::from(literal),
                },
                start,
            );

            // Swallow an overlong literal up to its closing quote on the same line
            let mut lookahead = *self;
            while let Some(ch) = lookahead.at() {
                if ch == '\n' {
                    break;
                }
                lookahead.advance();
                if ch == '\'' {
                    *self = lookahead;
                    break;
                }
            }

            return self.make_token(TokenKind::Invalid, TokenValue::None, start);
        }

        match value {
            Some(value) if byte => self.make_token(TokenKind::Byte, TokenValue::Byte(value as u8), start),
            Some(value) => match char::from_u32(value) {
                Some(character) => {
                    self.make_token(TokenKind::Character, TokenValue::Character(character), start)
                }
                None => {
                    diagnostics.error(ErrorImpl::InvalidCodePoint { value }, position);
                    self.make_token(TokenKind::Invalid, TokenValue::None, start)
                }
            },
            None => self.make_token(TokenKind::Invalid, TokenValue::None, start),
        }
    }

    fn lex_string(&mut self, start: Position, byte: bool, diagnostics: &mut Diagnostics) -> Token {
        let literal = if byte { "buffer" } else { "string" };
        self.advance();

        let multiline = self.at() == Some('"') && self.peek(1) == Some('"');
        if multiline {
            self.advance_n(2);
        }

        let mut string = String::new();
        let mut buffer = vec![];

        loop {
            let position = self.get_position();

            match self.at() {
                None => {
                    diagnostics.error(
                        ErrorImpl::UnterminatedLiteral {
                            literal: String::from(literal),
                        },
                        start,
                    );
                    return self.make_token(TokenKind::Invalid, TokenValue::None, start);
                }
                Some('\n') if !multiline => {
                    diagnostics.error(
                        ErrorImpl::NewlineInLiteral {
                            literal: String::from(literal),
                        },
                        position,
                    );
                    return self.make_token(TokenKind::Invalid, TokenValue::None, start);
                }
                Some('"') => {
                    if !multiline {
                        self.advance();
                        break;
                    }

                    if self.peek(1) == Some('"') && self.peek(2) == Some('"') {
                        self.advance_n(3);
                        break;
                    }

                    self.advance();
                    if byte {
                        buffer.push(b'"');
                    } else {
                        string.push('"');
                    }
                }
                Some('\\') => {
                    self.advance();
                    if let Some(value) = self.lex_escape(byte, position, diagnostics) {
                        if byte {
                            buffer.push(value as u8);
                        } else if let Some(character) = char::from_u32(value) {
                            string.push(character);
                        } else {
                            diagnostics.error(ErrorImpl::InvalidCodePoint { value }, position);
                        }
                    }
                }
                Some(character) => {
                    self.advance();
                    if !byte {
                        string.push(character);
                    } else if character as u32 > 0x7F {
                        diagnostics.error(ErrorImpl::NonByteCharacter { character }, position);
                    } else {
                        buffer.push(character as u8);
                    }
                }
            }
        }

        if byte {
            self.make_token(TokenKind::Buffer, TokenValue::Buffer(buffer), start)
        } else {
            self.make_token(TokenKind::String, TokenValue::String(string), start)
        }
    }

    fn lex_number(&mut self, start: Position, diagnostics: &mut Diagnostics) -> Token {
        let mut base = 10;

        // 0x, 0o and 0b only count as prefixes when a digit of that base follows
        if self.at() == Some('0') {
            let prefixed = match self.peek(1) {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };

            if let Some(prefixed) = prefixed {
                if matches!(self.peek(2), Some(digit) if digit.is_digit(prefixed)) {
                    base = prefixed;
                    self.advance_n(2);
                }
            }
        }

        let mut digits = String::new();
        let mut value: u64 = 0;
        let mut overflow = false;

        while let Some(ch) = self.at() {
            let Some(digit) = ch.to_digit(base) else {
                break;
            };

            match value
                .checked_mul(base as u64)
                .and_then(|value| value.checked_add(digit as u64))
            {
                Some(next) => value = next,
                None => overflow = true,
            }

            digits.push(ch);
            self.advance();
        }

        let mut floating = overflow;
        let mut fraction = String::new();

        // `1..2` is a range and `1.abs` a member access, neither has a fraction
        if self.at() == Some('.')
            && !matches!(self.peek(1), Some(ch) if ch == '.' || ch == '_' || ch.is_alphabetic())
        {
            floating = true;
            self.advance();

            while let Some(ch) = self.at() {
                if ch.is_digit(base) {
                    fraction.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let mut exponent = None;
        if let Some(ch) = self.at() {
            let binary = ch == 'p' || ch == 'P';
            let decimal = base == 10 && (ch == 'e' || ch == 'E');
            let signed = matches!(self.peek(1), Some('+') | Some('-'));
            let sign_length = if signed { 1 } else { 0 };

            if (binary || decimal)
                && matches!(self.peek(1 + sign_length), Some(digit) if digit.is_ascii_digit())
            {
                self.advance();
                let negative = self.at() == Some('-');
                if signed {
                    self.advance();
                }

                let mut magnitude: i64 = 0;
                while let Some(digit) = self.at().and_then(|ch| ch.to_digit(10)) {
                    magnitude = magnitude.saturating_mul(10).saturating_add(digit as i64);
                    self.advance();
                }

                floating = true;
                exponent = Some(Exponent {
                    binary,
                    value: if negative { -magnitude } else { magnitude },
                });
            }
        }

        let suffix_position = self.get_position();
        while let Some(ch) = self.at() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        let suffix = self.text_from(suffix_position.offset);
        let lowered = suffix.to_lowercase();

        let invalid_suffix = |diagnostics: &mut Diagnostics| {
            diagnostics.error(
                ErrorImpl::InvalidNumberSuffix {
                    suffix: suffix.clone(),
                },
                suffix_position,
            );
        };

        if floating {
            let double = floating_value(base, &digits, &fraction, exponent);
            let float = single_value(base, &digits, &fraction, exponent, double);

            let (kind, value) = match lowered.as_str() {
                "" | "d" => (TokenKind::Double, TokenValue::Double(double)),
                "f" => (TokenKind::Float, TokenValue::Float(float)),
                "i" | "id" => (TokenKind::ImaginaryDouble, TokenValue::ImaginaryDouble(double)),
                "if" => (
                    TokenKind::ImaginaryFloat,
                    TokenValue::ImaginaryFloat(float),
                ),
                _ => {
                    invalid_suffix(diagnostics);
                    (TokenKind::Double, TokenValue::Double(double))
                }
            };

            return self.make_token(kind, value, start);
        }

        let literal = self.text_from(start.offset);
        let (kind, token_value) = match lowered.as_str() {
            "" => default_integer(value),
            "b" => {
                if value > IntegerWidth::Byte.unsigned_max() {
                    diagnostics.error(
                        ErrorImpl::IntegerOutOfRange {
                            literal,
                            width: String::from("byte"),
                        },
                        start,
                    );
                }
                (TokenKind::Byte, TokenValue::Byte(value as u8))
            }
            "s" | "sb" | "ss" | "sl" => {
                let width = suffix_width(&lowered[1..]);
                if value > width.signed_max() {
                    diagnostics.error(
                        ErrorImpl::IntegerOutOfRange {
                            literal,
                            width: width.to_string(),
                        },
                        start,
                    );
                }
                (
                    TokenKind::Integer,
                    TokenValue::Integer(truncate_signed(value, width), width),
                )
            }
            "u" | "ub" | "us" | "ul" => {
                let width = suffix_width(&lowered[1..]);
                if value > width.unsigned_max() {
                    diagnostics.error(
                        ErrorImpl::IntegerOutOfRange {
                            literal,
                            width: format!("unsigned {}", width),
                        },
                        start,
                    );
                }
                (
                    TokenKind::UnsignedInteger,
                    TokenValue::UnsignedInteger(value & width.unsigned_max(), width),
                )
            }
            "f" => (TokenKind::Float, TokenValue::Float(value as f32)),
            "d" => (TokenKind::Double, TokenValue::Double(value as f64)),
            "i" | "id" => (
                TokenKind::ImaginaryDouble,
                TokenValue::ImaginaryDouble(value as f64),
            ),
            "if" => (
                TokenKind::ImaginaryFloat,
                TokenValue::ImaginaryFloat(value as f32),
            ),
            _ => {
                invalid_suffix(diagnostics);
                default_integer(value)
            }
        };

        self.make_token(kind, token_value, start)
    }
}

fn suffix_width(width: &str) -> IntegerWidth {
    match width {
        "b" => IntegerWidth::Byte,
        "s" => IntegerWidth::Short,
        "l" => IntegerWidth::Long,
        _ => IntegerWidth::Int,
    }
}

/// Unsuffixed integers are 32-bit signed, widened when the value needs it.
fn default_integer(value: u64) -> (TokenKind, TokenValue) {
    if value <= IntegerWidth::Int.signed_max() {
        (
            TokenKind::Integer,
            TokenValue::Integer(value as i64, IntegerWidth::Int),
        )
    } else if value <= IntegerWidth::Long.signed_max() {
        (
            TokenKind::Integer,
            TokenValue::Integer(value as i64, IntegerWidth::Long),
        )
    } else {
        (
            TokenKind::UnsignedInteger,
            TokenValue::UnsignedInteger(value, IntegerWidth::Long),
        )
    }
}

fn truncate_signed(value: u64, width: IntegerWidth) -> i64 {
    match width {
        IntegerWidth::Byte => value as i8 as i64,
        IntegerWidth::Short => value as i16 as i64,
        IntegerWidth::Int => value as i32 as i64,
        IntegerWidth::Long => value as i64,
    }
}

/// Spells a base 10 literal the way `str::parse` expects it.
fn decimal_text(digits: &str, fraction: &str, exponent: Option<Exponent>) -> String {
    let mut text = format!(
        "{}.{}",
        if digits.is_empty() { "0" } else { digits },
        if fraction.is_empty() { "0" } else { fraction }
    );

    if let Some(Exponent {
        binary: false,
        value,
    }) = exponent
    {
        text.push_str(&format!("e{}", value));
    }

    text
}

fn floating_value(base: u32, digits: &str, fraction: &str, exponent: Option<Exponent>) -> f64 {
    let decimal_exponent = !matches!(exponent, Some(Exponent { binary: true, .. }));

    if base == 10 && decimal_exponent {
        // Underflow parses to 0.0 and overflow to infinity
        return decimal_text(digits, fraction, exponent)
            .parse::<f64>()
            .unwrap_or(f64::NAN);
    }

    let radix = base as f64;
    let mut mantissa = 0.0;
    for digit in digits.chars().filter_map(|ch| ch.to_digit(base)) {
        mantissa = mantissa * radix + digit as f64;
    }

    let mut scale = 1.0 / radix;
    for digit in fraction.chars().filter_map(|ch| ch.to_digit(base)) {
        mantissa += digit as f64 * scale;
        scale /= radix;
    }

    match exponent {
        Some(exponent) if mantissa != 0.0 => {
            let factor: f64 = if exponent.binary { 2.0 } else { 10.0 };
            let power = exponent.value.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
            mantissa * factor.powi(power)
        }
        _ => mantissa,
    }
}

/// Parses base 10 literals straight to `f32` to avoid rounding twice.
fn single_value(
    base: u32,
    digits: &str,
    fraction: &str,
    exponent: Option<Exponent>,
    double: f64,
) -> f32 {
    let decimal_exponent = !matches!(exponent, Some(Exponent { binary: true, .. }));

    if base == 10 && decimal_exponent {
        if let Ok(value) = decimal_text(digits, fraction, exponent).parse::<f32>() {
            return value;
        }
    }
    double as f32
}

/// Lexes a whole buffer, leaving out the end-of-input token.
///
/// # Arguments
///
/// * `source` - The source text
/// * `unit` - Name used to attribute diagnostics, `shell` when absent
///
/// # Returns
///
/// The tokens, comments and newlines included, and every diagnostic raised.
pub fn tokenize(source: &str, unit: Option<String>) -> (Vec<Token>, Diagnostics) {
    let unit = Rc::new(unit.unwrap_or_else(|| String::from("shell")));
    let chars = source.chars().collect::<Vec<char>>();

    let mut diagnostics = Diagnostics::new(unit);
    let mut lexer = Lexer::new(&chars);
    let mut tokens = vec![];

    loop {
        let token = lexer.lex(&mut diagnostics);
        if token.kind == TokenKind::EndOfInput {
            break;
        }

        trace!("lexed {}", token.debug());
        tokens.push(token);
    }

    (tokens, diagnostics)
}
