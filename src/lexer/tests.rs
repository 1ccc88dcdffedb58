//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords, operator words and identifiers
//! - Numeric literals in every base, with suffixes
//! - Character, string, byte and buffer literals with escape sequences
//! - Operators and punctuation
//! - Comments and newlines
//! - Error cases

use super::{
    lexer::{tokenize, Lexer},
    tokens::{Delimiter, IntegerWidth, Keyword, Operator, TokenKind, TokenValue},
};
use crate::errors::errors::Diagnostics;

#[test]
fn test_tokenize_token_kinds() {
    let source = "import std; int main() { float number = 6.9; std.print(\"Hello, world!\"); }";
    let (tokens, diagnostics) = tokenize(source, Some("test.kh".to_string()));

    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 21);

    let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<TokenKind>>();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Delimiter,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Delimiter,
            TokenKind::Delimiter,
            TokenKind::Delimiter,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Double,
            TokenKind::Delimiter,
            TokenKind::Identifier,
            TokenKind::Delimiter,
            TokenKind::Identifier,
            TokenKind::Delimiter,
            TokenKind::String,
            TokenKind::Delimiter,
            TokenKind::Delimiter,
            TokenKind::Delimiter,
        ]
    );

    assert_eq!(tokens[0].value, TokenValue::Keyword(Keyword::Import));
    assert_eq!(tokens[10].value, TokenValue::Operator(Operator::Assign));
    assert_eq!(tokens[11].value, TokenValue::Double(6.9));
    assert_eq!(tokens[17].value, TokenValue::String("Hello, world!".to_string()));
}

#[test]
fn test_tokenize_numerals() {
    let source = "0 1 2 8 9 00 10 29U 0.1 0.2 11.1 .123 0xFFF 0x1 0o77 0o11 0b111 0b01 4i 2i 5.6i";
    let (tokens, diagnostics) = tokenize(source, None);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 21);

    let int = |value: i64| TokenValue::Integer(value, IntegerWidth::Int);
    let expected = vec![
        int(0),
        int(1),
        int(2),
        int(8),
        int(9),
        int(0),
        int(10),
        TokenValue::UnsignedInteger(29, IntegerWidth::Int),
        TokenValue::Double(0.1),
        TokenValue::Double(0.2),
        TokenValue::Double(11.1),
        TokenValue::Double(0.123),
        int(4095),
        int(1),
        int(63),
        int(9),
        int(7),
        int(1),
        TokenValue::ImaginaryDouble(4.0),
        TokenValue::ImaginaryDouble(2.0),
        TokenValue::ImaginaryDouble(5.6),
    ];

    for (token, value) in tokens.iter().zip(expected) {
        assert_eq!(token.value, value);
    }

    assert_eq!(tokens[7].kind, TokenKind::UnsignedInteger);
    assert_eq!(tokens[12].kind, TokenKind::Integer);
    assert_eq!(tokens[20].kind, TokenKind::ImaginaryDouble);
}

#[test]
fn test_tokenize_number_suffixes() {
    let source = "7b 7sb 7ss 7s 7sl 7ub 7us 7u 7ul 1.5f 2d 3if 3id 1e3 0x1p4";
    let (tokens, diagnostics) = tokenize(source, None);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].value, TokenValue::Byte(7));
    assert_eq!(tokens[1].value, TokenValue::Integer(7, IntegerWidth::Byte));
    assert_eq!(tokens[2].value, TokenValue::Integer(7, IntegerWidth::Short));
    assert_eq!(tokens[3].value, TokenValue::Integer(7, IntegerWidth::Int));
    assert_eq!(tokens[4].value, TokenValue::Integer(7, IntegerWidth::Long));
    assert_eq!(tokens[5].value, TokenValue::UnsignedInteger(7, IntegerWidth::Byte));
    assert_eq!(tokens[6].value, TokenValue::UnsignedInteger(7, IntegerWidth::Short));
    assert_eq!(tokens[7].value, TokenValue::UnsignedInteger(7, IntegerWidth::Int));
    assert_eq!(tokens[8].value, TokenValue::UnsignedInteger(7, IntegerWidth::Long));
    assert_eq!(tokens[9].value, TokenValue::Float(1.5));
    assert_eq!(tokens[10].value, TokenValue::Double(2.0));
    assert_eq!(tokens[11].value, TokenValue::ImaginaryFloat(3.0));
    assert_eq!(tokens[12].value, TokenValue::ImaginaryDouble(3.0));
    assert_eq!(tokens[13].value, TokenValue::Double(1000.0));
    assert_eq!(tokens[14].value, TokenValue::Double(16.0));
}

#[test]
fn test_tokenize_wide_integers() {
    let (tokens, diagnostics) = tokenize("3000000000 18446744073709551615 18446744073709551616", None);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].value, TokenValue::Integer(3000000000, IntegerWidth::Long));
    assert_eq!(
        tokens[1].value,
        TokenValue::UnsignedInteger(u64::MAX, IntegerWidth::Long)
    );
    // Overflowing 2^64 turns the literal into a double
    assert_eq!(tokens[2].kind, TokenKind::Double);
    assert_eq!(tokens[2].value, TokenValue::Double(18446744073709551616.0));
}

#[test]
fn test_tokenize_exponent_limits() {
    let (tokens, diagnostics) = tokenize("1e-9999 1e9999 1.5e2", None);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].value, TokenValue::Double(0.0));
    assert_eq!(tokens[1].value, TokenValue::Double(f64::INFINITY));
    assert_eq!(tokens[2].value, TokenValue::Double(150.0));
}

#[test]
fn test_tokenize_range_after_integer() {
    let (tokens, _) = tokenize("1..10", None);

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].value, TokenValue::Integer(1, IntegerWidth::Int));
    assert_eq!(tokens[1].value, TokenValue::Operator(Operator::Range));
    assert_eq!(tokens[2].value, TokenValue::Integer(10, IntegerWidth::Int));
}

#[test]
fn test_tokenize_integer_out_of_range() {
    let (tokens, diagnostics) = tokenize("300b 200sb", None);

    assert_eq!(tokens[0].value, TokenValue::Byte(44));
    assert_eq!(tokens[1].value, TokenValue::Integer(-56, IntegerWidth::Byte));
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|diagnostic| diagnostic.get_error_name() == "IntegerOutOfRange"));
}

#[test]
fn test_tokenize_invalid_suffix() {
    let (tokens, diagnostics) = tokenize("12abc", None);

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].value, TokenValue::Integer(12, IntegerWidth::Int));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "InvalidNumberSuffix");
    assert_eq!(diagnostics.iter().next().unwrap().get_position().offset, 2);
}

#[test]
fn test_tokenize_strings_and_buffers() {
    let source = r#"'a' b'b' '\n' '\x41' 'é' "" "abc\t" b"buf\x00" """multi " line""" b'\\'"#;
    let (tokens, diagnostics) = tokenize(source, None);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 10);
    assert_eq!(tokens[0].value, TokenValue::Character('a'));
    assert_eq!(tokens[1].value, TokenValue::Byte(b'b'));
    assert_eq!(tokens[2].value, TokenValue::Character('\n'));
    assert_eq!(tokens[3].value, TokenValue::Character('A'));
    assert_eq!(tokens[4].value, TokenValue::Character('é'));
    assert_eq!(tokens[5].value, TokenValue::String(String::new()));
    assert_eq!(tokens[6].value, TokenValue::String("abc\t".to_string()));
    assert_eq!(tokens[7].value, TokenValue::Buffer(b"buf\x00".to_vec()));
    assert_eq!(tokens[8].value, TokenValue::String("multi \" line".to_string()));
    assert_eq!(tokens[9].value, TokenValue::Byte(b'\\'));
}

#[test]
fn test_tokenize_multiline_string() {
    let (tokens, diagnostics) = tokenize("\"\"\"first\nsecond\"\"\" x", None);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].value, TokenValue::String("first\nsecond".to_string()));
    assert_eq!(tokens[1].position.line, 2);
}

#[test]
fn test_tokenize_operators() {
    let source = "+ ++ += - -- -= -> <<= << <= < >>= >> >= > == = != ! ... .. . && || ~ ~= @ ^";
    let (tokens, diagnostics) = tokenize(source, None);

    assert!(diagnostics.is_empty());
    let expected = vec![
        TokenValue::Operator(Operator::Add),
        TokenValue::Operator(Operator::Increment),
        TokenValue::Operator(Operator::IAdd),
        TokenValue::Operator(Operator::Sub),
        TokenValue::Operator(Operator::Decrement),
        TokenValue::Operator(Operator::ISub),
        TokenValue::Delimiter(Delimiter::Arrow),
        TokenValue::Operator(Operator::IBitLShift),
        TokenValue::Operator(Operator::BitLShift),
        TokenValue::Operator(Operator::LessEqual),
        TokenValue::Operator(Operator::Less),
        TokenValue::Operator(Operator::IBitRShift),
        TokenValue::Operator(Operator::BitRShift),
        TokenValue::Operator(Operator::GreaterEqual),
        TokenValue::Operator(Operator::Greater),
        TokenValue::Operator(Operator::Equal),
        TokenValue::Operator(Operator::Assign),
        TokenValue::Operator(Operator::NotEqual),
        TokenValue::Delimiter(Delimiter::Exclamation),
        TokenValue::Delimiter(Delimiter::Ellipsis),
        TokenValue::Operator(Operator::Range),
        TokenValue::Delimiter(Delimiter::Dot),
        TokenValue::Operator(Operator::And),
        TokenValue::Operator(Operator::Or),
        TokenValue::Operator(Operator::BitNot),
        TokenValue::Operator(Operator::IBitXor),
        TokenValue::Operator(Operator::Dot),
        TokenValue::Operator(Operator::Pow),
    ];

    assert_eq!(tokens.len(), expected.len());
    for (token, value) in tokens.iter().zip(expected) {
        assert_eq!(token.value, value);
    }
}

#[test]
fn test_tokenize_operator_words_and_keywords() {
    let (tokens, _) = tokenize("not and or xor notable incase wild", None);

    assert_eq!(tokens[0].value, TokenValue::Operator(Operator::Not));
    assert_eq!(tokens[1].value, TokenValue::Operator(Operator::And));
    assert_eq!(tokens[2].value, TokenValue::Operator(Operator::Or));
    assert_eq!(tokens[3].value, TokenValue::Operator(Operator::Xor));
    assert_eq!(tokens[4].value, TokenValue::Identifier("notable".to_string()));
    assert_eq!(tokens[5].value, TokenValue::Keyword(Keyword::Incase));
    assert_eq!(tokens[6].value, TokenValue::Keyword(Keyword::Wild));
}

#[test]
fn test_tokenize_unicode_identifiers() {
    let (tokens, diagnostics) = tokenize("café _x1 b", None);

    assert!(diagnostics.is_empty());
    assert_eq!(tokens[0].value, TokenValue::Identifier("café".to_string()));
    assert_eq!(tokens[0].length, 4);
    assert_eq!(tokens[1].value, TokenValue::Identifier("_x1".to_string()));
    assert_eq!(tokens[2].value, TokenValue::Identifier("b".to_string()));
}

#[test]
fn test_tokenize_comments_and_newlines() {
    let (tokens, _) = tokenize("a # comment here\nb", None);

    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, TokenValue::Comment(" comment here".to_string()));
    assert_eq!(tokens[2].kind, TokenKind::Newline);
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].position.line, 2);
    assert_eq!(tokens[3].position.column, 1);
    assert_eq!(tokens[3].position.offset, 17);
}

#[test]
fn test_token_positions() {
    let (tokens, _) = tokenize("ab  \"cd\"", None);

    assert_eq!(tokens[0].position.offset, 0);
    assert_eq!(tokens[0].length, 2);
    assert_eq!(tokens[1].position.offset, 4);
    assert_eq!(tokens[1].position.column, 5);
    assert_eq!(tokens[1].length, 4);
}

#[test]
fn test_tokenize_unrecognised_character() {
    let (tokens, diagnostics) = tokenize("a $ b", None);

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].kind, TokenKind::Invalid);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "UnrecognisedCharacter");
}

#[test]
fn test_tokenize_unterminated_string() {
    let (tokens, diagnostics) = tokenize("\"abc\nx", None);

    assert_eq!(tokens[0].kind, TokenKind::Invalid);
    assert_eq!(tokens[1].kind, TokenKind::Newline);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "NewlineInLiteral");

    let (tokens, diagnostics) = tokenize("\"abc", None);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Invalid);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "UnterminatedLiteral");
}

#[test]
fn test_tokenize_character_errors() {
    let (tokens, diagnostics) = tokenize("''", None);
    assert_eq!(tokens[0].kind, TokenKind::Invalid);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "EmptyCharacter");

    let (tokens, diagnostics) = tokenize("'ab' x", None);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Invalid);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "UnterminatedLiteral");

    let (_, diagnostics) = tokenize("'", None);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "UnexpectedEndOfInput");
}

#[test]
fn test_tokenize_escape_errors() {
    let (tokens, diagnostics) = tokenize(r#""a\qb""#, None);
    assert_eq!(tokens[0].value, TokenValue::String("ab".to_string()));
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "InvalidEscape");

    let (_, diagnostics) = tokenize(r#""\xZZ""#, None);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "ExpectedHexDigit");

    let (_, diagnostics) = tokenize(r#"b'\u0041'"#, None);
    assert_eq!(
        diagnostics.iter().next().unwrap().get_error_name(),
        "WideEscapeInByteContext"
    );

    let (_, diagnostics) = tokenize("b\"é\"", None);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "NonByteCharacter");

    let (_, diagnostics) = tokenize(r#"'\UFFFFFFFF'"#, None);
    assert_eq!(diagnostics.iter().next().unwrap().get_error_name(), "InvalidCodePoint");
}

#[test]
fn test_lexer_always_progresses() {
    let source = "'\\ \"\n $ ` 0x ..".chars().collect::<Vec<char>>();
    let mut diagnostics = Diagnostics::new(std::rc::Rc::new("test.kh".to_string()));
    let mut lexer = Lexer::new(&source);

    let mut steps = 0;
    while !lexer.at_eof() {
        let before = lexer.offset();
        lexer.lex(&mut diagnostics);
        assert!(lexer.offset() > before);
        steps += 1;
    }

    assert!(steps <= source.len());
    assert_eq!(lexer.lex(&mut diagnostics).kind, TokenKind::EndOfInput);
}
