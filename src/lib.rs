#![allow(clippy::module_inception)]

use std::fmt::Write;

use crate::errors::errors::{Diagnostic, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

pub use lexer::lexer::tokenize;
pub use parser::parser::{parse, parse_str, parse_with_config, Parser, ParserConfig};

/// A location in the source buffer.
///
/// `offset` counts code points from the start of the buffer, `line` and
/// `column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn null() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::null()
    }
}

/// Half-open `[start, end)` range of code-point offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Finds the line containing `offset`.
///
/// # Returns
///
/// A tuple of the 1-based line number, the line text (without its newline)
/// and the 0-based column of `offset` inside that line. An offset past the
/// end of the buffer resolves to the end of the last line.
pub fn get_line_at_offset(source: &[char], offset: usize) -> (usize, String, usize) {
    let offset = offset.min(source.len());

    let mut start = 0;
    let mut line_number = 1;

    for (index, ch) in source.iter().enumerate() {
        if index >= offset {
            break;
        }
        if *ch == '\n' {
            start = index + 1;
            line_number += 1;
        }
    }

    let end = source[start..]
        .iter()
        .position(|ch| *ch == '\n')
        .map(|len| start + len)
        .unwrap_or(source.len());

    let line = source[start..end].iter().collect::<String>();
    (line_number, line, offset - start)
}

/// Renders a diagnostic with the offending line underneath it.
///
/// ```text
/// Error: UnexpectedToken (Unexpected token: `)`)
/// -> main.kh
///   |
/// 2 | x = )
///   | ----^
/// ```
pub fn display_error(error: &Diagnostic, source: &[char], unit: &str) -> String {
    let mut output = String::new();

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_offset(source, position.offset);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    // Writing into a String cannot fail
    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(output, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(
            output,
            "Error: {} ({})",
            error.get_error_name(),
            error.get_tip()
        );
    }
    let _ = writeln!(output, "-> {}", unit);
    let _ = writeln!(output, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    let _ = writeln!(output, "{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    let _ = write!(output, "{:>padding$} {:->arrows$}", "|", "^");

    output
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();
    (string.chars().skip(start).collect(), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::errors::errors::{Diagnostic, ErrorImpl};
    use crate::Position;

    #[test]
    fn test_get_line_at_offset() {
        let source = "Hello, world!\nfoo\n\nTesting { }\n".chars().collect::<Vec<char>>();

        let (line_number, line, line_pos) = super::get_line_at_offset(&source, 10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_offset(&source, 27);
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_past_end() {
        let source = "abc".chars().collect::<Vec<char>>();
        let (line_number, line, line_pos) = super::get_line_at_offset(&source, 99);
        assert_eq!(line_number, 1);
        assert_eq!(line, "abc");
        assert_eq!(line_pos, 3);
    }

    #[test]
    fn test_display_error() {
        let source = "a = 1\n    x = $\n".chars().collect::<Vec<char>>();
        let error = Diagnostic::new(
            ErrorImpl::UnrecognisedCharacter { character: '$' },
            Position {
                offset: 14,
                line: 2,
                column: 9,
            },
        );
        let unit = Rc::new(String::from("main.kh"));

        let rendered = super::display_error(&error, &source, &unit);
        let lines = rendered.lines().collect::<Vec<&str>>();

        assert_eq!(lines[0], "Error: UnrecognisedCharacter");
        assert_eq!(lines[1], "-> main.kh");
        assert_eq!(lines[2], "  |");
        assert_eq!(lines[3], "2 | x = $");
        assert_eq!(lines[4], "  | ----^");
    }
}
