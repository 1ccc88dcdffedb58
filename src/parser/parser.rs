//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parsing entry points.
//! The parser pulls tokens from the lexer on demand: peeking lexes from a
//! copy of the cursor, so only committed tokens report lexical diagnostics.
//!
//! Parsing never fails. Malformed input is recorded in the diagnostics and
//! leaves `Invalid` placeholders in the tree.

use std::rc::Rc;

use log::{debug, trace};

use crate::{
    ast::ast::Module,
    errors::errors::{Diagnostics, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Delimiter, Keyword, Token, TokenKind},
    },
    Position, Span,
};

use super::stmt::parse_statement;

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// How deep expressions, statements and blocks may nest
    pub max_depth: usize,
    /// Report `break` and `continue` outside of a loop
    pub validate_loop_control: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: 64,
            validate_loop_control: true,
        }
    }
}

/// A saved parser state to backtrack to after a failed speculative parse.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint<'a> {
    lexer: Lexer<'a>,
    last_end: usize,
    diagnostics: usize,
}

/// The main parser structure that maintains parsing state.
///
/// Holds the lexer cursor, the diagnostics of the unit being parsed and the
/// counters bounding recursion.
pub struct Parser<'a> {
    /// Cursor into the source buffer
    lexer: Lexer<'a>,
    /// Every diagnostic recorded so far
    diagnostics: Diagnostics,
    config: ParserConfig,
    /// End offset of the last committed token
    last_end: usize,
    /// Current nesting depth, bounded by `config.max_depth`
    depth: usize,
    /// Number of enclosing loops in the current function body
    loop_depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new Parser instance.
    ///
    /// # Arguments
    ///
    /// * `source` - The code points to parse
    /// * `unit` - Name used to attribute diagnostics, `shell` when absent
    /// * `config` - Depth limit and validation switches
    pub fn new(source: &'a [char], unit: Option<String>, config: ParserConfig) -> Self {
        let unit = Rc::new(unit.unwrap_or_else(|| String::from("shell")));

        Parser {
            lexer: Lexer::new(source),
            diagnostics: Diagnostics::new(unit),
            config,
            last_end: 0,
            depth: 0,
            loop_depth: 0,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Returns the token under the cursor without consuming it.
    ///
    /// Comments are always skipped, newlines only when `ignore_newline` is set.
    pub fn current_token(&self, ignore_newline: bool) -> Token {
        self.peek_token(0, ignore_newline)
    }

    /// Returns the token `n` tokens past the cursor without consuming anything.
    pub fn peek_token(&self, n: usize, ignore_newline: bool) -> Token {
        let mut lexer = self.lexer;
        let mut scratch = Diagnostics::new(Rc::clone(self.diagnostics.unit()));

        let mut remaining = n;
        loop {
            let token = lexer.lex(&mut scratch);
            let skipped = token.kind == TokenKind::Comment
                || (ignore_newline && token.kind == TokenKind::Newline);

            if skipped {
                continue;
            }
            if remaining == 0 || token.kind == TokenKind::EndOfInput {
                return token;
            }
            remaining -= 1;
        }
    }

    /// Consumes the token under the cursor and returns it.
    ///
    /// Lexical diagnostics of the consumed tokens are recorded here. Unless
    /// the input is exhausted the cursor always moves forward.
    pub fn advance(&mut self, ignore_newline: bool) -> Token {
        loop {
            let token = self.lexer.lex(&mut self.diagnostics);
            let skipped = token.kind == TokenKind::Comment
                || (ignore_newline && token.kind == TokenKind::Newline);

            if !skipped {
                trace!("[{}] consumed {}", self.diagnostics.unit(), token.debug());
                if token.kind != TokenKind::EndOfInput {
                    self.last_end = token.position.offset + token.length;
                }
                return token;
            }
        }
    }

    /// Code-point offset of the cursor.
    pub fn offset(&self) -> usize {
        self.lexer.offset()
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token(true).kind == TokenKind::EndOfInput
    }

    /// Offset where the next node starts.
    pub fn start(&self, ignore_newline: bool) -> usize {
        self.current_token(ignore_newline).position.offset
    }

    /// Span from `start` to the end of the last committed token.
    pub fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    /// Returns the position of the next token.
    pub fn get_position(&self, ignore_newline: bool) -> Position {
        self.current_token(ignore_newline).position
    }

    pub fn error(&mut self, error_impl: ErrorImpl, position: Position) {
        self.diagnostics.error(error_impl, position);
    }

    /// Consumes the expected delimiter, or reports what was found instead.
    ///
    /// # Returns
    ///
    /// Returns true if the delimiter was there. Nothing is consumed otherwise.
    pub fn expect_delimiter(&mut self, delimiter: Delimiter, ignore_newline: bool) -> bool {
        let token = self.current_token(ignore_newline);

        if token.is_delimiter(delimiter) {
            self.advance(ignore_newline);
            true
        } else {
            self.expected(format!("`{}`", delimiter), &token);
            false
        }
    }

    /// Consumes the expected keyword, or reports what was found instead.
    pub fn expect_keyword(&mut self, keyword: Keyword, ignore_newline: bool) -> bool {
        let token = self.current_token(ignore_newline);

        if token.is_keyword(keyword) {
            self.advance(ignore_newline);
            true
        } else {
            self.expected(format!("`{}`", keyword), &token);
            false
        }
    }

    /// Consumes an identifier and returns its name.
    ///
    /// Anything else is reported and left in place.
    pub fn expect_identifier(&mut self, ignore_newline: bool) -> Option<String> {
        let token = self.current_token(ignore_newline);

        match token.get_identifier() {
            Some(name) => {
                let name = name.to_string();
                self.advance(ignore_newline);
                Some(name)
            }
            None => {
                self.expected(String::from("an identifier"), &token);
                None
            }
        }
    }

    pub fn expected(&mut self, expected: String, found: &Token) {
        let error_impl = if found.kind == TokenKind::EndOfInput {
            ErrorImpl::UnexpectedEndOfInput
        } else {
            ErrorImpl::ExpectedToken {
                expected,
                found: found.to_string(),
            }
        };

        self.diagnostics.error(error_impl, found.position);
    }

    pub fn checkpoint(&self) -> Checkpoint<'a> {
        Checkpoint {
            lexer: self.lexer,
            last_end: self.last_end,
            diagnostics: self.diagnostics.len(),
        }
    }

    /// Moves the cursor back to `checkpoint`, forgetting diagnostics recorded since.
    pub fn restore(&mut self, checkpoint: Checkpoint<'a>) {
        trace!(
            "[{}] backtracking to offset {}",
            self.diagnostics.unit(),
            checkpoint.lexer.offset()
        );

        self.lexer = checkpoint.lexer;
        self.last_end = checkpoint.last_end;
        self.diagnostics.truncate(checkpoint.diagnostics);
    }

    /// Enters one nesting level.
    ///
    /// # Returns
    ///
    /// Returns false once the depth limit is reached. The limit is reported
    /// and the offending token skipped unless it closes an enclosing construct.
    pub fn enter(&mut self, ignore_newline: bool) -> bool {
        if self.depth >= self.config.max_depth {
            let token = self.current_token(ignore_newline);
            self.nesting_too_deep(token.position);

            if !token.is_recovery_anchor() {
                self.advance(ignore_newline);
            }
            return false;
        }

        self.depth += 1;
        true
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Counts one node that a loop wraps around its own result, like each `+`
    /// of `a + b + c`.
    ///
    /// Unlike `enter` nothing is reported or skipped at the limit, the caller
    /// decides how to go on.
    pub fn enter_chain(&mut self) -> bool {
        if self.depth >= self.config.max_depth {
            return false;
        }

        self.depth += 1;
        true
    }

    /// Releases `count` levels taken with `enter_chain`.
    pub fn leave_chain(&mut self, count: usize) {
        self.depth = self.depth.saturating_sub(count);
    }

    pub fn nesting_too_deep(&mut self, position: Position) {
        self.diagnostics.error(
            ErrorImpl::NestingTooDeep {
                limit: self.config.max_depth,
            },
            position,
        );
    }

    pub fn loop_depth(&self) -> usize {
        self.loop_depth
    }

    /// Replaces the loop depth and returns the previous one.
    ///
    /// Function, lambda and class bodies start over at zero.
    pub fn set_loop_depth(&mut self, loop_depth: usize) -> usize {
        std::mem::replace(&mut self.loop_depth, loop_depth)
    }
}

/// Parses a whole source unit into a Module.
///
/// This is the main entry point for parsing. Statements are parsed until the
/// end of input; stray `;` tokens between them are skipped.
///
/// # Arguments
///
/// * `source` - The code points to parse
/// * `unit` - Name used to attribute diagnostics, `shell` when absent
///
/// # Returns
///
/// A tuple containing:
/// - The Module, with `Invalid` nodes where the input was malformed
/// - Every diagnostic recorded, in source order
pub fn parse(source: &[char], unit: Option<String>) -> (Module, Diagnostics) {
    parse_with_config(source, unit, ParserConfig::default())
}

/// Parses a `&str`, see `parse`.
pub fn parse_str(source: &str, unit: Option<String>) -> (Module, Diagnostics) {
    let chars = source.chars().collect::<Vec<char>>();
    parse(&chars, unit)
}

pub fn parse_with_config(
    source: &[char],
    unit: Option<String>,
    config: ParserConfig,
) -> (Module, Diagnostics) {
    let mut parser = Parser::new(source, unit, config);
    debug!(
        "[{}] parsing {} code points",
        parser.diagnostics().unit(),
        source.len()
    );

    let mut statements = vec![];

    loop {
        let token = parser.current_token(true);

        if token.kind == TokenKind::EndOfInput {
            break;
        }

        if token.is_delimiter(Delimiter::Semicolon) {
            parser.advance(true);
            continue;
        }

        if token.is_delimiter(Delimiter::CurlyBracketClose) {
            parser.error(
                ErrorImpl::UnexpectedToken {
                    token: token.to_string(),
                },
                token.position,
            );
            parser.advance(true);
            continue;
        }

        let before = parser.offset();
        statements.push(parse_statement(&mut parser));

        // Always make progress, whatever the statement did
        if parser.offset() == before {
            parser.advance(true);
        }
    }

    let module = Module::new(statements, Span::new(0, source.len()));
    let diagnostics = parser.into_diagnostics();

    debug!(
        "[{}] parsed {} statements with {} diagnostics",
        diagnostics.unit(),
        module.len(),
        diagnostics.len()
    );

    (module, diagnostics)
}
