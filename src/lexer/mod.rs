//! Lexical analysis module for the front end.
//!
//! This module contains the lexer that turns a code-point buffer into
//! tokens, one at a time, on demand. It handles:
//!
//! - Recognition of keywords, operator words, identifiers and punctuation
//! - Numeric literals in four bases with width and imaginary suffixes
//! - Character, string, byte and buffer literals with escapes
//! - Comments, newlines and position tracking for error reporting

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
