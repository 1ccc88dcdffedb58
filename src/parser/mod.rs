//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the recursive-descent parser that pulls tokens from
//! the lexer and builds a `Module`. It handles:
//!
//! - Statement parsing (declarations, imports, control flow, bodies)
//! - Expression parsing through a precedence cascade, with Pratt loops for
//!   the binary levels
//! - Type expressions, a narrowed form of the expression grammar
//! - Error recovery, leaving `Invalid` nodes behind
//!
//! Statements dispatch through a keyword lookup table, binary operators
//! through binding-power tables.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
