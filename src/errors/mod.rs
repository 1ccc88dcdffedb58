//! Diagnostics for the front end.
//!
//! This module defines the diagnostics recorded while lexing and parsing.
//! It includes:
//!
//! - Diagnostic structures with source position information
//! - Lexical and syntactic error variants
//! - A per-unit sink that suppresses consecutive duplicates
//! - Helpful error messages and suggestions

pub mod errors;
