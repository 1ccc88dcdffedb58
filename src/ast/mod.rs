//! AST (Abstract Syntax Tree) module
//!
//! Contains the tree the parser builds. Nodes are plain enums that own their
//! children, so a clone is a deep copy and a drop frees everything once.
//!
//! Submodules:
//! - ast: The module root
//! - expressions: Expression nodes
//! - statements: Statement nodes
//! - operators: Operator enums shared by the expression nodes
//! - dump: Single-line textual dump and literal quoting

pub mod ast;
pub mod dump;
pub mod expressions;
pub mod operators;
pub mod statements;

#[cfg(test)]
mod tests;
