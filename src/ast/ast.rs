use crate::Span;

use super::statements::{count_body, Statement};

/// Module
///
/// The root of a parsed source unit, owning every top-level statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Module {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Module { statements, span }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Total number of statement and expression nodes in the tree.
    pub fn node_count(&self) -> usize {
        count_body(&self.statements)
    }
}

impl<'a> IntoIterator for &'a Module {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}
