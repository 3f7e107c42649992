//! Variable specifications for table requests.

use serde::{Deserialize, Serialize};

/// A display label paired with the dataset column it summarizes.
///
/// An ordered sequence of these forms the independent (row) list; a
/// second, possibly empty, sequence forms the outcome (column) list.
/// Labels need not be unique; columns must be unique within one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub label: String,
    pub column: String,
}

impl VariableSpec {
    pub fn new(label: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            column: column.into(),
        }
    }
}

/// A [`VariableSpec`] enriched with the level sequence resolved from the
/// dataset's declared factor order. Produced by the variable registry;
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVariable {
    pub label: String,
    pub column: String,
    pub levels: Vec<String>,
}

impl ResolvedVariable {
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
