use std::fmt;

use thiserror::Error;

/// Which summary-function contract an implementation was registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Contract {
    /// Per independent-level x outcome-level cell.
    Crosstab,
    /// Per outcome level, ignoring independent stratification.
    Column,
    /// Per independent variable, across all its levels.
    Row,
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Crosstab => "crosstab",
            Self::Column => "column",
            Self::Row => "row",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    /// Invalid table request: missing column, non-categorical column used
    /// as a grouping variable, or a duplicate column within one list.
    /// Raised before any computation runs.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A summary function returned a value of the wrong shape. The build
    /// aborts at the offending call; no partial table is returned.
    #[error("{contract} function `{label}` violated its contract for variable `{variable}`: {message}")]
    ContractViolation {
        contract: Contract,
        label: String,
        variable: String,
        message: String,
    },

    /// A model-based summary could not be estimated (zero cell, singular
    /// design, unsupported response). Carries enough context for the
    /// caller to drop the offending function and retry.
    #[error("estimation failed for variable `{}`{}: {}", .variable, outcome_context(.outcome), .message)]
    Estimation {
        variable: String,
        outcome: Option<String>,
        message: String,
    },

    /// A dataframe operation failed inside the engine.
    #[error("dataframe error: {0}")]
    Dataframe(String),
}

fn outcome_context(outcome: &Option<String>) -> String {
    match outcome {
        Some(name) => format!(" (outcome `{name}`)"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
