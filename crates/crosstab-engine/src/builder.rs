//! Table requests and the assembly entry point.

use tracing::debug;

use crosstab_model::{Result, TableMatrix, VariableSpec};

use crate::aggregate::{evaluate_column_rows, evaluate_row_columns};
use crate::compose::compose;
use crate::dataset::Dataset;
use crate::evaluate::evaluate_block;
use crate::registry::resolve_variables;
use crate::summary::{ColumnFn, CrosstabFn, RowFn};

/// A table request: variable lists, summary functions, and layout flags.
///
/// Declaration order everywhere is significant: independents order the
/// row groups, outcomes order the column groups, and function order fixes
/// the output order within a cell, row, or column.
#[derive(Default)]
pub struct TableBuilder {
    independents: Vec<VariableSpec>,
    outcomes: Vec<VariableSpec>,
    crosstab_funcs: Vec<Box<dyn CrosstabFn>>,
    col_funcs: Vec<(String, Box<dyn ColumnFn>)>,
    row_funcs: Vec<(String, Box<dyn RowFn>)>,
    marginal: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            marginal: true,
            ..Self::default()
        }
    }

    /// Add an independent (row) variable.
    pub fn independent(mut self, label: impl Into<String>, column: impl Into<String>) -> Self {
        self.independents.push(VariableSpec::new(label, column));
        self
    }

    /// Add an outcome (column) variable.
    pub fn outcome(mut self, label: impl Into<String>, column: impl Into<String>) -> Self {
        self.outcomes.push(VariableSpec::new(label, column));
        self
    }

    /// Add a per-cell statistic.
    pub fn crosstab(mut self, func: impl CrosstabFn + 'static) -> Self {
        self.crosstab_funcs.push(Box::new(func));
        self
    }

    /// Add a labelled per-outcome-level statistic.
    pub fn column(mut self, label: impl Into<String>, func: impl ColumnFn + 'static) -> Self {
        self.col_funcs.push((label.into(), Box::new(func)));
        self
    }

    /// Add a labelled per-variable statistic.
    pub fn row(mut self, label: impl Into<String>, func: impl RowFn + 'static) -> Self {
        self.row_funcs.push((label.into(), Box::new(func)));
        self
    }

    /// Enable or disable the marginal total column (default: enabled).
    pub fn marginal(mut self, enabled: bool) -> Self {
        self.marginal = enabled;
        self
    }

    /// Assemble the table. Pure: the dataset is never mutated and two
    /// calls with identical inputs produce identical matrices.
    pub fn build(&self, data: &Dataset) -> Result<TableMatrix> {
        let independents = resolve_variables(&self.independents, data, "independent")?;
        let outcomes = resolve_variables(&self.outcomes, data, "outcome")?;
        debug!(
            independents = independents.len(),
            outcomes = outcomes.len(),
            crosstab_funcs = self.crosstab_funcs.len(),
            col_funcs = self.col_funcs.len(),
            row_funcs = self.row_funcs.len(),
            "assembling table"
        );

        // The unstratified total column: on request when outcomes are
        // present, and whenever the configured cell/column statistics
        // would otherwise have nowhere to go.
        let marginal = if outcomes.is_empty() {
            !self.crosstab_funcs.is_empty() || !self.col_funcs.is_empty()
        } else {
            self.marginal && !self.crosstab_funcs.is_empty()
        };

        let block = evaluate_block(
            data,
            &independents,
            &outcomes,
            &self.crosstab_funcs,
            marginal,
        )?;
        let summary_rows = evaluate_column_rows(data, &outcomes, &self.col_funcs, marginal)?;
        let row_columns = evaluate_row_columns(data, &independents, &self.row_funcs)?;
        Ok(compose(
            &independents,
            &outcomes,
            &block,
            &summary_rows,
            &row_columns,
            marginal,
        ))
    }
}

/// One-shot assembly matching the builder field-for-field.
#[allow(clippy::too_many_arguments)]
pub fn build_table(
    independents: Vec<VariableSpec>,
    outcomes: Vec<VariableSpec>,
    crosstab_funcs: Vec<Box<dyn CrosstabFn>>,
    col_funcs: Vec<(String, Box<dyn ColumnFn>)>,
    row_funcs: Vec<(String, Box<dyn RowFn>)>,
    data: &Dataset,
    marginal: bool,
) -> Result<TableMatrix> {
    let builder = TableBuilder {
        independents,
        outcomes,
        crosstab_funcs,
        col_funcs,
        row_funcs,
        marginal,
    };
    builder.build(data)
}
