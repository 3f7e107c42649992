//! Column- and row-wise supplementary statistics.
//!
//! Column functions run once per outcome level over the full dataset
//! (plus one unstratified call for the marginal column) and become extra
//! rows above the data block. Row functions run once per independent
//! variable and become extra columns, aligned level-for-level; a length
//! mismatch is a contract violation that aborts the build.

use tracing::debug;

use crosstab_model::{Contract, ResolvedVariable, Result, TableError};

use crate::dataset::Dataset;
use crate::summary::{ColumnFn, RowFn, Stratum};

/// One summary row produced by a column function, before layout.
#[derive(Debug, Clone)]
pub(crate) struct SummaryRow {
    pub label: String,
    /// One cell per outcome level, declaration order.
    pub outcome_cells: Vec<String>,
    /// The unstratified cell, when the table carries a marginal column.
    pub marginal: Option<String>,
}

/// One supplementary column produced by a row function, before layout.
#[derive(Debug, Clone)]
pub(crate) struct RowColumn {
    pub label: String,
    /// One cell per independent level, variable-major, matching the data
    /// block row-for-row.
    pub cells: Vec<String>,
}

pub(crate) fn evaluate_column_rows(
    data: &Dataset,
    outcomes: &[ResolvedVariable],
    funcs: &[(String, Box<dyn ColumnFn>)],
    marginal: bool,
) -> Result<Vec<SummaryRow>> {
    let mut rows = Vec::with_capacity(funcs.len());
    for (label, func) in funcs {
        debug!(label = %label, "evaluating column function");
        let mut outcome_cells = Vec::new();
        for outcome in outcomes {
            for level in &outcome.levels {
                let stratum = Stratum {
                    column: &outcome.column,
                    level,
                };
                outcome_cells.push(func.evaluate(data, Some(stratum))?);
            }
        }
        let marginal_cell = if marginal {
            Some(func.evaluate(data, None)?)
        } else {
            None
        };
        rows.push(SummaryRow {
            label: label.clone(),
            outcome_cells,
            marginal: marginal_cell,
        });
    }
    Ok(rows)
}

pub(crate) fn evaluate_row_columns(
    data: &Dataset,
    independents: &[ResolvedVariable],
    funcs: &[(String, Box<dyn RowFn>)],
) -> Result<Vec<RowColumn>> {
    let mut columns = Vec::with_capacity(funcs.len());
    for (label, func) in funcs {
        debug!(label = %label, "evaluating row function");
        let mut cells = Vec::new();
        for variable in independents {
            let values = func.evaluate(data, variable, independents)?;
            if values.len() != variable.level_count() {
                return Err(TableError::ContractViolation {
                    contract: Contract::Row,
                    label: label.clone(),
                    variable: variable.column.clone(),
                    message: format!(
                        "expected {} values, got {}",
                        variable.level_count(),
                        values.len()
                    ),
                });
            }
            cells.extend(values);
        }
        columns.push(RowColumn {
            label: label.clone(),
            cells,
        });
    }
    Ok(columns)
}
