//! Cell evaluation for the cross-tabulated block.
//!
//! Evaluation order is part of the output contract: independent variable,
//! then level, then outcome variable, then outcome level, then function
//! declaration order. The (variable, level) slice is computed once and
//! reused for every cell in that row.

use tracing::{debug, trace};

use crosstab_model::{ResolvedVariable, Result};

use crate::dataset::Dataset;
use crate::summary::{CellContext, CrosstabFn, Stratum};

/// One data row of the cross-tabulated block, before layout.
#[derive(Debug, Clone)]
pub(crate) struct BlockRow {
    pub level: String,
    /// One cell per outcome level, across all outcome variables in
    /// declaration order. Empty strings when no crosstab function is
    /// configured.
    pub outcome_cells: Vec<String>,
    /// The unstratified (marginal) cell, when requested.
    pub marginal: Option<String>,
}

pub(crate) fn evaluate_block(
    data: &Dataset,
    independents: &[ResolvedVariable],
    outcomes: &[ResolvedVariable],
    funcs: &[Box<dyn CrosstabFn>],
    marginal: bool,
) -> Result<Vec<BlockRow>> {
    let mut rows = Vec::new();
    for variable in independents {
        debug!(variable = %variable.column, levels = variable.levels.len(), "evaluating block rows");
        for level in &variable.levels {
            let slice = data.filter_eq(&variable.column, level)?;
            let independent = Stratum {
                column: &variable.column,
                level,
            };
            let mut outcome_cells = Vec::new();
            for outcome in outcomes {
                for outcome_level in &outcome.levels {
                    let cell = CellContext {
                        rows: &slice,
                        full: data,
                        independent: Some(independent),
                        outcome: Some(Stratum {
                            column: &outcome.column,
                            level: outcome_level,
                        }),
                    };
                    outcome_cells.push(evaluate_cell(funcs, &cell)?);
                    trace!(
                        independent = %variable.column,
                        level = %level,
                        outcome = %outcome.column,
                        outcome_level = %outcome_level,
                        "cell evaluated"
                    );
                }
            }
            let marginal_cell = if marginal {
                let cell = CellContext {
                    rows: &slice,
                    full: data,
                    independent: Some(independent),
                    outcome: None,
                };
                Some(evaluate_cell(funcs, &cell)?)
            } else {
                None
            };
            rows.push(BlockRow {
                level: level.clone(),
                outcome_cells,
                marginal: marginal_cell,
            });
        }
    }
    Ok(rows)
}

/// All configured crosstab functions against one cell, in declaration
/// order, joined line-wise.
fn evaluate_cell(funcs: &[Box<dyn CrosstabFn>], cell: &CellContext<'_>) -> Result<String> {
    let mut parts = Vec::with_capacity(funcs.len());
    for func in funcs {
        parts.push(func.evaluate(cell)?);
    }
    Ok(parts.join("\n"))
}
