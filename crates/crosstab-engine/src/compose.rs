//! Final layout: merge the data block and the supplementary rows/columns
//! into one rectangular grid with span metadata.
//!
//! The composer never reorders what upstream produced; it only places and
//! labels. Every span's text is also written into the grid at the span's
//! start cell, with the covered cells left empty, so consumers that
//! ignore spans still see every label exactly once.

use tracing::debug;

use crosstab_model::{HeaderSpan, ResolvedVariable, RowGroup, TableMatrix};

use crate::aggregate::{RowColumn, SummaryRow};
use crate::evaluate::BlockRow;

const MARGINAL_LABEL: &str = "Total";

pub(crate) fn compose(
    independents: &[ResolvedVariable],
    outcomes: &[ResolvedVariable],
    block: &[BlockRow],
    summary_rows: &[SummaryRow],
    row_columns: &[RowColumn],
    marginal: bool,
) -> TableMatrix {
    let outcome_cols: usize = outcomes.iter().map(ResolvedVariable::level_count).sum();
    let marginal_cols = usize::from(marginal);
    let n_cols = 1 + outcome_cols + marginal_cols + row_columns.len();
    let header_rows = if outcomes.is_empty() { 1 } else { 2 };

    let mut grid: Vec<Vec<String>> = Vec::new();
    let mut header_spans = Vec::new();

    // Group band: outcome variable labels spanning their level columns,
    // plus a one-wide span for the marginal column.
    if header_rows == 2 {
        let mut group_row = vec![String::new(); n_cols];
        let mut col = 1;
        for outcome in outcomes {
            group_row[col] = outcome.label.clone();
            header_spans.push(HeaderSpan {
                row: 0,
                start_col: col,
                width: outcome.level_count(),
                text: outcome.label.clone(),
            });
            col += outcome.level_count();
        }
        if marginal {
            group_row[col] = MARGINAL_LABEL.to_string();
            header_spans.push(HeaderSpan {
                row: 0,
                start_col: col,
                width: 1,
                text: MARGINAL_LABEL.to_string(),
            });
        }
        grid.push(group_row);
    }

    // Level band: outcome level names, then the marginal and row-function
    // column labels. With no outcomes this is the only header row and the
    // marginal label moves here.
    let mut level_row = vec![String::new(); n_cols];
    let mut col = 1;
    for outcome in outcomes {
        for level in &outcome.levels {
            level_row[col] = level.clone();
            col += 1;
        }
    }
    if marginal {
        if header_rows == 1 {
            level_row[col] = MARGINAL_LABEL.to_string();
        }
        col += 1;
    }
    for row_column in row_columns {
        level_row[col] = row_column.label.clone();
        col += 1;
    }
    grid.push(level_row);

    // Column-function band.
    for summary in summary_rows {
        let mut row = vec![String::new(); n_cols];
        row[0] = summary.label.clone();
        let mut col = 1;
        for cell in &summary.outcome_cells {
            row[col] = cell.clone();
            col += 1;
        }
        if marginal {
            row[col] = summary.marginal.clone().unwrap_or_default();
        }
        grid.push(row);
    }

    // Data block plus row-function columns, variable-major.
    let first_data_row = header_rows + summary_rows.len();
    let mut row_groups = Vec::with_capacity(independents.len());
    let mut block_idx = 0;
    for variable in independents {
        row_groups.push(RowGroup {
            start_row: first_data_row + block_idx,
            height: variable.level_count(),
            label: variable.label.clone(),
        });
        for _ in &variable.levels {
            let block_row = &block[block_idx];
            let mut row = vec![String::new(); n_cols];
            row[0] = block_row.level.clone();
            let mut col = 1;
            for cell in &block_row.outcome_cells {
                row[col] = cell.clone();
                col += 1;
            }
            if marginal {
                row[col] = block_row.marginal.clone().unwrap_or_default();
                col += 1;
            }
            for row_column in row_columns {
                row[col] = row_column.cells[block_idx].clone();
                col += 1;
            }
            grid.push(row);
            block_idx += 1;
        }
    }

    debug!(
        rows = grid.len(),
        cols = n_cols,
        groups = row_groups.len(),
        "table composed"
    );
    TableMatrix {
        grid,
        header_rows,
        summary_rows: summary_rows.len(),
        header_spans,
        row_groups,
    }
}
