//! The assembled table: a rectangular character grid plus span metadata.
//!
//! Spans are kept separate from the grid on purpose: renderers that merge
//! header cells (HTML `colspan`, LaTeX `\multicolumn`) consume the span
//! lists, while plain-text or CSV consumers can ignore them and still get
//! a well-formed rectangle.

use serde::{Deserialize, Serialize};

/// A merged header region: `width` columns starting at `start_col` on a
/// given header row, labelled with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSpan {
    pub row: usize,
    pub start_col: usize,
    pub width: usize,
    pub text: String,
}

/// A row group in the leftmost label column: an independent variable's
/// label spanning its `height` level rows starting at `start_row`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowGroup {
    pub start_row: usize,
    pub height: usize,
    pub label: String,
}

/// The fully laid-out table.
///
/// Grid rows are ordered: header band (`header_rows` rows), then one row
/// per column function (`summary_rows` rows), then one row per level of
/// every independent variable in declaration order. Column 0 is the label
/// column; outcome-level columns follow in declaration order, then the
/// marginal total column (when present), then one column per row function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMatrix {
    pub grid: Vec<Vec<String>>,
    pub header_rows: usize,
    pub summary_rows: usize,
    pub header_spans: Vec<HeaderSpan>,
    pub row_groups: Vec<RowGroup>,
}

impl TableMatrix {
    pub fn n_rows(&self) -> usize {
        self.grid.len()
    }

    pub fn n_cols(&self) -> usize {
        self.grid.first().map(Vec::len).unwrap_or(0)
    }

    /// The cross-tabulated block: everything below the header and
    /// column-function bands.
    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.grid[self.header_rows + self.summary_rows..]
    }

    pub fn is_rectangular(&self) -> bool {
        let width = self.n_cols();
        self.grid.iter().all(|row| row.len() == width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableMatrix {
        TableMatrix {
            grid: vec![
                vec![String::new(), "Yes".into(), "No".into()],
                vec!["M".into(), "10".into(), "20".into()],
                vec!["F".into(), "30".into(), "40".into()],
            ],
            header_rows: 1,
            summary_rows: 0,
            header_spans: vec![],
            row_groups: vec![RowGroup {
                start_row: 1,
                height: 2,
                label: "Sex".into(),
            }],
        }
    }

    #[test]
    fn data_rows_skip_header_band() {
        let matrix = sample();
        assert_eq!(matrix.data_rows().len(), 2);
        assert_eq!(matrix.data_rows()[0][0], "M");
    }

    #[test]
    fn dimensions() {
        let matrix = sample();
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_cols(), 3);
        assert!(matrix.is_rectangular());
    }
}
