//! Built-in summary statistics: counts, proportions, and continuous
//! summaries. Model-based row statistics live in `regression`.

use crosstab_model::Result;

use crate::dataset::Dataset;
use crate::summary::{CellContext, ColumnFn, CrosstabFn, Stratum};

/// Which total a proportion is taken against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denominator {
    /// The outcome level's total over the full dataset; proportions down
    /// one column sum to 100%.
    Column,
    /// The independent level's total; proportions across one row sum to
    /// 100%.
    Row,
    /// The dataset's row count.
    Overall,
}

/// Cell count, optionally with a parenthesized percentage.
///
/// Renders `"12"` or `"12 (34.6%)"` depending on configuration.
#[derive(Debug, Clone)]
pub struct Frequency {
    proportion: Option<Denominator>,
    digits: usize,
}

impl Frequency {
    /// Bare counts, no percentage.
    pub fn count() -> Self {
        Self {
            proportion: None,
            digits: 1,
        }
    }

    /// Counts with a percentage against the given denominator.
    pub fn with_proportion(denominator: Denominator) -> Self {
        Self {
            proportion: Some(denominator),
            digits: 1,
        }
    }

    /// Decimal places for the percentage.
    pub fn digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    fn render(&self, count: usize, denominator: usize) -> String {
        match self.proportion {
            None => count.to_string(),
            Some(_) if denominator == 0 => count.to_string(),
            Some(_) => {
                let pct = 100.0 * count as f64 / denominator as f64;
                format!("{count} ({pct:.digits$}%)", digits = self.digits)
            }
        }
    }
}

impl CrosstabFn for Frequency {
    fn evaluate(&self, cell: &CellContext<'_>) -> Result<String> {
        let count = match cell.outcome {
            Some(outcome) => cell.rows.count_eq(outcome.column, outcome.level)?,
            None => cell.rows.height(),
        };
        let denominator = match self.proportion {
            None => 0,
            Some(Denominator::Column) => match cell.outcome {
                Some(outcome) => cell.full.count_eq(outcome.column, outcome.level)?,
                None => cell.full.height(),
            },
            Some(Denominator::Row) => cell.rows.height(),
            Some(Denominator::Overall) => cell.full.height(),
        };
        Ok(self.render(count, denominator))
    }
}

impl ColumnFn for Frequency {
    fn evaluate(&self, data: &Dataset, outcome: Option<Stratum<'_>>) -> Result<String> {
        let count = match outcome {
            Some(outcome) => data.count_eq(outcome.column, outcome.level)?,
            None => data.height(),
        };
        Ok(self.render(count, data.height()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stat {
    Mean,
    Median,
}

/// Mean or median of a named numeric column over the current slice.
///
/// The column is addressed by name, independently of the categorical
/// variable lists. Empty slices render as `"-"`.
#[derive(Debug, Clone)]
pub struct NumericSummary {
    column: String,
    stat: Stat,
    digits: usize,
}

impl NumericSummary {
    pub fn mean(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            stat: Stat::Mean,
            digits: 1,
        }
    }

    pub fn median(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            stat: Stat::Median,
            digits: 1,
        }
    }

    pub fn digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    fn summarize(&self, data: &Dataset) -> Result<String> {
        let values: Vec<f64> = data
            .numeric_values(&self.column)?
            .into_iter()
            .flatten()
            .collect();
        let Some(value) = (match self.stat {
            Stat::Mean => mean(&values),
            Stat::Median => median(&values),
        }) else {
            return Ok("-".to_string());
        };
        Ok(format!("{value:.digits$}", digits = self.digits))
    }
}

impl CrosstabFn for NumericSummary {
    fn evaluate(&self, cell: &CellContext<'_>) -> Result<String> {
        match cell.outcome {
            Some(outcome) => {
                let slice = cell.rows.filter_eq(outcome.column, outcome.level)?;
                self.summarize(&slice)
            }
            None => self.summarize(cell.rows),
        }
    }
}

impl ColumnFn for NumericSummary {
    fn evaluate(&self, data: &Dataset, outcome: Option<Stratum<'_>>) -> Result<String> {
        match outcome {
            Some(outcome) => {
                let slice = data.filter_eq(outcome.column, outcome.level)?;
                self.summarize(&slice)
            }
            None => self.summarize(data),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame, NamedFrom, Series};

    fn dataset() -> Dataset {
        let columns: Vec<Column> = vec![
            Series::new("sex".into(), vec!["M", "M", "F", "F", "F"]).into(),
            Series::new("treated".into(), vec!["Yes", "No", "Yes", "Yes", "No"]).into(),
            Series::new("age".into(), vec![30.0f64, 40.0, 50.0, 60.0, 70.0]).into(),
        ];
        Dataset::new(DataFrame::new(columns).unwrap())
    }

    #[test]
    fn frequency_counts_outcome_level_within_slice() {
        let data = dataset();
        let rows = data.filter_eq("sex", "F").unwrap();
        let cell = CellContext {
            rows: &rows,
            full: &data,
            independent: Some(Stratum {
                column: "sex",
                level: "F",
            }),
            outcome: Some(Stratum {
                column: "treated",
                level: "Yes",
            }),
        };
        assert_eq!(CrosstabFn::evaluate(&Frequency::count(), &cell).unwrap(), "2");
    }

    #[test]
    fn frequency_column_proportion_uses_outcome_total() {
        let data = dataset();
        let rows = data.filter_eq("sex", "F").unwrap();
        let cell = CellContext {
            rows: &rows,
            full: &data,
            independent: Some(Stratum {
                column: "sex",
                level: "F",
            }),
            outcome: Some(Stratum {
                column: "treated",
                level: "Yes",
            }),
        };
        // 2 of the 3 Yes rows are female.
        let text = CrosstabFn::evaluate(&Frequency::with_proportion(Denominator::Column), &cell)
            .unwrap();
        assert_eq!(text, "2 (66.7%)");
    }

    #[test]
    fn frequency_row_proportion_uses_slice_total() {
        let data = dataset();
        let rows = data.filter_eq("sex", "F").unwrap();
        let cell = CellContext {
            rows: &rows,
            full: &data,
            independent: Some(Stratum {
                column: "sex",
                level: "F",
            }),
            outcome: Some(Stratum {
                column: "treated",
                level: "No",
            }),
        };
        let text = CrosstabFn::evaluate(&Frequency::with_proportion(Denominator::Row), &cell)
            .unwrap();
        assert_eq!(text, "1 (33.3%)");
    }

    #[test]
    fn frequency_marginal_cell_is_slice_height() {
        let data = dataset();
        let rows = data.filter_eq("sex", "M").unwrap();
        let cell = CellContext {
            rows: &rows,
            full: &data,
            independent: Some(Stratum {
                column: "sex",
                level: "M",
            }),
            outcome: None,
        };
        let text = CrosstabFn::evaluate(&Frequency::with_proportion(Denominator::Overall), &cell)
            .unwrap();
        assert_eq!(text, "2 (40.0%)");
    }

    #[test]
    fn mean_and_median_over_outcome_slice() {
        let data = dataset();
        let rows = data.filter_eq("sex", "F").unwrap();
        let cell = CellContext {
            rows: &rows,
            full: &data,
            independent: Some(Stratum {
                column: "sex",
                level: "F",
            }),
            outcome: Some(Stratum {
                column: "treated",
                level: "Yes",
            }),
        };
        assert_eq!(CrosstabFn::evaluate(&NumericSummary::mean("age"), &cell).unwrap(), "55.0");
        assert_eq!(
            CrosstabFn::evaluate(&NumericSummary::median("age"), &cell).unwrap(),
            "55.0"
        );
    }

    #[test]
    fn empty_slice_renders_placeholder() {
        let data = dataset();
        let rows = data.filter_eq("sex", "X").unwrap();
        let cell = CellContext {
            rows: &rows,
            full: &data,
            independent: Some(Stratum {
                column: "sex",
                level: "X",
            }),
            outcome: None,
        };
        assert_eq!(CrosstabFn::evaluate(&NumericSummary::mean("age"), &cell).unwrap(), "-");
    }

    #[test]
    fn column_contract_unstratified_is_total() {
        let data = dataset();
        let text = ColumnFn::evaluate(&Frequency::count(), &data, None).unwrap();
        assert_eq!(text, "5");
    }
}
