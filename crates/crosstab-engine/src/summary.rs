//! The three summary-function contracts.
//!
//! Each contract is a strategy trait with an explicit invocation
//! signature; built-ins and user-supplied statistics alike implement the
//! matching trait. Stratification context is passed as `Option<Stratum>`
//! so the stratified-vs-unstratified branch is exhaustive instead of
//! hiding behind sentinel values.

use crosstab_model::{ResolvedVariable, Result};

use crate::dataset::Dataset;

/// One stratification coordinate: a column and the level currently being
/// summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stratum<'a> {
    pub column: &'a str,
    pub level: &'a str,
}

/// Context for one crosstab cell.
///
/// `rows` is already restricted to the current independent level; outcome
/// filtering is left to the function (some statistics need the
/// outcome-unrestricted slice for their denominator). `full` is the whole
/// dataset, for denominators that ignore stratification entirely.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub rows: &'a Dataset,
    pub full: &'a Dataset,
    pub independent: Option<Stratum<'a>>,
    pub outcome: Option<Stratum<'a>>,
}

/// Per-cell statistic: one formatted string per
/// (independent level x outcome level) combination, or per independent
/// level when invoked unstratified (no outcomes, or the marginal column).
pub trait CrosstabFn {
    fn evaluate(&self, cell: &CellContext<'_>) -> Result<String>;
}

/// Per-outcome-level statistic over the full dataset, ignoring
/// independent stratification. `outcome` is `None` for the unstratified
/// (marginal) invocation.
pub trait ColumnFn {
    fn evaluate(&self, data: &Dataset, outcome: Option<Stratum<'_>>) -> Result<String>;
}

/// Per-variable statistic: one formatted string per level of `variable`,
/// in level order. `independents` is the full independent list, so
/// model-based implementations can adjust for the other variables.
pub trait RowFn {
    fn evaluate(
        &self,
        data: &Dataset,
        variable: &ResolvedVariable,
        independents: &[ResolvedVariable],
    ) -> Result<Vec<String>>;
}

impl<F> CrosstabFn for F
where
    F: Fn(&CellContext<'_>) -> Result<String>,
{
    fn evaluate(&self, cell: &CellContext<'_>) -> Result<String> {
        self(cell)
    }
}

impl<F> ColumnFn for F
where
    F: Fn(&Dataset, Option<Stratum<'_>>) -> Result<String>,
{
    fn evaluate(&self, data: &Dataset, outcome: Option<Stratum<'_>>) -> Result<String> {
        self(data, outcome)
    }
}

impl<F> RowFn for F
where
    F: Fn(&Dataset, &ResolvedVariable, &[ResolvedVariable]) -> Result<Vec<String>>,
{
    fn evaluate(
        &self,
        data: &Dataset,
        variable: &ResolvedVariable,
        independents: &[ResolvedVariable],
    ) -> Result<Vec<String>> {
        self(data, variable, independents)
    }
}
