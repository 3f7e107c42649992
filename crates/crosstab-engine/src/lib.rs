//! Contingency table assembly.
//!
//! This crate turns a dataset plus ordered variable lists and pluggable
//! summary statistics into a rectangular character matrix with header and
//! row-group span metadata:
//!
//! - **dataset**: read-only polars `DataFrame` wrapper with factor levels
//! - **registry**: variable validation and level resolution
//! - **summary**: the crosstab/column/row function contracts
//! - **builtins**: frequency, proportion, mean and median statistics
//! - **regression**: odds/hazard ratio row functions over a fitter seam
//! - **evaluate / aggregate / compose**: the assembly pipeline
//!
//! ```ignore
//! use crosstab_engine::{Dataset, Denominator, Frequency, TableBuilder};
//!
//! let table = TableBuilder::new()
//!     .independent("Sex", "sex")
//!     .outcome("Treated", "treated")
//!     .crosstab(Frequency::with_proportion(Denominator::Column))
//!     .build(&data)?;
//! ```

pub mod builtins;
pub mod dataset;
pub mod regression;
pub mod registry;
pub mod summary;

mod aggregate;
mod builder;
mod compose;
mod evaluate;

pub use builder::{TableBuilder, build_table};
pub use builtins::{Denominator, Frequency, NumericSummary};
pub use dataset::Dataset;
pub use regression::{
    Baseline, CrudeBinaryFitter, HazardRatio, LevelEstimate, ModelFitter, ModelSpec, OddsRatio,
    Response,
};
pub use registry::resolve_variables;
pub use summary::{CellContext, ColumnFn, CrosstabFn, RowFn, Stratum};

// Re-export the shared model types so most callers need one import.
pub use crosstab_model::{
    Contract, HeaderSpan, ResolvedVariable, Result, RowGroup, TableError, TableMatrix,
    VariableSpec,
};
