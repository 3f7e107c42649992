//! Shared data model for contingency table assembly.
//!
//! This crate holds the types exchanged between the table engine and its
//! consumers:
//!
//! - **variable**: independent/outcome variable specifications
//! - **matrix**: the assembled character grid with span metadata
//! - **error**: the error taxonomy shared across the workspace

pub mod error;
pub mod matrix;
pub mod variable;

pub use error::{Contract, Result, TableError};
pub use matrix::{HeaderSpan, RowGroup, TableMatrix};
pub use variable::{ResolvedVariable, VariableSpec};
