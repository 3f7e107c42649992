//! Variable resolution and validation.
//!
//! Runs before any statistic is computed: every referenced column must
//! exist and be categorical, and no column may appear twice within one
//! list. Level sequences are resolved from the dataset's declared factor
//! order, never recomputed downstream.

use std::collections::BTreeSet;

use tracing::debug;

use crosstab_model::{ResolvedVariable, Result, TableError, VariableSpec};

use crate::dataset::Dataset;

/// Resolve one specification list against the dataset.
///
/// `role` names the list ("independent" or "outcome") in error messages.
pub fn resolve_variables(
    specs: &[VariableSpec],
    data: &Dataset,
    role: &str,
) -> Result<Vec<ResolvedVariable>> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut resolved = Vec::with_capacity(specs.len());
    for spec in specs {
        if !seen.insert(spec.column.as_str()) {
            return Err(TableError::Configuration(format!(
                "duplicate column `{}` in {role} list",
                spec.column
            )));
        }
        if !data.has_column(&spec.column) {
            return Err(TableError::Configuration(format!(
                "{role} column `{}` not found in dataset",
                spec.column
            )));
        }
        if !data.is_categorical(&spec.column) {
            return Err(TableError::Configuration(format!(
                "{role} column `{}` is not categorical",
                spec.column
            )));
        }
        let levels = data.levels(&spec.column)?;
        if levels.is_empty() {
            return Err(TableError::Configuration(format!(
                "{role} column `{}` has no levels",
                spec.column
            )));
        }
        debug!(
            column = %spec.column,
            role,
            levels = levels.len(),
            "resolved variable"
        );
        resolved.push(ResolvedVariable {
            label: spec.label.clone(),
            column: spec.column.clone(),
            levels,
        });
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame, NamedFrom, Series};

    fn dataset() -> Dataset {
        let columns: Vec<Column> = vec![
            Series::new("sex".into(), vec!["M", "F", "M"]).into(),
            Series::new("age".into(), vec![34i64, 61, 47]).into(),
        ];
        Dataset::new(DataFrame::new(columns).unwrap())
    }

    #[test]
    fn resolves_levels_in_appearance_order() {
        let specs = vec![VariableSpec::new("Sex", "sex")];
        let resolved = resolve_variables(&specs, &dataset(), "independent").unwrap();
        assert_eq!(resolved[0].levels, vec!["M", "F"]);
    }

    #[test]
    fn declared_levels_override_appearance_order() {
        let data = dataset().with_levels("sex", ["F", "M"]);
        let specs = vec![VariableSpec::new("Sex", "sex")];
        let resolved = resolve_variables(&specs, &data, "independent").unwrap();
        assert_eq!(resolved[0].levels, vec!["F", "M"]);
    }

    #[test]
    fn rejects_missing_column() {
        let specs = vec![VariableSpec::new("Arm", "arm")];
        let err = resolve_variables(&specs, &dataset(), "independent").unwrap_err();
        assert!(matches!(err, TableError::Configuration(_)));
        assert!(err.to_string().contains("`arm`"));
    }

    #[test]
    fn rejects_numeric_column() {
        let specs = vec![VariableSpec::new("Age", "age")];
        let err = resolve_variables(&specs, &dataset(), "outcome").unwrap_err();
        assert!(err.to_string().contains("not categorical"));
    }

    #[test]
    fn rejects_duplicate_column() {
        let specs = vec![VariableSpec::new("Sex", "sex"), VariableSpec::new("Sex2", "sex")];
        let err = resolve_variables(&specs, &dataset(), "independent").unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
