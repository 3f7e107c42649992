//! Read-only dataset wrapper: a polars `DataFrame` plus factor metadata.
//!
//! Grouping variables must be categorical. Level order matters (it drives
//! the row/column order of the assembled table), so the dataset carries an
//! explicit level registry. Levels declared through [`Dataset::with_levels`]
//! always win; for undeclared string columns the levels are derived in
//! first-appearance order.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, BooleanChunked, DataFrame, DataType, NewChunkedArray};

use crosstab_model::{Result, TableError};

#[derive(Debug, Clone)]
pub struct Dataset {
    data: DataFrame,
    levels: BTreeMap<String, Vec<String>>,
}

impl Dataset {
    pub fn new(data: DataFrame) -> Self {
        Self {
            data,
            levels: BTreeMap::new(),
        }
    }

    /// Declare the ordered level sequence for a column. Overrides the
    /// derived first-appearance order and also marks numeric-coded
    /// columns as categorical.
    pub fn with_levels<I, S>(mut self, column: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels
            .insert(column.into(), levels.into_iter().map(Into::into).collect());
        self
    }

    pub fn frame(&self) -> &DataFrame {
        &self.data
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Whether a column can serve as a grouping variable: declared levels,
    /// or a string/boolean dtype.
    pub fn is_categorical(&self, name: &str) -> bool {
        if self.levels.contains_key(name) {
            return true;
        }
        match self.data.column(name) {
            Ok(column) => matches!(column.dtype(), DataType::String | DataType::Boolean),
            Err(_) => false,
        }
    }

    /// The ordered level sequence for a column: the declared order when
    /// present, otherwise first-appearance order over the data.
    pub fn levels(&self, name: &str) -> Result<Vec<String>> {
        if let Some(declared) = self.levels.get(name) {
            return Ok(declared.clone());
        }
        let values = self.string_values(name)?;
        let mut seen = Vec::new();
        for value in values {
            if value.is_empty() {
                continue;
            }
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Ok(seen)
    }

    /// All values of a column rendered as trimmed strings.
    pub fn string_values(&self, name: &str) -> Result<Vec<String>> {
        let column = self.data.column(name).map_err(df_err)?;
        let mut values = Vec::with_capacity(self.data.height());
        for idx in 0..self.data.height() {
            let value = any_to_string(column.get(idx).unwrap_or(AnyValue::Null));
            values.push(value.trim().to_string());
        }
        Ok(values)
    }

    /// All values of a numeric column; nulls and unparsable entries are
    /// `None`.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self.data.column(name).map_err(df_err)?;
        let mut values = Vec::with_capacity(self.data.height());
        for idx in 0..self.data.height() {
            values.push(any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        Ok(values)
    }

    /// Rows where `column` equals `level`, preserving the level registry.
    pub fn filter_eq(&self, column: &str, level: &str) -> Result<Dataset> {
        let values = self.string_values(column)?;
        let keep: Vec<bool> = values.iter().map(|v| v == level).collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let data = self.data.filter(&mask).map_err(df_err)?;
        Ok(Dataset {
            data,
            levels: self.levels.clone(),
        })
    }

    /// Count of rows where `column` equals `level`.
    pub fn count_eq(&self, column: &str, level: &str) -> Result<usize> {
        let values = self.string_values(column)?;
        Ok(values.iter().filter(|v| *v == level).count())
    }
}

pub fn any_to_string(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Boolean(value) => {
            if value {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        value => value.to_string(),
    }
}

pub fn any_to_f64(value: AnyValue) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

pub(crate) fn df_err(err: polars::prelude::PolarsError) -> TableError {
    TableError::Dataframe(err.to_string())
}
