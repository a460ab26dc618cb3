//! The immutable table diagnosed by the engine.
//!
//! A [`Table`] wraps a Polars [`DataFrame`] and resolves each column's
//! [`ColumnKind`] exactly once, at construction. Float `NaN` cells are turned
//! into missing cells and columns with no values at all are treated as
//! numeric, so every later computation can rely on null counts alone.

use crate::error::{DiagnosticError, Result};
use crate::utils::{is_datetime_dtype, is_float_dtype, is_numeric_dtype};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Kind tag of a column, fixed when the table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// True/false values
    Boolean,
    /// Date, datetime, time or duration values
    Temporal,
    /// Strings, categoricals and anything else
    Text,
}

impl ColumnKind {
    /// Map a Polars dtype to a column kind.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            ColumnKind::Numeric
        } else if matches!(dtype, DataType::Boolean) {
            ColumnKind::Boolean
        } else if is_datetime_dtype(dtype) {
            ColumnKind::Temporal
        } else {
            ColumnKind::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Temporal => "temporal",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name, kind and missing count of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// An immutable, kind-tagged table.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
    columns: Vec<ColumnMeta>,
}

impl Table {
    /// Build a table from a DataFrame, normalizing missing markers and
    /// resolving column kinds.
    pub fn new(df: DataFrame) -> Result<Self> {
        let mut df = df;

        let replacements = df
            .get_columns()
            .iter()
            .filter_map(|column| normalize_column(column).transpose())
            .collect::<PolarsResult<Vec<Series>>>()?;

        for series in replacements {
            debug!("Normalized column '{}' to Float64", series.name());
            df.with_column(series)?;
        }

        let columns = df
            .get_columns()
            .iter()
            .map(|column| ColumnMeta {
                name: column.name().to_string(),
                kind: ColumnKind::from_dtype(column.dtype()),
                missing: column.null_count(),
            })
            .collect();

        Ok(Self { df, columns })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// True when the table has zero rows or zero columns.
    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    /// Fail with [`DiagnosticError::EmptyTable`] when the table is empty.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(DiagnosticError::EmptyTable {
                rows: self.height(),
                columns: self.width(),
            });
        }
        Ok(())
    }

    /// Column metadata in original order.
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Numeric columns in original order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns
            .iter()
            .filter(|col| col.kind == ColumnKind::Numeric)
    }

    /// Names of the numeric columns in original order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.numeric_columns().map(|col| col.name.clone()).collect()
    }

    /// The underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Total number of cells (`rows x columns`).
    pub fn total_cells(&self) -> usize {
        self.height().saturating_mul(self.width())
    }

    /// Total number of missing cells.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|col| col.missing).sum()
    }

    /// Values of a numeric column as `f64`, with `None` for missing cells.
    ///
    /// Fails with [`DiagnosticError::InvalidColumn`] when the column does not
    /// exist or is not numeric.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let meta = self
            .column(name)
            .ok_or_else(|| DiagnosticError::invalid_column(name, "column not found in table"))?;

        if meta.kind != ColumnKind::Numeric {
            return Err(DiagnosticError::invalid_column(
                name,
                format!("expected a numeric column, found {}", meta.kind),
            ));
        }

        let series = self
            .df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let values = series.f64()?.into_iter().collect();
        Ok(values)
    }
}

/// Return a replacement series when a column needs normalizing.
fn normalize_column(column: &Column) -> PolarsResult<Option<Series>> {
    let series = column.as_materialized_series();
    let dtype = series.dtype();

    if is_float_dtype(dtype) {
        let casted = series.cast(&DataType::Float64)?;
        let values = casted.f64()?;
        if !values.into_iter().flatten().any(f64::is_nan) {
            return Ok(None);
        }
        let cleaned: Float64Chunked = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        return Ok(Some(cleaned.with_name(series.name().clone()).into_series()));
    }

    // A column with no values carries no type; count it as numeric.
    if !series.is_empty() && series.null_count() == series.len() && !is_numeric_dtype(dtype) {
        return Ok(Some(series.cast(&DataType::Float64)?));
    }

    Ok(None)
}

static_assertions::assert_impl_all!(Table: Send, Sync);
