//! IQR outlier detection.
//!
//! Fences are `[Q1 - k * IQR, Q3 + k * IQR]` with `k = 1.5` by default and
//! quartiles computed by linear interpolation. A value is an outlier only
//! when it lies strictly outside the fences, so a constant column has none.

use super::statistics::{quantile_sorted, sorted_present};
use crate::error::{DiagnosticError, Result};
use crate::table::Table;
use crate::types::{OutlierRow, OutlierSet};
use tracing::debug;

/// Lower and upper outlier fences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Fences {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    /// Fences of a column's values; `None` when there are no values.
    pub(crate) fn from_values(values: &[Option<f64>], multiplier: f64) -> Option<Self> {
        let sorted = sorted_present(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    #[inline]
    pub(crate) fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    #[inline]
    pub(crate) fn is_outside(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Rows of `column` strictly outside the IQR fences.
pub(crate) fn detect_outliers(table: &Table, column: &str, multiplier: f64) -> Result<OutlierSet> {
    table.ensure_not_empty()?;

    let values = table.numeric_values(column)?;
    let fences = Fences::from_values(&values, multiplier).ok_or_else(|| {
        DiagnosticError::insufficient_data(column, "column has no non-missing numeric values")
    })?;

    let flagged: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.map(|v| (index, v)))
        .filter(|(_, v)| fences.is_outside(*v))
        .collect();

    let record_columns = table.numeric_column_names();
    let rows = if flagged.is_empty() {
        Vec::new()
    } else {
        let records = record_columns
            .iter()
            .map(|name| table.numeric_values(name))
            .collect::<Result<Vec<_>>>()?;

        flagged
            .into_iter()
            .map(|(index, value)| OutlierRow {
                index,
                value,
                record: records.iter().map(|col| col[index]).collect(),
            })
            .collect()
    };

    debug!(
        "Column '{}': {} outliers outside [{}, {}]",
        column,
        rows.len(),
        fences.lower,
        fences.upper
    );

    Ok(OutlierSet {
        column: column.to_string(),
        q1: fences.q1,
        q3: fences.q3,
        iqr: fences.iqr(),
        lower_bound: fences.lower,
        upper_bound: fences.upper,
        record_columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn table(df: DataFrame) -> Table {
        Table::new(df).unwrap()
    }

    #[test]
    fn test_single_high_outlier() {
        let t = table(df!["v" => [1.0, 2.0, 3.0, 4.0, 100.0]].unwrap());
        let set = detect_outliers(&t, "v", 1.5).unwrap();

        assert_eq!(set.q1, 2.0);
        assert_eq!(set.q3, 4.0);
        assert_eq!(set.iqr, 2.0);
        assert_eq!(set.lower_bound, -1.0);
        assert_eq!(set.upper_bound, 7.0);
        assert_eq!(set.values(), vec![100.0]);
        assert_eq!(set.rows[0].index, 4);
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let t = table(df!["v" => [5, 5, 5, 5]].unwrap());
        let set = detect_outliers(&t, "v", 1.5).unwrap();

        assert_eq!(set.iqr, 0.0);
        assert_eq!(set.lower_bound, 5.0);
        assert_eq!(set.upper_bound, 5.0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_value_on_fence_is_inside() {
        // Q1 = 2, Q3 = 4, upper fence = 7
        let t = table(df!["v" => [1.0, 2.0, 3.0, 4.0, 7.0]].unwrap());
        let set = detect_outliers(&t, "v", 1.5).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_outlier_rows_carry_numeric_record() {
        let t = table(
            df![
                "id" => [1, 2, 3, 4, 5],
                "label" => ["a", "b", "c", "d", "e"],
                "v" => [Some(-50.0), Some(2.0), None, Some(3.0), Some(4.0)],
            ]
            .unwrap(),
        );
        let set = detect_outliers(&t, "v", 1.5).unwrap();

        assert_eq!(set.record_columns, vec!["id".to_string(), "v".to_string()]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.rows[0].index, 0);
        assert_eq!(set.rows[0].record, vec![Some(1.0), Some(-50.0)]);
    }

    #[test]
    fn test_invalid_columns() {
        let t = table(df!["name" => ["a", "b"], "v" => [1.0, 2.0]].unwrap());

        let err = detect_outliers(&t, "name", 1.5).unwrap_err();
        assert!(matches!(err, DiagnosticError::InvalidColumn { .. }));
        let err = detect_outliers(&t, "missing", 1.5).unwrap_err();
        assert!(matches!(err, DiagnosticError::InvalidColumn { .. }));
    }

    #[test]
    fn test_all_missing_column_is_insufficient() {
        let t = table(df!["v" => [None::<f64>, None, None], "w" => [1, 2, 3]].unwrap());
        let err = detect_outliers(&t, "v", 1.5).unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
    }
}
