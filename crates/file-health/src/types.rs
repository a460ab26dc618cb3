//! Output records produced by the diagnostic engine.
//!
//! Every record is derived from a [`Table`](crate::Table) and recomputed on
//! demand. Percentages keep full precision in memory and are rounded to two
//! decimals when serialized.

use crate::engine::SeverityAssessment;
use crate::utils::serialize_pct;
use serde::{Deserialize, Serialize};

/// Table-wide completeness figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessSummary {
    pub rows: usize,
    pub columns: usize,
    pub total_cells: usize,
    pub total_missing: usize,
    /// `(total_cells - total_missing) / total_cells * 100`
    #[serde(serialize_with = "serialize_pct")]
    pub completeness_pct: f64,
}

/// Missing values of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissingness {
    pub column: String,
    pub missing_count: usize,
    #[serde(serialize_with = "serialize_pct")]
    pub missing_pct: f64,
}

/// Output of `summarize`: completeness plus the per-column missingness table,
/// sorted by descending missing percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub completeness: CompletenessSummary,
    pub missingness: Vec<ColumnMissingness>,
}

/// Descriptive statistics of one numeric column.
///
/// Statistics that are undefined for the column (everything but `count` when
/// no value is present, `std` with a single value) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// One row flagged as an outlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierRow {
    /// Zero-based row index in the source table.
    pub index: usize,
    /// Value of the inspected column.
    pub value: f64,
    /// Values of every numeric column for this row, in
    /// [`OutlierSet::record_columns`] order.
    pub record: Vec<Option<f64>>,
}

/// Rows of a numeric column lying strictly outside the IQR fences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSet {
    pub column: String,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub record_columns: Vec<String>,
    pub rows: Vec<OutlierRow>,
}

impl OutlierSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Outlier values in row order.
    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.value).collect()
    }
}

// ============================================================================
// Chart data
// ============================================================================

/// Share of present values in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessBar {
    pub column: String,
    #[serde(serialize_with = "serialize_pct")]
    pub completeness_pct: f64,
}

/// Per-column completeness, ascending, with the reliability threshold line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessChart {
    pub bars: Vec<CompletenessBar>,
    pub threshold_pct: f64,
    /// Columns whose completeness is below `threshold_pct`.
    pub unreliable_columns: Vec<String>,
}

/// Histogram bin `[start, end)`; the last bin is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Box plot summary values for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Histogram and box plot of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub column: String,
    pub histogram: Vec<HistogramBin>,
    pub box_plot: BoxPlotSummary,
}

/// Square matrix of pairwise values between labelled columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapMatrix {
    pub labels: Vec<String>,
    /// `values[i][j]`, `None` where the value is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

/// Correlation between two distinct columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub column_x: String,
    pub column_y: String,
    pub estimate: f64,
}

impl HeatmapMatrix {
    /// Value at `(row, col)` looked up by label.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        self.values.get(i)?.get(j).copied().flatten()
    }

    /// Off-diagonal pairs sorted by descending absolute value.
    pub fn top_pairs(&self, limit: usize) -> Vec<CorrelationPair> {
        let mut pairs = Vec::new();
        for (i, row) in self.values.iter().enumerate() {
            for (j, value) in row.iter().enumerate().skip(i + 1) {
                if let Some(estimate) = value {
                    pairs.push(CorrelationPair {
                        column_x: self.labels[i].clone(),
                        column_y: self.labels[j].clone(),
                        estimate: *estimate,
                    });
                }
            }
        }
        pairs.sort_by(|a, b| b.estimate.abs().total_cmp(&a.estimate.abs()));
        pairs.truncate(limit);
        pairs
    }
}

// ============================================================================
// Full diagnosis
// ============================================================================

/// Everything the engine computes for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub summary: TableSummary,
    pub duplicate_count: usize,
    pub severity: SeverityAssessment,
    pub numeric_stats: Vec<DescriptiveStats>,
    /// Column whose outliers are shown first.
    pub selected_column: Option<String>,
    /// Outlier sets of every numeric column that has values.
    pub outliers: Vec<OutlierSet>,
    pub completeness_chart: CompletenessChart,
    pub distributions: Vec<Distribution>,
    /// Pearson correlations; `None` with fewer than two numeric columns.
    pub correlations: Option<HeatmapMatrix>,
}

impl Diagnosis {
    /// Outlier set of the selected column.
    pub fn selected_outliers(&self) -> Option<&OutlierSet> {
        let selected = self.selected_column.as_deref()?;
        self.outliers.iter().find(|set| set.column == selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> HeatmapMatrix {
        HeatmapMatrix {
            labels: vec!["a".into(), "b".into(), "c".into()],
            values: vec![
                vec![Some(1.0), Some(0.2), Some(-0.9)],
                vec![Some(0.2), Some(1.0), None],
                vec![Some(-0.9), None, Some(1.0)],
            ],
        }
    }

    #[test]
    fn test_heatmap_get() {
        let m = matrix();
        assert_eq!(m.get("a", "c"), Some(-0.9));
        assert_eq!(m.get("b", "c"), None);
        assert_eq!(m.get("a", "zzz"), None);
    }

    #[test]
    fn test_top_pairs_sorted_by_magnitude() {
        let pairs = matrix().top_pairs(10);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].column_x, "a");
        assert_eq!(pairs[0].column_y, "c");
        assert_eq!(pairs[1].estimate, 0.2);
    }

    #[test]
    fn test_percentages_rounded_when_serialized() {
        let row = ColumnMissingness {
            column: "age".to_string(),
            missing_count: 1,
            missing_pct: 100.0 / 3.0,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["missing_pct"], serde_json::json!(33.33));
        assert!((row.missing_pct - 33.333333).abs() < 1e-4);
    }
}
