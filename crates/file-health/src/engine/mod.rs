//! The diagnostic engine.
//!
//! Pure, deterministic computations over a [`Table`]:
//! - Completeness and per-column missingness
//! - Exact duplicate rows
//! - Descriptive statistics of numeric columns
//! - IQR outliers
//! - Severity classification
//! - Chart data (completeness bars, distributions, correlations)
//!
//! The engine never mutates its input and holds no state besides its
//! configuration, so one engine can serve any number of tables.

mod charts;
mod completeness;
mod duplicates;
mod outliers;
mod severity;
mod statistics;

pub use severity::{CompletenessSeverity, DuplicateSeverity, SeverityAssessment};

use crate::config::HealthCheckConfig;
use crate::error::{DiagnosticError, Result, ResultExt};
use crate::table::Table;
use crate::types::{
    CompletenessChart, DescriptiveStats, Diagnosis, Distribution, HeatmapMatrix, OutlierSet,
    TableSummary,
};
use tracing::{debug, info};

/// Turns a table into data-quality metrics.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticEngine {
    config: HealthCheckConfig,
}

impl DiagnosticEngine {
    pub fn new(config: HealthCheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HealthCheckConfig {
        &self.config
    }

    /// Completeness summary and missingness table (descending missing %).
    ///
    /// Fails with [`DiagnosticError::EmptyTable`] when the table has no cells.
    pub fn summarize(&self, table: &Table) -> Result<TableSummary> {
        completeness::summarize(table)
    }

    /// Number of rows that exactly repeat an earlier row.
    pub fn duplicate_count(&self, table: &Table) -> Result<usize> {
        duplicates::count_duplicates(table)
    }

    /// Descriptive statistics of every numeric column; empty when there are
    /// no numeric columns.
    pub fn describe_numeric(&self, table: &Table) -> Result<Vec<DescriptiveStats>> {
        table.ensure_not_empty()?;

        table
            .numeric_columns()
            .map(|col| -> Result<DescriptiveStats> {
                let values = table.numeric_values(&col.name)?;
                Ok(statistics::describe_column(&col.name, &values))
            })
            .collect()
    }

    /// Rows of `column` outside the IQR fences.
    ///
    /// Fails with [`DiagnosticError::InvalidColumn`] for an absent or
    /// non-numeric column and [`DiagnosticError::InsufficientData`] when the
    /// column has no values.
    pub fn detect_outliers(&self, table: &Table, column: &str) -> Result<OutlierSet> {
        outliers::detect_outliers(table, column, self.config.iqr_multiplier)
    }

    /// Completeness verdict plus duplicate flag.
    pub fn classify(&self, completeness_pct: f64, duplicate_count: usize) -> SeverityAssessment {
        SeverityAssessment {
            completeness: CompletenessSeverity::classify(
                completeness_pct,
                self.config.good_completeness_pct,
                self.config.warning_completeness_pct,
            ),
            duplicates: DuplicateSeverity::classify(duplicate_count),
        }
    }

    /// Per-column presence rate, ascending, against the reliability threshold.
    pub fn completeness_chart(&self, table: &Table) -> Result<CompletenessChart> {
        completeness::completeness_chart(table, self.config.reliability_threshold_pct)
    }

    /// Histogram and box plot of a numeric column.
    pub fn distribution(&self, table: &Table, column: &str) -> Result<Distribution> {
        charts::distribution(table, column, self.config.histogram_bins)
    }

    /// Pearson correlations between numeric columns.
    pub fn correlation_matrix(&self, table: &Table) -> Result<Option<HeatmapMatrix>> {
        charts::correlation_matrix(table)
    }

    /// Run every diagnostic on a table.
    ///
    /// `outlier_column` picks the column whose outliers are shown first; an
    /// explicit choice must be a numeric column with values. Without one, the
    /// first numeric column holding at least one value is selected.
    pub fn run(&self, table: &Table, outlier_column: Option<&str>) -> Result<Diagnosis> {
        table.ensure_not_empty()?;
        info!(
            "Diagnosing table: {} rows x {} columns",
            table.height(),
            table.width()
        );

        let summary = self.summarize(table).context("Summarizing completeness")?;
        let duplicate_count = self
            .duplicate_count(table)
            .context("Counting duplicate rows")?;
        let severity = self.classify(summary.completeness.completeness_pct, duplicate_count);
        let numeric_stats = self.describe_numeric(table)?;

        let selected_column = match outlier_column {
            Some(column) => {
                self.detect_outliers(table, column)?;
                Some(column.to_string())
            }
            None => table
                .numeric_columns()
                .find(|col| col.missing < table.height())
                .map(|col| col.name.clone()),
        };

        let mut outliers = Vec::new();
        let mut distributions = Vec::new();
        for col in table.numeric_columns() {
            match self.detect_outliers(table, &col.name) {
                Ok(set) => outliers.push(set),
                Err(DiagnosticError::InsufficientData { .. }) => {
                    debug!("Skipping column '{}': no values", col.name);
                    continue;
                }
                Err(e) => return Err(e),
            }
            distributions.push(self.distribution(table, &col.name)?);
        }

        let completeness_chart = self.completeness_chart(table)?;
        let correlations = self.correlation_matrix(table)?;

        info!(
            "Completeness {:.2}% ({}), {} duplicate rows",
            summary.completeness.completeness_pct,
            severity.completeness.as_str(),
            duplicate_count
        );

        Ok(Diagnosis {
            summary,
            duplicate_count,
            severity,
            numeric_stats,
            selected_column,
            outliers,
            completeness_chart,
            distributions,
            correlations,
        })
    }
}

static_assertions::assert_impl_all!(DiagnosticEngine: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn engine() -> DiagnosticEngine {
        DiagnosticEngine::default()
    }

    #[test]
    fn test_classify_uses_config_thresholds() {
        let strict = DiagnosticEngine::new(
            HealthCheckConfig::builder()
                .completeness_thresholds(99.0, 90.0)
                .build()
                .unwrap(),
        );
        assert_eq!(
            strict.classify(96.0, 0).completeness,
            CompletenessSeverity::Warning
        );
        assert_eq!(
            engine().classify(96.0, 0).completeness,
            CompletenessSeverity::Good
        );
        assert_eq!(engine().classify(96.0, 2).duplicates, DuplicateSeverity::Warning);
    }

    #[test]
    fn test_describe_numeric_empty_without_numeric_columns() {
        let table = Table::new(df!["city" => ["Paris", "Lyon"]].unwrap()).unwrap();
        assert!(engine().describe_numeric(&table).unwrap().is_empty());
    }

    #[test]
    fn test_describe_numeric_only_numeric_columns() {
        let table = Table::new(
            df![
                "a" => [1.0, 2.0, 3.0],
                "flag" => [true, false, true],
                "b" => [10, 20, 30],
            ]
            .unwrap(),
        )
        .unwrap();

        let stats = engine().describe_numeric(&table).unwrap();
        let columns: Vec<&str> = stats.iter().map(|s| s.column.as_str()).collect();
        assert_eq!(columns, vec!["a", "b"]);
        assert_eq!(stats[1].mean, Some(20.0));
    }

    #[test]
    fn test_run_scenario() {
        let table = Table::new(
            df![
                "A" => [Some(1.0), Some(2.0), None, Some(4.0)],
                "B" => [5.0, 6.0, 7.0, 8.0],
            ]
            .unwrap(),
        )
        .unwrap();

        let diagnosis = engine().run(&table, None).unwrap();
        assert_eq!(diagnosis.summary.completeness.completeness_pct, 87.5);
        assert_eq!(diagnosis.severity.completeness, CompletenessSeverity::Warning);
        assert_eq!(diagnosis.severity.duplicates, DuplicateSeverity::Ok);
        assert_eq!(diagnosis.selected_column.as_deref(), Some("A"));
        assert!(diagnosis.selected_outliers().unwrap().is_empty());
        assert_eq!(diagnosis.outliers.len(), 2);
        assert_eq!(diagnosis.distributions.len(), 2);
        assert!(diagnosis.correlations.is_some());
    }

    #[test]
    fn test_run_skips_empty_numeric_columns_unless_selected() {
        let table = Table::new(
            df![
                "blank" => [None::<f64>, None, None],
                "v" => [1.0, 2.0, 3.0],
            ]
            .unwrap(),
        )
        .unwrap();

        let diagnosis = engine().run(&table, None).unwrap();
        assert_eq!(diagnosis.outliers.len(), 1);
        assert_eq!(diagnosis.outliers[0].column, "v");
        assert_eq!(diagnosis.selected_column.as_deref(), Some("v"));
        assert_eq!(diagnosis.selected_outliers().unwrap().column, "v");

        let err = engine().run(&table, Some("blank")).unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_DATA");
        let err = engine().run(&table, Some("nope")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_COLUMN");
    }

    #[test]
    fn test_default_column_skips_blank_leading_column() {
        let table = Table::new(
            df![
                "blank" => [None::<f64>, None, None, None, None],
                "v" => [1.0, 2.0, 3.0, 4.0, 100.0],
            ]
            .unwrap(),
        )
        .unwrap();

        let diagnosis = engine().run(&table, None).unwrap();
        assert_eq!(diagnosis.selected_column.as_deref(), Some("v"));
        assert_eq!(diagnosis.selected_outliers().unwrap().values(), vec![100.0]);
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let table = Table::new(
            df![
                "x" => [Some(1), None, Some(3)],
                "y" => [Some("a"), Some("b"), None],
            ]
            .unwrap(),
        )
        .unwrap();

        let first = engine().summarize(&table).unwrap();
        let second = engine().summarize(&table).unwrap();
        assert_eq!(first, second);
    }
}
