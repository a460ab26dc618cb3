//! File Health Check Library
//!
//! A data-quality diagnostic library for tabular datasets, built with Rust and Polars.
//!
//! # Overview
//!
//! Given a table, the library reports:
//!
//! - **Completeness**: share of non-missing cells, table-wide and per column
//! - **Duplicates**: rows that exactly repeat an earlier row
//! - **Descriptive Statistics**: count, mean, std, quartiles and range of numeric columns
//! - **Outliers**: rows outside the IQR fences of a numeric column
//! - **Severity**: good / warning / critical completeness verdict and duplicate flag
//! - **Chart Data**: completeness bars, histograms, box plots and a correlation heatmap
//!
//! Tables are loaded from local CSV files, in-memory uploads, or spreadsheet
//! links exported as CSV.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use file_health::{DiagnosticEngine, HealthCheckConfig, TableSource};
//!
//! let config = HealthCheckConfig::builder()
//!     .max_input_mib(50)
//!     .build()?;
//!
//! let loaded = TableSource::local("data/sales.csv").load(&config)?;
//! let diagnosis = DiagnosticEngine::new(config).run(&loaded.table, Some("price"))?;
//!
//! println!("Completeness: {:.2}%", diagnosis.summary.completeness.completeness_pct);
//! println!("Duplicates: {}", diagnosis.duplicate_count);
//! if let Some(outliers) = diagnosis.selected_outliers() {
//!     for row in &outliers.rows {
//!         println!("row {}: {}", row.index, row.value);
//!     }
//! }
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`DiagnosticError`]. Engine failures
//! (`EmptyTable`, `InvalidColumn`, `InsufficientData`) and input failures are
//! recoverable: pick another column or load another file.

pub mod config;
pub mod engine;
pub mod error;
pub mod reporting;
pub mod source;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, HealthCheckConfig, HealthCheckConfigBuilder};
pub use engine::{CompletenessSeverity, DiagnosticEngine, DuplicateSeverity, SeverityAssessment};
pub use error::{DiagnosticError, Result as DiagnosticResult, ResultExt};
pub use reporting::{HealthReport, ReportGenerator, render_text};
pub use source::{LoadedTable, SourceCache, TableSource};
pub use table::{ColumnKind, ColumnMeta, Table};
pub use types::{
    BoxPlotSummary, ColumnMissingness, CompletenessBar, CompletenessChart, CompletenessSummary,
    CorrelationPair, DescriptiveStats, Diagnosis, Distribution, HeatmapMatrix, HistogramBin,
    OutlierRow, OutlierSet, TableSummary,
};
