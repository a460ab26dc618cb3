//! Error types for the health check.
//!
//! Engine errors (`EmptyTable`, `InvalidColumn`, `InsufficientData`) are local,
//! recoverable conditions: the caller can pick another column or load another
//! file. Source errors describe why a table could not be loaded at all.
//!
//! Errors are serializable so they can be embedded in JSON output.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for loading and diagnosing tables.
#[derive(Error, Debug)]
pub enum DiagnosticError {
    /// The table has zero rows or zero columns.
    #[error("Table is empty ({rows} rows x {columns} columns)")]
    EmptyTable { rows: usize, columns: usize },

    /// The requested column is absent or not of the required kind.
    #[error("Invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// A statistic is undefined for the selected column.
    #[error("Not enough data in column '{column}': {reason}")]
    InsufficientData { column: String, reason: String },

    /// Local input file does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// Input exceeds the configured size ceiling.
    #[error("Input is too large ({size_bytes} bytes, limit is {limit_bytes} bytes)")]
    InputTooLarge { size_bytes: u64, limit_bytes: u64 },

    /// Remote URL cannot be turned into a CSV export.
    #[error("Invalid spreadsheet URL: {0}")]
    InvalidUrl(String),

    /// CSV content could not be parsed into a table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Remote export request failed.
    #[error("Remote source error: {0}")]
    Remote(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (only with the "remote" feature).
    #[cfg(feature = "remote")]
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DiagnosticError>,
    },
}

impl DiagnosticError {
    /// Shorthand for [`DiagnosticError::InvalidColumn`].
    pub fn invalid_column(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColumn {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`DiagnosticError::InsufficientData`].
    pub fn insufficient_data(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DiagnosticError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTable { .. } => "EMPTY_TABLE",
            Self::InvalidColumn { .. } => "INVALID_COLUMN",
            Self::InsufficientData { .. } => "INSUFFICIENT_DATA",
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::InputTooLarge { .. } => "INPUT_TOO_LARGE",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::MalformedInput(_) => "MALFORMED_INPUT",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "remote")]
            Self::Http(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the caller can recover by choosing another column or input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::EmptyTable { .. }
            | Self::InvalidColumn { .. }
            | Self::InsufficientData { .. }
            | Self::SourceNotFound(_)
            | Self::InputTooLarge { .. }
            | Self::InvalidUrl(_)
            | Self::MalformedInput(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl Serialize for DiagnosticError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DiagnosticError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for health check operations.
pub type Result<T> = std::result::Result<T, DiagnosticError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DiagnosticError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            DiagnosticError::EmptyTable { rows: 0, columns: 3 }.error_code(),
            "EMPTY_TABLE"
        );
        assert_eq!(
            DiagnosticError::invalid_column("age", "not numeric").error_code(),
            "INVALID_COLUMN"
        );
        assert_eq!(
            DiagnosticError::insufficient_data("age", "no values").error_code(),
            "INSUFFICIENT_DATA"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(DiagnosticError::invalid_column("x", "missing").is_recoverable());
        assert!(
            DiagnosticError::InputTooLarge {
                size_bytes: 10,
                limit_bytes: 5
            }
            .is_recoverable()
        );
        assert!(!DiagnosticError::Remote("boom".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = DiagnosticError::invalid_column("Price", "column is not numeric");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INVALID_COLUMN"));
        assert!(json.contains("Price"));
    }

    #[test]
    fn test_with_context() {
        let error = DiagnosticError::insufficient_data("score", "no non-missing values")
            .with_context("During outlier detection");
        assert!(error.to_string().contains("During outlier detection"));
        assert_eq!(error.error_code(), "INSUFFICIENT_DATA");
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_display_mentions_limits() {
        let error = DiagnosticError::InputTooLarge {
            size_bytes: 300,
            limit_bytes: 200,
        };
        let message = error.to_string();
        assert!(message.contains("300"));
        assert!(message.contains("200"));
    }
}
