//! Configuration types for the health check.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One mebibyte in bytes.
pub const MIB: u64 = 1024 * 1024;

/// Default ceiling for a single input (200 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 200 * MIB;

/// Configuration for loading and diagnosing a table.
///
/// Use [`HealthCheckConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use file_health::config::HealthCheckConfig;
///
/// let config = HealthCheckConfig::builder()
///     .max_input_mib(50)
///     .histogram_bins(30)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    /// Maximum accepted input size in bytes.
    /// Default: 200 MiB
    pub max_input_bytes: u64,

    /// Completeness (in percent) at or above which a table is "good".
    /// Default: 95.0
    pub good_completeness_pct: f64,

    /// Completeness (in percent) at or above which a table is a "warning".
    /// Anything below is "critical".
    /// Default: 85.0
    pub warning_completeness_pct: f64,

    /// Per-column completeness (in percent) under which a column is flagged
    /// as unreliable in the completeness chart.
    /// Default: 80.0
    pub reliability_threshold_pct: f64,

    /// Multiplier applied to the IQR to build outlier fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Number of equal-width histogram bins.
    /// Default: 24
    pub histogram_bins: usize,

    /// Timeout for remote export downloads, in seconds.
    /// Default: 30
    pub remote_timeout_secs: u64,

    /// Output directory for written reports.
    /// Default: "output"
    pub output_dir: PathBuf,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            good_completeness_pct: 95.0,
            warning_completeness_pct: 85.0,
            reliability_threshold_pct: 80.0,
            iqr_multiplier: 1.5,
            histogram_bins: 24,
            remote_timeout_secs: 30,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl HealthCheckConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HealthCheckConfigBuilder {
        HealthCheckConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_input_bytes == 0 {
            return Err(ConfigValidationError::InvalidSizeLimit);
        }

        for (field, value) in [
            ("good_completeness_pct", self.good_completeness_pct),
            ("warning_completeness_pct", self.warning_completeness_pct),
            ("reliability_threshold_pct", self.reliability_threshold_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigValidationError::InvalidPercentage {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.warning_completeness_pct > self.good_completeness_pct {
            return Err(ConfigValidationError::ThresholdOrder {
                warning: self.warning_completeness_pct,
                good: self.good_completeness_pct,
            });
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if self.histogram_bins == 0 {
            return Err(ConfigValidationError::InvalidHistogramBins(
                self.histogram_bins,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid size limit: must be greater than zero")]
    InvalidSizeLimit,

    #[error("Invalid percentage for '{field}': {value} (must be between 0 and 100)")]
    InvalidPercentage { field: String, value: f64 },

    #[error("Warning threshold {warning} must not exceed good threshold {good}")]
    ThresholdOrder { warning: f64, good: f64 },

    #[error("Invalid IQR multiplier: {0} (must be a positive number)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid histogram bins: {0} (must be at least 1)")]
    InvalidHistogramBins(usize),
}

/// Builder for [`HealthCheckConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct HealthCheckConfigBuilder {
    max_input_bytes: Option<u64>,
    good_completeness_pct: Option<f64>,
    warning_completeness_pct: Option<f64>,
    reliability_threshold_pct: Option<f64>,
    iqr_multiplier: Option<f64>,
    histogram_bins: Option<usize>,
    remote_timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
}

impl HealthCheckConfigBuilder {
    /// Set the maximum accepted input size in bytes.
    pub fn max_input_bytes(mut self, bytes: u64) -> Self {
        self.max_input_bytes = Some(bytes);
        self
    }

    /// Set the maximum accepted input size in mebibytes.
    pub fn max_input_mib(mut self, mib: u64) -> Self {
        self.max_input_bytes = Some(mib.saturating_mul(MIB));
        self
    }

    /// Set the completeness thresholds (percent) for "good" and "warning".
    ///
    /// # Arguments
    /// * `good` - at or above this value the table is good (e.g., 95.0)
    /// * `warning` - at or above this value (and below `good`) it is a warning
    pub fn completeness_thresholds(mut self, good: f64, warning: f64) -> Self {
        self.good_completeness_pct = Some(good);
        self.warning_completeness_pct = Some(warning);
        self
    }

    /// Set the per-column reliability threshold used by the completeness chart.
    pub fn reliability_threshold(mut self, pct: f64) -> Self {
        self.reliability_threshold_pct = Some(pct);
        self
    }

    /// Set the IQR multiplier for outlier fences.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the remote download timeout in seconds.
    pub fn remote_timeout_secs(mut self, secs: u64) -> Self {
        self.remote_timeout_secs = Some(secs);
        self
    }

    /// Set the output directory for reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `HealthCheckConfig` or an error if validation fails.
    pub fn build(self) -> Result<HealthCheckConfig, ConfigValidationError> {
        let defaults = HealthCheckConfig::default();
        let config = HealthCheckConfig {
            max_input_bytes: self.max_input_bytes.unwrap_or(defaults.max_input_bytes),
            good_completeness_pct: self
                .good_completeness_pct
                .unwrap_or(defaults.good_completeness_pct),
            warning_completeness_pct: self
                .warning_completeness_pct
                .unwrap_or(defaults.warning_completeness_pct),
            reliability_threshold_pct: self
                .reliability_threshold_pct
                .unwrap_or(defaults.reliability_threshold_pct),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            remote_timeout_secs: self
                .remote_timeout_secs
                .unwrap_or(defaults.remote_timeout_secs),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HealthCheckConfig::default();
        assert_eq!(config.max_input_bytes, 200 * 1024 * 1024);
        assert_eq!(config.good_completeness_pct, 95.0);
        assert_eq!(config.warning_completeness_pct, 85.0);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.histogram_bins, 24);
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = HealthCheckConfig::builder().build().unwrap();
        assert_eq!(config, HealthCheckConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = HealthCheckConfig::builder()
            .max_input_mib(10)
            .completeness_thresholds(99.0, 90.0)
            .iqr_multiplier(3.0)
            .histogram_bins(10)
            .build()
            .unwrap();

        assert_eq!(config.max_input_bytes, 10 * MIB);
        assert_eq!(config.good_completeness_pct, 99.0);
        assert_eq!(config.warning_completeness_pct, 90.0);
        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.histogram_bins, 10);
    }

    #[test]
    fn test_validation_percentage_out_of_range() {
        let result = HealthCheckConfig::builder()
            .completeness_thresholds(120.0, 85.0)
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidPercentage { .. }
        ));
    }

    #[test]
    fn test_validation_threshold_order() {
        let result = HealthCheckConfig::builder()
            .completeness_thresholds(80.0, 90.0)
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ThresholdOrder { .. }
        ));
    }

    #[test]
    fn test_validation_zero_bins_and_size() {
        assert!(matches!(
            HealthCheckConfig::builder().histogram_bins(0).build(),
            Err(ConfigValidationError::InvalidHistogramBins(0))
        ));
        assert!(matches!(
            HealthCheckConfig::builder().max_input_bytes(0).build(),
            Err(ConfigValidationError::InvalidSizeLimit)
        ));
        assert!(matches!(
            HealthCheckConfig::builder().iqr_multiplier(f64::NAN).build(),
            Err(ConfigValidationError::InvalidIqrMultiplier(_))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "max_input_bytes": 1048576,
            "good_completeness_pct": 97.5,
            "warning_completeness_pct": 80.0,
            "reliability_threshold_pct": 70.0,
            "iqr_multiplier": 2.0,
            "histogram_bins": 12,
            "remote_timeout_secs": 5,
            "output_dir": "reports"
        }"#;

        let config: HealthCheckConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_input_bytes, MIB);
        assert_eq!(config.good_completeness_pct, 97.5);
        assert_eq!(config.output_dir.to_str().unwrap(), "reports");
    }
}
