use crate::error::Result;
use crate::source::LoadedTable;
use crate::types::Diagnosis;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// A diagnosis together with where it came from.
///
/// Used for both JSON output (`--json`) and file writing (`--emit-report`).
/// The diagnosis fields are flattened into the top level of the JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// RFC 3339 timestamp of report creation
    pub generated_at: String,
    /// Source label (file name or URL)
    pub source: String,
    /// Size of the raw input in bytes
    pub size_bytes: u64,
    /// SHA-256 of the raw input
    pub fingerprint: String,
    /// Time spent diagnosing, in milliseconds
    pub duration_ms: u64,
    #[serde(flatten)]
    pub diagnosis: Diagnosis,
}

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Wrap a diagnosis with its source metadata.
    pub fn build(loaded: &LoadedTable, diagnosis: Diagnosis, elapsed: Duration) -> HealthReport {
        HealthReport {
            generated_at: Local::now().to_rfc3339(),
            source: loaded.label.clone(),
            size_bytes: loaded.size_bytes,
            fingerprint: loaded.fingerprint.clone(),
            duration_ms: elapsed.as_millis() as u64,
            diagnosis,
        }
    }

    /// Write a report to `<output_dir>/<base_name>_report.json`.
    pub fn write_report_to_file(&self, report: &HealthReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
