//! Loading tables from CSV sources.
//!
//! A [`TableSource`] names where the CSV comes from: a local file, bytes
//! already in memory (an upload), or a spreadsheet link exported as CSV.
//! Every source is checked against the configured size ceiling before it is
//! parsed.

mod cache;
mod csv;
mod remote;

pub use cache::{SourceCache, fingerprint};
pub use csv::parse_csv;
pub use remote::{export_url, fetch_export};

use crate::config::HealthCheckConfig;
use crate::error::{DiagnosticError, Result, ResultExt};
use crate::table::Table;
use crate::utils::format_mib;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Where a CSV table comes from.
#[derive(Debug, Clone)]
pub enum TableSource {
    /// CSV file on disk.
    Local(PathBuf),
    /// CSV content already in memory, with a display name.
    Bytes { name: String, bytes: Vec<u8> },
    /// Spreadsheet link, downloaded as its CSV export.
    Remote(String),
}

/// A parsed table plus what is known about its origin.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub label: String,
    pub table: Arc<Table>,
    pub size_bytes: u64,
    /// SHA-256 of the raw bytes.
    pub fingerprint: String,
}

/// Reject inputs above `limit_bytes`.
pub(crate) fn check_size(size_bytes: u64, limit_bytes: u64) -> Result<()> {
    if size_bytes > limit_bytes {
        return Err(DiagnosticError::InputTooLarge {
            size_bytes,
            limit_bytes,
        });
    }
    Ok(())
}

/// Read at most `limit_bytes` from `reader`.
///
/// Stops one byte past the ceiling, so an oversized stream is rejected
/// without being buffered in full. The reported size is then a lower bound.
pub(crate) fn read_limited<R: Read>(reader: R, limit_bytes: u64) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    reader
        .take(limit_bytes.saturating_add(1))
        .read_to_end(&mut body)?;
    check_size(body.len() as u64, limit_bytes)?;
    Ok(body)
}

impl TableSource {
    pub fn local(path: impl AsRef<Path>) -> Self {
        TableSource::Local(path.as_ref().to_path_buf())
    }

    pub fn bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        TableSource::Bytes {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        TableSource::Remote(url.into())
    }

    /// Short name used in logs and reports.
    pub fn label(&self) -> String {
        match self {
            TableSource::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            TableSource::Bytes { name, .. } => name.clone(),
            TableSource::Remote(url) => url.clone(),
        }
    }

    /// Raw CSV bytes, after the size check.
    pub fn read_bytes(&self, config: &HealthCheckConfig) -> Result<Vec<u8>> {
        match self {
            TableSource::Local(path) => {
                let metadata = fs::metadata(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        DiagnosticError::SourceNotFound(path.display().to_string())
                    }
                    _ => DiagnosticError::Io(e),
                })?;
                if !metadata.is_file() {
                    return Err(DiagnosticError::SourceNotFound(path.display().to_string()));
                }
                check_size(metadata.len(), config.max_input_bytes)?;
                Ok(fs::read(path)?)
            }
            TableSource::Bytes { bytes, .. } => {
                check_size(bytes.len() as u64, config.max_input_bytes)?;
                Ok(bytes.clone())
            }
            TableSource::Remote(url) => fetch_export(url, config),
        }
    }

    /// Read and parse the source.
    pub fn load(&self, config: &HealthCheckConfig) -> Result<LoadedTable> {
        let bytes = self.read_bytes(config)?;
        let fingerprint = fingerprint(&bytes);
        let table = Arc::new(parse_table(&bytes).context(format!("Loading {}", self.label()))?);
        Ok(self.loaded(bytes.len() as u64, fingerprint, table))
    }

    /// Like [`load`](Self::load), reusing the parsed table when identical
    /// bytes were loaded before.
    pub fn load_cached(
        &self,
        config: &HealthCheckConfig,
        cache: &SourceCache,
    ) -> Result<LoadedTable> {
        let bytes = self.read_bytes(config)?;
        let fingerprint = fingerprint(&bytes);
        let table = cache
            .get_or_parse(&fingerprint, || parse_table(&bytes))
            .context(format!("Loading {}", self.label()))?;
        Ok(self.loaded(bytes.len() as u64, fingerprint, table))
    }

    fn loaded(&self, size_bytes: u64, fingerprint: String, table: Arc<Table>) -> LoadedTable {
        let label = self.label();
        info!(
            "File loaded: {} ({}, {} rows x {} columns)",
            label,
            format_mib(size_bytes),
            table.height(),
            table.width()
        );
        LoadedTable {
            label,
            table,
            size_bytes,
            fingerprint,
        }
    }
}

fn parse_table(bytes: &[u8]) -> Result<Table> {
    Table::new(parse_csv(bytes)?)
}
