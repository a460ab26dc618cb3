//! Remote spreadsheet CSV exports.
//!
//! A shared spreadsheet link such as
//! `https://docs.google.com/spreadsheets/d/<id>/edit#gid=0` is rewritten to
//! its CSV export `https://docs.google.com/spreadsheets/d/<id>/export?format=csv&gid=0`
//! and downloaded with a blocking HTTP client.

use crate::config::HealthCheckConfig;
use crate::error::{DiagnosticError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static EDIT_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>https?://.+?)/edit(?P<rest>.*)$").expect("valid edit-url regex")
});

static GID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#?&]gid=(?P<gid>\d+)").expect("valid gid regex"));

/// Turn a spreadsheet link into its CSV export URL.
///
/// Links already pointing at a CSV export are returned unchanged. Anything
/// without an `/edit` segment fails with [`DiagnosticError::InvalidUrl`].
pub fn export_url(url: &str) -> Result<String> {
    let url = url.trim();

    if url.contains("/export") && url.contains("format=csv") {
        return Ok(url.to_string());
    }

    let captures = EDIT_URL
        .captures(url)
        .ok_or_else(|| DiagnosticError::InvalidUrl(url.to_string()))?;

    let mut export = format!("{}/export?format=csv", &captures["prefix"]);
    if let Some(gid) = GID.captures(&captures["rest"]) {
        export.push_str("&gid=");
        export.push_str(&gid["gid"]);
    }
    Ok(export)
}

/// Download the CSV export of a spreadsheet link.
#[cfg(feature = "remote")]
pub fn fetch_export(url: &str, config: &HealthCheckConfig) -> Result<Vec<u8>> {
    use super::{check_size, read_limited};
    use reqwest::blocking::Client;
    use std::time::Duration;
    use tracing::info;

    let export = export_url(url)?;
    info!("Fetching remote export: {}", export);

    let client = Client::builder()
        .timeout(Duration::from_secs(config.remote_timeout_secs))
        .build()?;

    let response = client.get(&export).send()?;
    if !response.status().is_success() {
        return Err(DiagnosticError::Remote(format!(
            "{} answered {}",
            export,
            response.status()
        )));
    }

    if let Some(length) = response.content_length() {
        check_size(length, config.max_input_bytes)?;
    }

    // Content-Length may be absent or wrong; the read itself is bounded too.
    read_limited(response, config.max_input_bytes)
}

/// Fallback when remote support is not compiled in.
#[cfg(not(feature = "remote"))]
pub fn fetch_export(url: &str, _config: &HealthCheckConfig) -> Result<Vec<u8>> {
    export_url(url)?;
    Err(DiagnosticError::Remote(
        "remote sources need the \"remote\" feature".to_string(),
    ))
}
