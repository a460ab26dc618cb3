//! CSV parsing with fallback strategies.

use crate::error::{DiagnosticError, Result};
use crate::utils::NULL_MARKERS;
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Rows used for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

fn null_values() -> NullValues {
    NullValues::AllColumns(NULL_MARKERS.iter().map(|marker| (*marker).into()).collect())
}

fn read_with(
    content: Vec<u8>,
    parse_options: CsvParseOptions,
    infer_rows: Option<usize>,
) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(infer_rows)
        .with_has_header(true)
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(content))
        .finish()
}

/// Parse CSV bytes into a DataFrame.
///
/// Tries standard quoted parsing first, then parsing without quote handling,
/// then a pass over cleaned content (collapsed doubled quotes, blank lines
/// removed). The first three infer the schema from the leading rows; the last
/// scans every row, so a value whose type only changes late in the file still
/// loads. Fails with [`DiagnosticError::MalformedInput`] when every strategy
/// fails.
pub fn parse_csv(bytes: &[u8]) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DiagnosticError::MalformedInput(
            "input is empty".to_string(),
        ));
    }

    // Strategy 1: Standard loading with quote handling
    let quoted = CsvParseOptions::default()
        .with_quote_char(Some(b'"'))
        .with_null_values(Some(null_values()));
    match read_with(bytes.to_vec(), quoted, Some(INFER_SCHEMA_ROWS)) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Without quote handling
    let unquoted = CsvParseOptions::default()
        .with_quote_char(None)
        .with_null_values(Some(null_values()));
    match read_with(bytes.to_vec(), unquoted, Some(INFER_SCHEMA_ROWS)) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading without quotes failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let cleaned = clean_csv_content(&String::from_utf8_lossy(bytes));
    let options = CsvParseOptions::default().with_null_values(Some(null_values()));
    match read_with(cleaned.into_bytes(), options, Some(INFER_SCHEMA_ROWS)) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading cleaned content failed: {}", e),
    }

    // Strategy 4: Infer the schema from every row
    let full_scan = CsvParseOptions::default()
        .with_quote_char(Some(b'"'))
        .with_null_values(Some(null_values()));
    read_with(bytes.to_vec(), full_scan, None)
        .map_err(|e| DiagnosticError::MalformedInput(e.to_string()))
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::is_numeric_dtype;

    #[test]
    fn test_parse_infers_types() {
        let df = parse_csv(b"name,age,score\nAlice,31,1.5\nBob,45,2.5\n").unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_null_markers_become_missing() {
        let df = parse_csv(b"a,b\n1,x\nNA,N/A\n3,\nnull,z\n").unwrap();
        assert_eq!(df.column("a").unwrap().null_count(), 2);
        assert_eq!(df.column("b").unwrap().null_count(), 2);
        assert!(is_numeric_dtype(df.column("a").unwrap().dtype()));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = parse_csv(b"  \n ").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_INPUT");
    }

    fn late_change(last: &str) -> Vec<u8> {
        let mut content = String::from("id,v\n");
        for i in 0..150 {
            content.push_str(&format!("{},{}\n", i, i));
        }
        content.push_str(&format!("150,{}\n", last));
        content.into_bytes()
    }

    #[test]
    fn test_type_change_after_inference_window() {
        let df = parse_csv(&late_change("2.5")).unwrap();
        assert_eq!(df.height(), 151);
        assert_eq!(df.column("v").unwrap().dtype(), &DataType::Float64);

        let df = parse_csv(&late_change("abc")).unwrap();
        assert_eq!(df.height(), 151);
        assert_eq!(df.column("v").unwrap().dtype(), &DataType::String);
        assert!(is_numeric_dtype(df.column("id").unwrap().dtype()));
    }

    #[test]
    fn test_clean_csv_content() {
        let cleaned = clean_csv_content("a,b\n\n\"\"x\"\",1\n   \n");
        assert_eq!(cleaned, "a,b\n\"x\",1");
    }
}
