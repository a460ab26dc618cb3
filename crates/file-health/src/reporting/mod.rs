//! Report generation module.
//!
//! A [`HealthReport`] wraps a [`Diagnosis`](crate::types::Diagnosis) with
//! metadata about its source. It is used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - The plain-text terminal summary via [`render_text`]
//!
//! # Example
//!
//! ```rust,ignore
//! use file_health::reporting::{ReportGenerator, render_text};
//!
//! let report = ReportGenerator::build(&loaded, diagnosis, elapsed);
//! println!("{}", render_text(&report));
//!
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&report, "sales")?;
//! ```

mod generator;
mod text;

pub use generator::{HealthReport, ReportGenerator};
pub use text::render_text;
