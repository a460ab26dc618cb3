//! Human-readable rendering of a [`HealthReport`].

use super::HealthReport;
use crate::engine::{CompletenessSeverity, DuplicateSeverity};
use crate::utils::{display_pct, format_mib, truncate_str};
use std::fmt;

/// Number of correlation pairs listed.
const TOP_CORRELATIONS: usize = 5;

/// Outlier rows listed before the list is cut short.
const MAX_OUTLIER_ROWS: usize = 10;

/// Render a report as plain text for the terminal.
pub fn render_text(report: &HealthReport) -> String {
    TextReport(report).to_string()
}

struct TextReport<'a>(&'a HealthReport);

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(40))
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let diagnosis = &report.diagnosis;
        let completeness = &diagnosis.summary.completeness;

        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "FILE HEALTH CHECK: {}", report.source)?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f)?;

        section(f, "KEY INDICATORS")?;
        writeln!(f, "  Size: {}", format_mib(report.size_bytes))?;
        writeln!(f, "  Rows: {}", completeness.rows)?;
        writeln!(f, "  Columns: {}", completeness.columns)?;
        writeln!(f, "  Duplicate rows: {}", diagnosis.duplicate_count)?;
        writeln!(
            f,
            "  Completeness: {:.2}%",
            display_pct(completeness.completeness_pct)
        )?;
        writeln!(f)?;

        section(f, "VERDICT")?;
        match diagnosis.severity.duplicates {
            DuplicateSeverity::Ok => writeln!(f, "  [OK] No duplicate rows.")?,
            DuplicateSeverity::Warning => writeln!(
                f,
                "  [WARNING] {} duplicate rows found. Review before analysis.",
                diagnosis.duplicate_count
            )?,
        }
        let tag = match diagnosis.severity.completeness {
            CompletenessSeverity::Good => "OK",
            CompletenessSeverity::Warning => "WARNING",
            CompletenessSeverity::Critical => "CRITICAL",
        };
        writeln!(f, "  [{}] {}", tag, diagnosis.severity.completeness.advice())?;
        writeln!(f)?;

        section(f, "MISSING VALUES")?;
        writeln!(f, "  {:<30} {:>10} {:>12}", "Column", "Missing", "Missing %")?;
        for row in &diagnosis.summary.missingness {
            writeln!(
                f,
                "  {:<30} {:>10} {:>11.2}%",
                truncate_str(&row.column, 29),
                row.missing_count,
                display_pct(row.missing_pct)
            )?;
        }
        writeln!(f)?;

        section(f, "NUMERIC STATISTICS")?;
        if diagnosis.numeric_stats.is_empty() {
            writeln!(f, "  No numeric columns.")?;
        } else {
            writeln!(
                f,
                "  {:<20} {:>7} {:>11} {:>11} {:>11} {:>11} {:>11}",
                "Column", "Count", "Mean", "Std", "Min", "Median", "Max"
            )?;
            for stats in &diagnosis.numeric_stats {
                writeln!(
                    f,
                    "  {:<20} {:>7} {:>11} {:>11} {:>11} {:>11} {:>11}",
                    truncate_str(&stats.column, 19),
                    stats.count,
                    number(stats.mean),
                    number(stats.std),
                    number(stats.min),
                    number(stats.median),
                    number(stats.max)
                )?;
            }
        }
        writeln!(f)?;

        section(f, "OUTLIERS")?;
        match diagnosis.selected_outliers() {
            Some(set) => {
                writeln!(
                    f,
                    "  Column '{}': {} outliers outside [{:.2}, {:.2}] (IQR {:.2})",
                    set.column,
                    set.len(),
                    set.lower_bound,
                    set.upper_bound,
                    set.iqr
                )?;
                for row in set.rows.iter().take(MAX_OUTLIER_ROWS) {
                    writeln!(f, "    row {:>6}: {}", row.index, row.value)?;
                }
                if set.len() > MAX_OUTLIER_ROWS {
                    writeln!(f, "    ... and {} more", set.len() - MAX_OUTLIER_ROWS)?;
                }
            }
            None => writeln!(f, "  No numeric column with values to inspect.")?,
        }
        writeln!(f)?;

        let chart = &diagnosis.completeness_chart;
        section(f, "UNRELIABLE COLUMNS")?;
        if chart.unreliable_columns.is_empty() {
            writeln!(
                f,
                "  Every column is at least {:.0}% complete.",
                chart.threshold_pct
            )?;
        } else {
            for bar in chart
                .bars
                .iter()
                .filter(|bar| bar.completeness_pct < chart.threshold_pct)
            {
                writeln!(
                    f,
                    "  {:<30} {:>6.2}%",
                    truncate_str(&bar.column, 29),
                    display_pct(bar.completeness_pct)
                )?;
            }
        }

        if let Some(matrix) = &diagnosis.correlations {
            let pairs = matrix.top_pairs(TOP_CORRELATIONS);
            if !pairs.is_empty() {
                writeln!(f)?;
                section(f, "STRONGEST CORRELATIONS")?;
                for pair in pairs {
                    writeln!(
                        f,
                        "  {} / {}: {:+.2}",
                        pair.column_x, pair.column_y, pair.estimate
                    )?;
                }
            }
        }

        Ok(())
    }
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}
