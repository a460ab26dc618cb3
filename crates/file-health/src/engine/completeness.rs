//! Completeness and missingness of a table.

use crate::error::{DiagnosticError, Result};
use crate::table::Table;
use crate::types::{
    ColumnMissingness, CompletenessBar, CompletenessChart, CompletenessSummary, TableSummary,
};
use crate::utils::percentage;

/// Completeness summary plus the per-column missingness table.
pub(crate) fn summarize(table: &Table) -> Result<TableSummary> {
    table.ensure_not_empty()?;

    let (rows, columns) = table.shape();
    let total_cells = table.total_cells();
    let total_missing = table.total_missing();
    let completeness_pct = percentage(total_cells - total_missing, total_cells).ok_or(
        DiagnosticError::EmptyTable { rows, columns },
    )?;

    Ok(TableSummary {
        completeness: CompletenessSummary {
            rows,
            columns,
            total_cells,
            total_missing,
            completeness_pct,
        },
        missingness: missingness(table),
    })
}

/// One row per column, by descending missing percentage. `sort_by` is stable,
/// so equal percentages keep their column order.
fn missingness(table: &Table) -> Vec<ColumnMissingness> {
    let rows = table.height();
    let mut per_column: Vec<ColumnMissingness> = table
        .columns()
        .iter()
        .map(|col| ColumnMissingness {
            column: col.name.clone(),
            missing_count: col.missing,
            missing_pct: percentage(col.missing, rows).unwrap_or(0.0),
        })
        .collect();

    per_column.sort_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct));
    per_column
}

/// Presence rate per column, ascending, against a reliability threshold.
pub(crate) fn completeness_chart(table: &Table, threshold_pct: f64) -> Result<CompletenessChart> {
    table.ensure_not_empty()?;

    let rows = table.height();
    let mut bars: Vec<CompletenessBar> = table
        .columns()
        .iter()
        .map(|col| CompletenessBar {
            column: col.name.clone(),
            completeness_pct: percentage(rows - col.missing, rows).unwrap_or(0.0),
        })
        .collect();
    bars.sort_by(|a, b| a.completeness_pct.total_cmp(&b.completeness_pct));

    let unreliable_columns = bars
        .iter()
        .filter(|bar| bar.completeness_pct < threshold_pct)
        .map(|bar| bar.column.clone())
        .collect();

    Ok(CompletenessChart {
        bars,
        threshold_pct,
        unreliable_columns,
    })
}
