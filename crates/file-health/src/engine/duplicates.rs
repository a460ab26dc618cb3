//! Exact duplicate rows.

use crate::error::Result;
use crate::table::Table;
use polars::prelude::*;

/// Rows equal (across every column) to an earlier row. The first occurrence
/// is never counted, so this is `rows - distinct rows`.
pub(crate) fn count_duplicates(table: &Table) -> Result<usize> {
    table.ensure_not_empty()?;

    let df = table.frame();
    let distinct = df
        .unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
        .height();
    Ok(df.height() - distinct)
}
