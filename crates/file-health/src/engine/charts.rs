//! Chart-ready data: histograms, box plots and the correlation heatmap.
//!
//! Nothing here draws; the structures are consumed by whatever renders them.

use super::statistics::{pearson, quantile_sorted, sorted_present};
use crate::error::{DiagnosticError, Result};
use crate::table::Table;
use crate::types::{BoxPlotSummary, Distribution, HeatmapMatrix, HistogramBin};

/// Equal-width histogram of sorted values. A single bin holds everything
/// when all values are equal.
pub(crate) fn build_histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: sorted.len(),
        }];
    }

    let bin_count = bins.max(1);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    for value in sorted {
        let index = (((value - min) / width) as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: min + (idx as f64 + 1.0) * width,
            count,
        })
        .collect()
}

/// Histogram and box plot of a numeric column.
pub(crate) fn distribution(table: &Table, column: &str, bins: usize) -> Result<Distribution> {
    table.ensure_not_empty()?;

    let values = table.numeric_values(column)?;
    let sorted = sorted_present(&values);
    let insufficient =
        || DiagnosticError::insufficient_data(column, "column has no non-missing numeric values");

    let box_plot = BoxPlotSummary {
        min: *sorted.first().ok_or_else(insufficient)?,
        q1: quantile_sorted(&sorted, 0.25).ok_or_else(insufficient)?,
        median: quantile_sorted(&sorted, 0.5).ok_or_else(insufficient)?,
        q3: quantile_sorted(&sorted, 0.75).ok_or_else(insufficient)?,
        max: *sorted.last().ok_or_else(insufficient)?,
    };

    Ok(Distribution {
        column: column.to_string(),
        histogram: build_histogram(&sorted, bins),
        box_plot,
    })
}

/// Pearson correlation matrix of the numeric columns, `None` when there are
/// fewer than two of them.
pub(crate) fn correlation_matrix(table: &Table) -> Result<Option<HeatmapMatrix>> {
    table.ensure_not_empty()?;

    let labels = table.numeric_column_names();
    if labels.len() < 2 {
        return Ok(None);
    }

    let columns = labels
        .iter()
        .map(|name| table.numeric_values(name))
        .collect::<Result<Vec<_>>>()?;

    let size = labels.len();
    let mut values = vec![vec![None; size]; size];
    for i in 0..size {
        values[i][i] = Some(1.0);
        for j in (i + 1)..size {
            let estimate = pearson(&columns[i], &columns[j]);
            values[i][j] = estimate;
            values[j][i] = estimate;
        }
    }

    Ok(Some(HeatmapMatrix { labels, values }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_histogram_counts_sum_to_len() {
        let sorted: Vec<f64> = (0..100).map(|v| v as f64).collect();
        let bins = build_histogram(&sorted, 24);

        assert_eq!(bins.len(), 24);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[0].start, 0.0);
        assert!((bins[23].end - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let bins = build_histogram(&[3.0, 3.0, 3.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
        assert!(build_histogram(&[], 10).is_empty());
    }

    #[test]
    fn test_distribution_box_plot() {
        let table = Table::new(df!["v" => [Some(5.0), Some(1.0), None, Some(3.0)]].unwrap()).unwrap();
        let dist = distribution(&table, "v", 4).unwrap();

        assert_eq!(dist.box_plot.min, 1.0);
        assert_eq!(dist.box_plot.median, 3.0);
        assert_eq!(dist.box_plot.max, 5.0);
        assert_eq!(dist.histogram.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_distribution_errors() {
        let table = Table::new(
            df!["t" => ["a", "b"], "v" => [None::<f64>, None]].unwrap(),
        )
        .unwrap();
        assert_eq!(
            distribution(&table, "t", 4).unwrap_err().error_code(),
            "INVALID_COLUMN"
        );
        assert_eq!(
            distribution(&table, "v", 4).unwrap_err().error_code(),
            "INSUFFICIENT_DATA"
        );
    }

    #[test]
    fn test_correlation_matrix() {
        let table = Table::new(
            df![
                "x" => [1.0, 2.0, 3.0, 4.0],
                "y" => [2.0, 4.0, 6.0, 8.0],
                "flat" => [1.0, 1.0, 1.0, 1.0],
                "name" => ["a", "b", "c", "d"],
            ]
            .unwrap(),
        )
        .unwrap();

        let matrix = correlation_matrix(&table).unwrap().unwrap();
        assert_eq!(matrix.labels, vec!["x", "y", "flat"]);
        assert!((matrix.get("x", "y").unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(matrix.get("flat", "flat"), Some(1.0));
        assert_eq!(matrix.get("x", "flat"), None);
    }

    #[test]
    fn test_correlation_needs_two_numeric_columns() {
        let table = Table::new(df!["x" => [1.0, 2.0], "name" => ["a", "b"]].unwrap()).unwrap();
        assert!(correlation_matrix(&table).unwrap().is_none());
    }
}
