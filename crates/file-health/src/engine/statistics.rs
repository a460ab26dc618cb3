//! Descriptive statistics over numeric columns.

use crate::types::DescriptiveStats;
use anofox_statistics::correlation;

/// Non-missing values of a column, sorted ascending.
pub(crate) fn sorted_present(values: &[Option<f64>]) -> Vec<f64> {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);
    present
}

/// Quantile of sorted values using linear interpolation between the two
/// nearest ranks. `None` for an empty slice.
pub(crate) fn quantile_sorted(values: &[f64], quantile: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let pos = quantile.clamp(0.0, 1.0) * (values.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(values[lower]);
    }
    let weight = pos - lower as f64;
    Some(values[lower] + (values[upper] - values[lower]) * weight)
}

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1), `None` with fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    Some(variance.sqrt())
}

/// Fewest complete pairs a correlation is reported for.
const MIN_CORRELATION_PAIRS: usize = 3;

/// Pearson correlation over pairwise-complete observations.
///
/// `None` with fewer than three complete pairs or when the estimate is
/// undefined (either side constant).
pub(crate) fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();

    if xs.len() < MIN_CORRELATION_PAIRS {
        return None;
    }

    correlation::pearson(&xs, &ys, None)
        .ok()
        .map(|result| result.estimate)
        .filter(|estimate| estimate.is_finite())
        .map(|estimate| estimate.clamp(-1.0, 1.0))
}

/// Count, mean, std, min, quartiles and max of one column.
pub(crate) fn describe_column(column: &str, values: &[Option<f64>]) -> DescriptiveStats {
    let sorted = sorted_present(values);

    DescriptiveStats {
        column: column.to_string(),
        count: sorted.len(),
        mean: mean(&sorted),
        std: sample_std(&sorted),
        min: sorted.first().copied(),
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}
