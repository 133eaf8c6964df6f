//! Batch-level reduction of a metric matrix, skipping undefined rows.

use crate::eval::mask::MetricMatrix;

/// Mean of each cutoff column over the rows where it is defined.
/// A column with no defined row yields `None`.
pub fn column_means(metrics: &MetricMatrix) -> Vec<Option<f64>> {
    metrics
        .values()
        .columns()
        .into_iter()
        .map(|column| {
            let (sum, count) = column
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
            if count == 0 {
                None
            } else {
                Some(sum / count as f64)
            }
        })
        .collect()
}

/// Rows with at least one defined cell.
pub fn defined_rows(metrics: &MetricMatrix) -> usize {
    metrics
        .values()
        .rows()
        .into_iter()
        .filter(|row| row.iter().any(|v| !v.is_nan()))
        .count()
}
