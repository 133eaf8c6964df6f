//! Average Precision@K built on the per-rank precision curve.

use crate::error::Result;
use crate::eval::mask::MetricMatrix;
use crate::eval::precision::precision_curve;
use crate::eval::topk::rank_batch;
use crate::eval::validate::Cutoffs;
use crate::eval::RankingOptions;
use ndarray::{Array2, ArrayView2, Axis};

/// Average Precision at each requested cutoff.
///
/// Precision only counts at ranks holding a relevant item; the sum of those
/// precisions over the first `k` ranks is divided by:
/// - `at_r = false`: the row's relevant count clamped to `1..=k`
/// - `at_r = true`: the row's relevant count as is
///
/// Relevant counts come from the full label row, not only the top-K window.
/// Rows without relevant items are undefined in both modes.
pub fn avg_precision_at(
    ks: impl Into<Cutoffs>,
    scores: ArrayView2<'_, f32>,
    labels: ArrayView2<'_, f32>,
    options: &RankingOptions,
) -> Result<MetricMatrix> {
    let ranked = rank_batch(ks.into(), scores, labels, options)?;

    let curve_start = std::time::Instant::now();
    let totals = cumulative_rel_precision(&precision_curve(&ranked.topk), &ranked.topk.labels);
    log::debug!("AP precision curve took {:?}", curve_start.elapsed());

    let mut out = MetricMatrix::placeholder(scores.nrows(), ranked.cutoffs.len());
    let mut values = out.values_mut();
    for (col, &k) in ranked.cutoffs.iter().enumerate() {
        let total_at_k = totals.column(k - 1);
        for (row, cell) in values.column_mut(col).iter_mut().enumerate() {
            let relevant = ranked.relevant[row];
            let normalize = if options.at_r {
                relevant
            } else {
                relevant.clamp(1.0, k as f64)
            };
            *cell = total_at_k[row] / normalize;
        }
    }

    Ok(out.mask_undefined(&ranked.relevant))
}

/// Running sum over ranks of precision at the ranks whose label is relevant.
fn cumulative_rel_precision(precisions: &Array2<f64>, labels: &Array2<f32>) -> Array2<f64> {
    let mut totals = precisions * &labels.mapv(f64::from);
    totals.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);
    totals
}
