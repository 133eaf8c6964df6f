//! Rank statistics: Precision@K and Recall@K from one cumulative pass over the top-K window.

use crate::error::Result;
use crate::eval::mask::{project_column, MetricMatrix};
use crate::eval::topk::{rank_batch, TopK};
use crate::eval::validate::Cutoffs;
use crate::eval::RankingOptions;
use ndarray::{Array2, ArrayView2, Axis};

/// Running count of relevant items at each rank: `hits[row, r]` counts labels
/// equal to 1 among the first `r + 1` ranked candidates.
pub fn cumulative_hits(topk: &TopK) -> Array2<f64> {
    let mut hits = topk.labels.mapv(f64::from);
    hits.accumulate_axis_inplace(Axis(1), |&prev, curr| *curr += prev);
    hits
}

/// Precision at every rank `1..=window` for each row.
pub fn precision_curve(topk: &TopK) -> Array2<f64> {
    let mut curve = cumulative_hits(topk);
    for (r, mut column) in curve.axis_iter_mut(Axis(1)).enumerate() {
        column /= (r + 1) as f64;
    }
    curve
}

/// Precision@K for each requested cutoff.
///
/// Column `j` holds, per row, the fraction of the top `ks[j]` candidates that
/// are relevant. Rows without any relevant item are undefined.
pub fn precision_at(
    ks: impl Into<Cutoffs>,
    scores: ArrayView2<'_, f32>,
    labels: ArrayView2<'_, f32>,
    options: &RankingOptions,
) -> Result<MetricMatrix> {
    let ranked = rank_batch(ks.into(), scores, labels, options)?;
    let curve = precision_curve(&ranked.topk);

    let mut out = MetricMatrix::placeholder(scores.nrows(), ranked.cutoffs.len());
    for (col, &k) in ranked.cutoffs.iter().enumerate() {
        project_column(&mut out, col, curve.column(k - 1));
    }
    Ok(out.mask_undefined(&ranked.relevant))
}

/// Recall@K for each requested cutoff: relevant items in the top `k` over the
/// row's total relevant count.
pub fn recall_at(
    ks: impl Into<Cutoffs>,
    scores: ArrayView2<'_, f32>,
    labels: ArrayView2<'_, f32>,
    options: &RankingOptions,
) -> Result<MetricMatrix> {
    let ranked = rank_batch(ks.into(), scores, labels, options)?;
    let hits = cumulative_hits(&ranked.topk);

    let mut out = MetricMatrix::placeholder(scores.nrows(), ranked.cutoffs.len());
    for (col, &k) in ranked.cutoffs.iter().enumerate() {
        let recall = &hits.column(k - 1) / &ranked.relevant;
        project_column(&mut out, col, recall.view());
    }
    Ok(out.mask_undefined(&ranked.relevant))
}
