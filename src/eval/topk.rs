//! Top-K extraction: per row, the highest-scoring candidates in descending score order.

use crate::error::Result;
use crate::eval::mask::relevant_counts;
use crate::eval::validate::{check_inputs, usable_items, Cutoffs};
use crate::eval::RankingOptions;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Aligned top-K window for every row of a batch.
///
/// All three arrays are `batch x window`; position `r` in a row holds the
/// candidate at rank `r + 1`.
#[derive(Debug, Clone)]
pub struct TopK {
    pub scores: Array2<f32>,
    /// Original column of each ranked candidate.
    pub indices: Array2<usize>,
    pub labels: Array2<f32>,
}

impl TopK {
    /// Ranks kept per row.
    pub fn window(&self) -> usize {
        self.scores.ncols()
    }
}

/// Select the top `max_k` candidates of every row.
///
/// With `self_match`, column `self_match[row]` is removed from its row before
/// ranking and the window shrinks to the remaining width if that is smaller
/// than `max_k`. Equal scores keep original column order. Expects input that
/// already passed `check_inputs`.
pub fn extract_topk(
    max_k: usize,
    scores: ArrayView2<'_, f32>,
    labels: ArrayView2<'_, f32>,
    self_match: Option<&[usize]>,
) -> TopK {
    let (batch, items) = scores.dim();
    let window = max_k.min(usable_items(items, self_match.is_some()));

    let ranked: Vec<Vec<usize>> = (0..batch)
        .into_par_iter()
        .map(|row| {
            let excluded = self_match.and_then(|cols| cols.get(row).copied());
            let candidates = candidate_columns(items, excluded);
            rank_row(scores.row(row), candidates, window)
        })
        .collect();

    let mut top_scores = Array2::<f32>::zeros((batch, window));
    let mut top_indices = Array2::<usize>::zeros((batch, window));
    let mut top_labels = Array2::<f32>::zeros((batch, window));
    for (row, columns) in ranked.iter().enumerate() {
        for (pos, &col) in columns.iter().enumerate() {
            top_scores[[row, pos]] = scores[[row, col]];
            top_indices[[row, pos]] = col;
            top_labels[[row, pos]] = labels[[row, col]];
        }
    }

    TopK {
        scores: top_scores,
        indices: top_indices,
        labels: top_labels,
    }
}

/// Columns still eligible for ranking once `excluded` is dropped.
pub fn candidate_columns(items: usize, excluded: Option<usize>) -> Vec<usize> {
    (0..items).filter(|&col| Some(col) != excluded).collect()
}

/// Higher score first; ties by lower column.
fn rank_row(row: ArrayView1<'_, f32>, mut columns: Vec<usize>, window: usize) -> Vec<usize> {
    let by_rank = |a: &usize, b: &usize| descending(row[*a], row[*b]).then(a.cmp(b));

    if window == 0 {
        return Vec::new();
    }
    if window < columns.len() {
        columns.select_nth_unstable_by(window - 1, &by_rank);
        columns.truncate(window);
    }
    columns.sort_unstable_by(&by_rank);
    columns
}

/// NaN sorts after every number so the order stays total.
fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Validated cutoffs, the top-K window and per-row relevant counts for one call.
pub(crate) struct RankedBatch {
    pub cutoffs: Vec<usize>,
    pub topk: TopK,
    pub relevant: Array1<f64>,
}

/// Shared front half of every metric: validate, then extract.
pub(crate) fn rank_batch(
    ks: Cutoffs,
    scores: ArrayView2<'_, f32>,
    labels: ArrayView2<'_, f32>,
    options: &RankingOptions,
) -> Result<RankedBatch> {
    let cutoffs = check_inputs(&ks, scores, labels, options.self_match())?;
    let max_k = cutoffs.iter().copied().max().unwrap_or(0);
    log::trace!(
        "Ranking batch {:?} at cutoffs {:?} (self-match: {})",
        scores.dim(),
        cutoffs,
        options.embeddings_come_from_same_source()
    );

    let extract_start = std::time::Instant::now();
    let topk = extract_topk(max_k, scores, labels, options.self_match());
    log::debug!(
        "Top-{} extraction over {} rows took {:?}",
        topk.window(),
        scores.nrows(),
        extract_start.elapsed()
    );

    Ok(RankedBatch {
        cutoffs,
        topk,
        relevant: relevant_counts(labels),
    })
}
