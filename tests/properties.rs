//! Property-based tests for the ranking metrics.
//!
//! Checks shape, masking, bounds, monotonicity and determinism across
//! randomized batches with frequent score ties.

use ndarray::Array2;
use proptest::prelude::*;
use rankmetrics::{avg_precision_at, precision_at, recall_at, RankingOptions};

// ── Strategies ────────────────────────────────────────────────────────

/// One generated case: scores, labels, cutoffs and options.
type Case = (Array2<f32>, Array2<f32>, Vec<usize>, RankingOptions);

/// Scores come from a small grid so ties are common. With self-match on,
/// every row drops one random column and cutoffs stay within the rest.
fn arb_case() -> impl Strategy<Value = Case> {
    (1_usize..6, 1_usize..10, any::<bool>(), any::<bool>())
        .prop_filter("self-match needs a second column", |&(_, items, self_match, _)| {
            !self_match || items >= 2
        })
        .prop_flat_map(|(batch, items, self_match, at_r)| {
            let usable = if self_match { items - 1 } else { items };
            (
                prop::collection::vec(0_u8..5, batch * items),
                prop::collection::vec(prop::bool::weighted(0.3), batch * items),
                prop::collection::vec(1..=usable, 1..5),
                prop::collection::vec(0..items, batch),
            )
                .prop_map(move |(scores, labels, ks, self_columns)| {
                    let scores = Array2::from_shape_vec(
                        (batch, items),
                        scores.into_iter().map(|s| f32::from(s) / 4.0).collect(),
                    )
                    .unwrap();
                    let labels = Array2::from_shape_vec(
                        (batch, items),
                        labels.into_iter().map(|l| if l { 1.0 } else { 0.0 }).collect(),
                    )
                    .unwrap();
                    let mut opts = RankingOptions::new().with_at_r(at_r);
                    if self_match {
                        opts = opts.with_self_match(self_columns);
                    }
                    (scores, labels, ks, opts)
                })
        })
}

/// Columns each row can rank after self-exclusion.
fn usable_width(scores: &Array2<f32>, opts: &RankingOptions) -> usize {
    if opts.embeddings_come_from_same_source() {
        scores.ncols() - 1
    } else {
        scores.ncols()
    }
}

proptest! {
    #[test]
    fn output_shape_is_batch_by_cutoffs((scores, labels, ks, opts) in arb_case()) {
        let expected = (scores.nrows(), ks.len());
        let p = precision_at(ks.clone(), scores.view(), labels.view(), &opts).unwrap();
        let ap = avg_precision_at(ks.clone(), scores.view(), labels.view(), &opts).unwrap();
        let r = recall_at(ks, scores.view(), labels.view(), &opts).unwrap();
        prop_assert_eq!(p.shape(), expected);
        prop_assert_eq!(ap.shape(), expected);
        prop_assert_eq!(r.shape(), expected);
    }

    #[test]
    fn rows_without_relevant_items_are_fully_undefined((scores, labels, ks, opts) in arb_case()) {
        let ap = avg_precision_at(ks.clone(), scores.view(), labels.view(), &opts).unwrap();
        let p = precision_at(ks, scores.view(), labels.view(), &opts).unwrap();
        for (row, label_row) in labels.outer_iter().enumerate() {
            let has_relevant = label_row.iter().any(|&l| l == 1.0);
            for m in [&ap, &p] {
                prop_assert_eq!(
                    m.row(row).iter().all(Option::is_none),
                    !has_relevant
                );
                prop_assert_eq!(m.row(row).iter().all(Option::is_some), has_relevant);
            }
        }
    }

    #[test]
    fn defined_values_lie_in_unit_interval((scores, labels, ks, opts) in arb_case()) {
        let metrics = [
            precision_at(ks.clone(), scores.view(), labels.view(), &opts).unwrap(),
            avg_precision_at(ks.clone(), scores.view(), labels.view(), &opts).unwrap(),
            recall_at(ks, scores.view(), labels.view(), &opts).unwrap(),
        ];
        for m in &metrics {
            for v in m.values().iter().filter(|v| !v.is_nan()) {
                prop_assert!((0.0..=1.0 + 1e-9).contains(v), "value {} out of range", v);
            }
        }
    }

    #[test]
    fn precision_bounded_by_hits_over_k((scores, labels, _ks, opts) in arb_case()) {
        let ks: Vec<usize> = (1..=usable_width(&scores, &opts)).collect();
        let p = precision_at(ks.clone(), scores.view(), labels.view(), &opts).unwrap();
        for row in 0..scores.nrows() {
            let relevant: f64 = labels.row(row).iter().map(|&l| f64::from(l)).sum();
            for (col, &k) in ks.iter().enumerate() {
                if let Some(v) = p.get(row, col) {
                    prop_assert!(v <= relevant / k as f64 + 1e-9);
                }
            }
        }
    }

    #[test]
    fn ap_at_r_is_non_decreasing_in_k((scores, labels, _ks, opts) in arb_case()) {
        let ks: Vec<usize> = (1..=usable_width(&scores, &opts)).collect();
        let opts = opts.with_at_r(true);
        let ap = avg_precision_at(ks, scores.view(), labels.view(), &opts).unwrap();
        for row in 0..scores.nrows() {
            let values = ap.row(row);
            for pair in values.windows(2) {
                if let (Some(a), Some(b)) = (pair[0], pair[1]) {
                    prop_assert!(b + 1e-12 >= a);
                }
            }
        }
    }

    #[test]
    fn recall_reaches_one_at_full_depth((scores, labels, _ks, opts) in arb_case()) {
        let r = recall_at(usable_width(&scores, &opts), scores.view(), labels.view(), &opts).unwrap();
        for row in 0..scores.nrows() {
            // A relevant self column is never ranked, so recall tops out below one.
            let self_relevant = opts
                .self_match()
                .map_or(false, |cols| labels[[row, cols[row]]] == 1.0);
            if let Some(v) = r.get(row, 0) {
                if self_relevant {
                    prop_assert!(v < 1.0);
                } else {
                    prop_assert!((v - 1.0).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn repeated_calls_are_bit_identical((scores, labels, ks, opts) in arb_case()) {
        let first = avg_precision_at(ks.clone(), scores.view(), labels.view(), &opts).unwrap();
        let second = avg_precision_at(ks, scores.view(), labels.view(), &opts).unwrap();
        let bits = |m: &rankmetrics::MetricMatrix| m.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&first), bits(&second));
    }
}
