//! Input validation: canonical cutoffs plus shape and value checks on score/label matrices.

use crate::error::{RankmetricsError, Result};
use ndarray::{Array1, ArrayView2};

/// Cutoffs exactly as the caller supplied them: order and duplicates are kept,
/// and each one becomes its own output column.
///
/// Values stay signed until validation so that `0` or `-3` surface as
/// `InvalidCutoff` rather than being impossible to express. `i128` holds every
/// supported input type exactly, so errors report the cutoff as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cutoffs(Vec<i128>);

impl Cutoffs {
    pub fn new(values: Vec<i64>) -> Self {
        Self(values.into_iter().map(i128::from).collect())
    }

    pub fn as_slice(&self) -> &[i128] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

macro_rules! impl_cutoffs_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Cutoffs {
            fn from(k: $t) -> Self {
                Self(vec![k as i128])
            }
        }

        impl From<Vec<$t>> for Cutoffs {
            fn from(ks: Vec<$t>) -> Self {
                Self(ks.into_iter().map(|k| k as i128).collect())
            }
        }

        impl From<&[$t]> for Cutoffs {
            fn from(ks: &[$t]) -> Self {
                Self(ks.iter().map(|&k| k as i128).collect())
            }
        }

        impl<const N: usize> From<[$t; N]> for Cutoffs {
            fn from(ks: [$t; N]) -> Self {
                Self(ks.into_iter().map(|k| k as i128).collect())
            }
        }
    )*};
}

impl_cutoffs_from!(i32, i64, u32, usize);

impl From<Array1<i64>> for Cutoffs {
    fn from(ks: Array1<i64>) -> Self {
        Self(ks.iter().map(|&k| i128::from(k)).collect())
    }
}

/// Check cutoffs, matrices and self-match columns before any row is ranked.
///
/// Returns the cutoffs as `usize`, in caller order. Checks run in a fixed order
/// (shape, self-match, cutoffs, labels, scores) so the first reported error is
/// stable for a given input.
pub fn check_inputs(
    ks: &Cutoffs,
    scores: ArrayView2<'_, f32>,
    labels: ArrayView2<'_, f32>,
    self_match: Option<&[usize]>,
) -> Result<Vec<usize>> {
    if scores.dim() != labels.dim() {
        return Err(RankmetricsError::ShapeMismatch {
            scores: scores.dim(),
            labels: labels.dim(),
        });
    }
    let (batch, items) = scores.dim();

    if let Some(columns) = self_match {
        check_self_match(columns, batch, items)?;
    }

    let available = usable_items(items, self_match.is_some());
    let cutoffs = check_cutoffs(ks, available)?;

    if let Some(((row, col), &value)) = labels
        .indexed_iter()
        .find(|(_, v)| **v != 0.0 && **v != 1.0)
    {
        return Err(RankmetricsError::InvalidLabel { row, col, value });
    }

    if let Some(((row, col), _)) = scores.indexed_iter().find(|(_, v)| v.is_nan()) {
        return Err(RankmetricsError::InvalidScore { row, col });
    }

    Ok(cutoffs)
}

/// Items left per row once the self-match column (if any) is removed.
pub fn usable_items(items: usize, excludes_self: bool) -> usize {
    if excludes_self {
        items.saturating_sub(1)
    } else {
        items
    }
}

fn check_cutoffs(ks: &Cutoffs, available: usize) -> Result<Vec<usize>> {
    if ks.is_empty() {
        return Err(RankmetricsError::EmptyCutoffs);
    }
    ks.as_slice()
        .iter()
        .map(|&k| match usize::try_from(k) {
            Ok(k) if k >= 1 && k <= available => Ok(k),
            _ => Err(RankmetricsError::InvalidCutoff {
                cutoff: k,
                available,
            }),
        })
        .collect()
}

fn check_self_match(columns: &[usize], batch: usize, items: usize) -> Result<()> {
    if columns.len() != batch {
        return Err(RankmetricsError::InvalidSelfMatch(format!(
            "expected one column per row ({}), got {}",
            batch,
            columns.len()
        )));
    }
    if let Some((row, &col)) = columns.iter().enumerate().find(|(_, c)| **c >= items) {
        return Err(RankmetricsError::InvalidSelfMatch(format!(
            "row {} excludes column {} but rows have {} items",
            row, col, items
        )));
    }
    Ok(())
}
