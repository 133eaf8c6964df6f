//! Result matrix and the undefined-row mask.
//!
//! A row whose label row has no relevant item at all has no meaningful
//! precision-family value; every cutoff column of that row is set to
//! [`UNDEFINED`] after the numeric pass, whatever the pass produced.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut2, Axis};

/// Sentinel stored for undefined cells. Never compare against it with `==`;
/// use [`MetricMatrix::is_undefined`] or [`MetricMatrix::get`].
pub const UNDEFINED: f64 = f64::NAN;

/// Batch x cutoffs metric values. Column `j` corresponds to the `j`-th
/// requested cutoff, in the order the caller supplied them.
#[derive(Debug, Clone)]
pub struct MetricMatrix {
    values: Array2<f64>,
}

impl MetricMatrix {
    /// Zero-filled output for `batch` rows and `num_cutoffs` columns.
    pub(crate) fn placeholder(batch: usize, num_cutoffs: usize) -> Self {
        Self {
            values: Array2::zeros((batch, num_cutoffs)),
        }
    }

    pub(crate) fn values_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.values.view_mut()
    }

    /// Overwrite every row with zero relevant items with [`UNDEFINED`].
    pub(crate) fn mask_undefined(mut self, relevant: &Array1<f64>) -> Self {
        for (mut row, &count) in self.values.outer_iter_mut().zip(relevant.iter()) {
            if count == 0.0 {
                row.fill(UNDEFINED);
            }
        }
        self
    }

    /// (batch, number of cutoffs)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Metric value at (row, cutoff column); `None` when the cell is undefined
    /// or out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied().filter(|v| !v.is_nan())
    }

    pub fn is_undefined(&self, row: usize, col: usize) -> bool {
        self.values.get((row, col)).map_or(false, |v| v.is_nan())
    }

    /// One row as `Option`s, `None` marking undefined cells.
    pub fn row(&self, row: usize) -> Vec<Option<f64>> {
        (0..self.values.ncols()).map(|col| self.get(row, col)).collect()
    }

    /// Raw values, with [`UNDEFINED`] left in place.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.values
    }
}

/// Number of relevant items in each full label row (not just the top-K window).
pub fn relevant_counts(labels: ArrayView2<'_, f32>) -> Array1<f64> {
    labels.mapv(f64::from).sum_axis(Axis(1))
}

/// Copy a column of a per-rank curve into output column `col`.
pub(crate) fn project_column(out: &mut MetricMatrix, col: usize, curve_column: ArrayView1<'_, f64>) {
    out.values_mut().column_mut(col).assign(&curve_column);
}
