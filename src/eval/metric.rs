//! Metric selector used by the CLI and the report thresholds.

use crate::error::Result;
use crate::eval::mask::MetricMatrix;
use crate::eval::validate::Cutoffs;
use crate::eval::{avg_precision_at, precision_at, recall_at, RankingOptions};
use ndarray::ArrayView2;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Precision,
    Recall,
    AvgPrecision,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Precision, Metric::Recall, Metric::AvgPrecision];

    /// Short label used in reports, e.g. `P@5`.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Precision => "P",
            Metric::Recall => "R",
            Metric::AvgPrecision => "AP",
        }
    }

    pub fn compute(
        &self,
        ks: Cutoffs,
        scores: ArrayView2<'_, f32>,
        labels: ArrayView2<'_, f32>,
        options: &RankingOptions,
    ) -> Result<MetricMatrix> {
        match self {
            Metric::Precision => precision_at(ks, scores, labels, options),
            Metric::Recall => recall_at(ks, scores, labels, options),
            Metric::AvgPrecision => avg_precision_at(ks, scores, labels, options),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Precision => "precision",
            Metric::Recall => "recall",
            Metric::AvgPrecision => "avg_precision",
        };
        f.write_str(name)
    }
}
