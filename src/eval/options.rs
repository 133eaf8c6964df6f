//! Per-call switches for the metric entry points.

/// Modes shared by `precision_at`, `recall_at` and `avg_precision_at`.
///
/// `self_match` holds one column index per row. When it is set the scores are
/// assumed to come from the same embedding space as the queries
/// (`embeddings_come_from_same_source`), and that column is dropped from each
/// row before ranking. Which column is "self" is up to the caller; rows are
/// not assumed to be square.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingOptions {
    /// Normalize Average Precision by the row's full relevant count, unclamped.
    pub at_r: bool,
    /// Column to exclude per row, if any.
    pub self_match: Option<Vec<usize>>,
}

impl RankingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_at_r(mut self, at_r: bool) -> Self {
        self.at_r = at_r;
        self
    }

    pub fn with_self_match(mut self, columns: Vec<usize>) -> Self {
        self.self_match = Some(columns);
        self
    }

    /// Exclude column `i` from row `i` for a batch of `batch` rows.
    pub fn with_diagonal_self_match(self, batch: usize) -> Self {
        self.with_self_match((0..batch).collect())
    }

    pub fn embeddings_come_from_same_source(&self) -> bool {
        self.self_match.is_some()
    }

    pub fn self_match(&self) -> Option<&[usize]> {
        self.self_match.as_deref()
    }
}
