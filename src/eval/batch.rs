//! Evaluation batch read from JSON: scores, labels and optional self-match columns.

use crate::config::SelfMatchMode;
use crate::error::{RankmetricsError, Result};
use crate::eval::RankingOptions;
use ndarray::Array2;
use serde::Deserialize;
use std::path::Path;

/// One batch of queries as supplied on disk.
///
/// ```json
/// { "scores": [[0.9, 0.1]], "labels": [[1, 0]], "self_match": [0], "query_ids": ["q-17"] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EvalBatch {
    /// Predicted score per candidate, one row per query.
    pub scores: Vec<Vec<f32>>,
    /// 0/1 relevance per candidate, same shape as `scores`.
    pub labels: Vec<Vec<f32>>,
    /// Optional: column holding each query's own item.
    #[serde(default)]
    pub self_match: Option<Vec<usize>>,
    /// Optional: names used when printing per-query rows.
    #[serde(default)]
    pub query_ids: Option<Vec<String>>,
}

impl EvalBatch {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RankmetricsError::Parse(format!("Invalid batch JSON: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn scores_matrix(&self) -> Result<Array2<f32>> {
        to_matrix("scores", &self.scores)
    }

    pub fn labels_matrix(&self) -> Result<Array2<f32>> {
        to_matrix("labels", &self.labels)
    }

    /// Options for this batch under the given self-match mode.
    ///
    /// `Explicit` needs the batch's own `self_match` list; `None` ranks every
    /// column even when the batch carries such a list.
    pub fn ranking_options(&self, mode: SelfMatchMode, at_r: bool) -> Result<RankingOptions> {
        let options = RankingOptions::new().with_at_r(at_r);
        match mode {
            SelfMatchMode::None => {
                if self.self_match.is_some() {
                    log::warn!("Batch has a self_match list but self-match mode is none; ignoring it");
                }
                Ok(options)
            }
            SelfMatchMode::Diagonal => Ok(options.with_diagonal_self_match(self.len())),
            SelfMatchMode::Explicit => match &self.self_match {
                Some(columns) => Ok(options.with_self_match(columns.clone())),
                None => Err(RankmetricsError::InvalidSelfMatch(
                    "self-match mode is explicit but the batch has no self_match list".to_string(),
                )),
            },
        }
    }

    /// Name for row `row`, falling back to its position.
    pub fn query_id(&self, row: usize) -> String {
        self.query_ids
            .as_ref()
            .and_then(|ids| ids.get(row).cloned())
            .unwrap_or_else(|| format!("#{}", row))
    }
}

/// Rows of equal length into a dense matrix; ragged input is a parse error.
fn to_matrix(name: &str, rows: &[Vec<f32>]) -> Result<Array2<f32>> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(RankmetricsError::Parse(format!(
            "{} row {} has {} items, expected {}",
            name,
            row,
            values.len(),
            width
        )));
    }
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|e| RankmetricsError::Parse(format!("{} matrix: {}", name, e)))
}
