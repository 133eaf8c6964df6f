//! Ranking evaluation: validated batches, top-K extraction, P@K, R@K and AP@K.

pub mod avg_precision;
pub mod batch;
pub mod mask;
pub mod metric;
pub mod options;
pub mod precision;
pub mod summary;
pub mod topk;
pub mod validate;

pub use avg_precision::avg_precision_at;
pub use batch::EvalBatch;
pub use mask::{MetricMatrix, UNDEFINED};
pub use metric::Metric;
pub use options::RankingOptions;
pub use precision::{precision_at, precision_curve, recall_at};
pub use topk::{extract_topk, TopK};
pub use validate::Cutoffs;
