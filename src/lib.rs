pub mod config;
pub mod error;
pub mod eval;

pub use config::Config;
pub use error::{RankmetricsError, Result};
pub use eval::{
    avg_precision_at, precision_at, recall_at, Cutoffs, Metric, MetricMatrix, RankingOptions,
};
