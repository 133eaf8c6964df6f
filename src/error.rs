use thiserror::Error;

/// Main error type for rankmetrics
#[derive(Error, Debug)]
pub enum RankmetricsError {
    /// Score and label matrices disagree on (batch, items)
    #[error("Shape mismatch: scores are {scores:?}, labels are {labels:?}")]
    ShapeMismatch {
        scores: (usize, usize),
        labels: (usize, usize),
    },

    /// Cutoff is non-positive or larger than the usable items per row
    #[error("Invalid cutoff {cutoff}: must be in 1..={available}")]
    InvalidCutoff { cutoff: i128, available: usize },

    /// No cutoffs were supplied
    #[error("Invalid cutoff: at least one cutoff is required")]
    EmptyCutoffs,

    /// Label that is neither 0 nor 1
    #[error("Invalid label {value} at ({row}, {col}): labels must be 0 or 1")]
    InvalidLabel { row: usize, col: usize, value: f32 },

    /// NaN score, which has no place in a descending order
    #[error("Invalid score at ({row}, {col}): scores must not be NaN")]
    InvalidScore { row: usize, col: usize },

    /// Self-match column list does not fit the batch
    #[error("Invalid self-match columns: {0}")]
    InvalidSelfMatch(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenient Result type using RankmetricsError
pub type Result<T> = std::result::Result<T, RankmetricsError>;
