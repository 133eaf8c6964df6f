//! Evaluation CLI: compute P@K, R@K and AP@K for a scored batch and report batch means.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rankmetrics::config::{Config, SelfMatchMode};
use rankmetrics::eval::summary::{column_means, defined_rows};
use rankmetrics::eval::{EvalBatch, Metric, MetricMatrix};
use rankmetrics::Cutoffs;
use std::path::PathBuf;

/// Ranking metrics over a batch of scored candidate lists.
#[derive(Parser, Debug)]
#[command(name = "rankmetrics")]
struct Args {
    /// Path to batch JSON with `scores` and `labels` (and optional `self_match`, `query_ids`).
    #[arg(long)]
    input: PathBuf,

    /// Comma-separated cutoffs (default: metrics.cutoffs from config).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    cutoffs: Option<Vec<i64>>,

    /// Normalize Average Precision by the full relevant count.
    /// `--at-r` alone means true; `--at-r=false` overrides `metrics.at_r = true`.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    at_r: Option<bool>,

    /// Self-match exclusion (default: metrics.self_match from config).
    #[arg(long, value_enum)]
    self_match: Option<SelfMatchArg>,

    /// Metric to report.
    #[arg(long, value_enum, default_value = "all")]
    metric: MetricArg,

    /// Print one line per query as well as the batch means.
    #[arg(long)]
    per_query: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SelfMatchArg {
    None,
    Diagonal,
    Explicit,
}

impl From<SelfMatchArg> for SelfMatchMode {
    fn from(arg: SelfMatchArg) -> Self {
        match arg {
            SelfMatchArg::None => SelfMatchMode::None,
            SelfMatchArg::Diagonal => SelfMatchMode::Diagonal,
            SelfMatchArg::Explicit => SelfMatchMode::Explicit,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    All,
    Precision,
    Recall,
    AvgPrecision,
}

impl MetricArg {
    fn metrics(self) -> Vec<Metric> {
        match self {
            MetricArg::All => Metric::ALL.to_vec(),
            MetricArg::Precision => vec![Metric::Precision],
            MetricArg::Recall => vec![Metric::Recall],
            MetricArg::AvgPrecision => vec![Metric::AvgPrecision],
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.rankmetrics.log_level.as_str()),
    )
    .init();

    match &config.source {
        Some(path) => log::debug!("Loaded config from {}", path.display()),
        None => log::debug!("No rankmetrics.toml found, using defaults"),
    }

    let batch = EvalBatch::load(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    if batch.is_empty() {
        anyhow::bail!("No queries in {}", args.input.display());
    }
    let scores = batch.scores_matrix()?;
    let labels = batch.labels_matrix()?;

    let cutoffs = args.cutoffs.clone().unwrap_or_else(|| config.metrics.cutoffs.clone());
    let mode = args.self_match.map(SelfMatchMode::from).unwrap_or(config.metrics.self_match);
    let options = batch.ranking_options(mode, args.at_r.unwrap_or(config.metrics.at_r))?;

    println!(
        "Evaluating {} queries x {} candidates at K = {:?}\n",
        scores.nrows(),
        scores.ncols(),
        cutoffs
    );

    let digits = config.report.precision;
    let mut failures = Vec::new();

    for metric in args.metric.metrics() {
        let values = metric
            .compute(Cutoffs::new(cutoffs.clone()), scores.view(), labels.view(), &options)
            .with_context(|| format!("Failed to compute {}", metric))?;

        if args.per_query {
            print_per_query(&batch, metric, &cutoffs, &values, digits);
        }

        let means = column_means(&values);
        let undefined = values.shape().0 - defined_rows(&values);
        println!("=== {} ({} undefined) ===", metric, undefined);
        for (k, mean) in cutoffs.iter().zip(&means) {
            println!("{:<8} {}", format!("{}@{}", metric.label(), k), format_value(*mean, digits));
        }
        println!();

        if let Some(min) = config.report.thresholds.get(metric) {
            for (k, mean) in cutoffs.iter().zip(&means) {
                if mean.map_or(true, |m| m < min) {
                    failures.push(format!("{}@{} below {:.2}", metric.label(), k, min));
                }
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        println!("Metrics below threshold: {}", failures.join(", "));
        std::process::exit(1);
    }
}

fn print_per_query(batch: &EvalBatch, metric: Metric, cutoffs: &[i64], values: &MetricMatrix, digits: usize) {
    let header: Vec<String> = cutoffs
        .iter()
        .map(|k| format!("{:>10}", format!("{}@{}", metric.label(), k)))
        .collect();
    println!("{:<16}{}", "query", header.join(""));
    for row in 0..values.shape().0 {
        let cells: Vec<String> = values
            .row(row)
            .into_iter()
            .map(|v| format!("{:>10}", format_value(v, digits)))
            .collect();
        println!("{:<16}{}", batch.query_id(row), cells.join(""));
    }
    println!();
}

fn format_value(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", digits, v),
        None => "undefined".to_string(),
    }
}
