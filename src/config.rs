use crate::error::RankmetricsError;
use crate::eval::Metric;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rankmetrics: RankmetricsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    /// File the configuration was read from; `None` when defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// General settings
#[derive(Debug, Clone, Deserialize)]
pub struct RankmetricsConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RankmetricsConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Which column, if any, is removed from each row before ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfMatchMode {
    /// Rank every column.
    #[default]
    None,
    /// Row `i` drops column `i`.
    Diagonal,
    /// Columns come from the batch file's `self_match` list.
    Explicit,
}

/// Metric computation defaults
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_cutoffs")]
    pub cutoffs: Vec<i64>,
    #[serde(default)]
    pub at_r: bool,
    #[serde(default)]
    pub self_match: SelfMatchMode,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            cutoffs: default_cutoffs(),
            at_r: false,
            self_match: SelfMatchMode::None,
        }
    }
}

/// Report formatting and pass/fail thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Decimal digits printed for metric values.
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            thresholds: Thresholds::default(),
        }
    }
}

/// Minimum batch mean per metric, applied to every cutoff column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thresholds {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub avg_precision: Option<f64>,
}

impl Thresholds {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Precision => self.precision,
            Metric::Recall => self.recall,
            Metric::AvgPrecision => self.avg_precision,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cutoffs() -> Vec<i64> {
    vec![1, 5, 10]
}

fn default_precision() -> usize {
    4
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RANKMETRICS_CONFIG environment variable (must exist)
    /// 2. ./rankmetrics.toml in current directory (defaults when absent)
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config = match std::env::var("RANKMETRICS_CONFIG") {
            Ok(path) => Self::load_file(PathBuf::from(path))?,
            Err(_) => {
                let default_path = PathBuf::from("rankmetrics.toml");
                if default_path.exists() {
                    Self::load_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn load_file(config_path: PathBuf) -> Result<Self> {
        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        let mut config = Self::parse(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        config.source = Some(config_path);
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn parse(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("Invalid TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> crate::error::Result<()> {
        if self.metrics.cutoffs.is_empty() {
            return Err(RankmetricsError::Config(
                "metrics.cutoffs must list at least one cutoff".to_string(),
            ));
        }

        if let Some(k) = self.metrics.cutoffs.iter().find(|&&k| k < 1) {
            return Err(RankmetricsError::Config(format!(
                "metrics.cutoffs must be positive, got {}",
                k
            )));
        }

        if self.report.precision > 10 {
            return Err(RankmetricsError::Config(
                "report.precision must be at most 10".to_string(),
            ));
        }

        for metric in Metric::ALL {
            if let Some(min) = self.report.thresholds.get(metric) {
                if !(0.0..=1.0).contains(&min) {
                    return Err(RankmetricsError::Config(format!(
                        "report.thresholds.{} must be between 0.0 and 1.0",
                        metric
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide cwd and env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const TEST_CONFIG: &str = r#"
[rankmetrics]
log_level = "debug"

[metrics]
cutoffs = [1, 3]
at_r = true
self_match = "diagonal"

[report]
precision = 2

[report.thresholds]
avg_precision = 0.5
"#;

    /// Restores cwd when dropped (e.g. on panic).
    struct CwdGuard(std::path::PathBuf);
    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    fn with_config_env(config_path: Option<&std::path::Path>, f: impl FnOnce()) {
        let original = std::env::var("RANKMETRICS_CONFIG").ok();
        match config_path {
            Some(p) => std::env::set_var("RANKMETRICS_CONFIG", p),
            None => std::env::remove_var("RANKMETRICS_CONFIG"),
        }
        f();
        std::env::remove_var("RANKMETRICS_CONFIG");
        if let Some(val) = original {
            std::env::set_var("RANKMETRICS_CONFIG", val);
        }
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(TEST_CONFIG).unwrap();
        assert_eq!(config.rankmetrics.log_level, "debug");
        assert_eq!(config.metrics.cutoffs, vec![1, 3]);
        assert!(config.metrics.at_r);
        assert_eq!(config.metrics.self_match, SelfMatchMode::Diagonal);
        assert_eq!(config.report.precision, 2);
        assert_eq!(config.report.thresholds.get(Metric::AvgPrecision), Some(0.5));
        assert_eq!(config.report.thresholds.get(Metric::Recall), None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.rankmetrics.log_level, "info");
        assert_eq!(config.metrics.cutoffs, vec![1, 5, 10]);
        assert!(!config.metrics.at_r);
        assert_eq!(config.metrics.self_match, SelfMatchMode::None);
        assert_eq!(config.report.precision, 4);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::parse("[metrics]\ncutoffs = []").is_err());
        assert!(Config::parse("[metrics]\ncutoffs = [0, 2]").is_err());
        assert!(Config::parse("[metrics]\nself_match = \"upper\"").is_err());
        assert!(Config::parse("[report.thresholds]\nprecision = 1.5").is_err());
        assert!(Config::parse("[report]\nprecision = 11").is_err());
    }

    #[test]
    fn test_validation_errors_are_config_errors() {
        let err = Config::parse("[metrics]\ncutoffs = [0, 2]").unwrap_err();
        let err = err
            .downcast_ref::<RankmetricsError>()
            .expect("validation error should be a RankmetricsError");
        assert!(matches!(err, RankmetricsError::Config(_)));
        assert!(err.to_string().contains("metrics.cutoffs must be positive, got 0"));
    }

    #[test]
    fn test_config_load_from_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, TEST_CONFIG).unwrap();
        with_config_env(Some(&config_path), || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.metrics.cutoffs, vec![1, 3]);
            assert_eq!(config.source.as_deref(), Some(config_path.as_path()));
        });
    }

    #[test]
    fn test_config_load_defaults_without_file() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let _cwd = CwdGuard(original_dir);
        std::env::set_current_dir(temp_dir.path()).unwrap();
        with_config_env(None, || {
            let config = Config::load().unwrap();
            assert_eq!(config.metrics.cutoffs, vec![1, 5, 10]);
            assert!(config.source.is_none());
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env(Some(std::path::Path::new("nonexistent.toml")), || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("nonexistent.toml"));
        });
    }
}
