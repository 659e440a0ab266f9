//! Serializable service configuration (TOML).
//!
//! ```toml
//! [benchmark]
//! path = "data/kospi.csv"
//! name = "KOSPI"
//! has_header = false
//!
//! [chart]
//! default_window = 250
//! default_mode = "relative"
//! default_anchor = "right"
//!
//! [logging]
//! filter = "info"
//! ```

use quantlab_core::{AnchorPolicy, ChartMode, LoaderOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub benchmark: BenchmarkConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the benchmark source lives and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub path: PathBuf,
    #[serde(default = "default_benchmark_name")]
    pub name: String,
    #[serde(default)]
    pub has_header: bool,
}

/// Defaults applied when a request leaves a chart option unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Trading days returned by a raw benchmark window request.
    pub default_window: usize,
    pub default_mode: ChartMode,
    pub default_anchor: AnchorPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
}

fn default_benchmark_name() -> String {
    "KOSPI".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_window: 250,
            default_mode: ChartMode::Relative,
            default_anchor: AnchorPolicy::Right,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Config pointing at `path` with every other option defaulted.
    pub fn for_source(path: impl Into<PathBuf>) -> Self {
        Self {
            benchmark: BenchmarkConfig {
                path: path.into(),
                name: default_benchmark_name(),
                has_header: false,
            },
            chart: ChartConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.benchmark.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("benchmark.path must not be empty".into()));
        }
        if self.chart.default_window == 0 {
            return Err(ConfigError::Invalid(
                "chart.default_window must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            has_header: self.benchmark.has_header,
        }
    }
}
