//! Battery configuration.

use std::path::Path;

use rdt_core::{DEFAULT_COUNT, DEFAULT_WIDTH, bytes_per_value};
use serde::{Deserialize, Serialize};

/// Lags probed by the autocorrelation estimator unless configured otherwise.
pub const DEFAULT_LAGS: [usize; 4] = [1, 2, 8, 64];

/// Draw pairs used by the avalanche prober unless configured otherwise.
pub const DEFAULT_AVALANCHE_TRIALS: usize = 20_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Parameters of one battery run.
///
/// Missing fields in a JSON file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Number of values in the sample stream.
    pub count: usize,
    /// Bit width of each value.
    pub width: u32,
    /// Autocorrelation lags, reported in this order.
    pub lags: Vec<usize>,
    pub avalanche_trials: usize,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            width: DEFAULT_WIDTH,
            lags: DEFAULT_LAGS.to_vec(),
            avalanche_trials: DEFAULT_AVALANCHE_TRIALS,
        }
    }
}

impl BatteryConfig {
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Reject settings no stream could satisfy.
    ///
    /// Lags that exceed the stream length are not rejected here: they show up
    /// as failed entries in the report.
    pub fn validate(&self) -> Result<(), ConfigError> {
        bytes_per_value(self.width).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.count == 0 {
            return Err(ConfigError::Invalid("count must be at least 1".into()));
        }
        if self.lags.contains(&0) {
            return Err(ConfigError::Invalid("lags must be at least 1".into()));
        }
        Ok(())
    }
}
