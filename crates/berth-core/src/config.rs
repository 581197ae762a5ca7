//! YAML configuration for a dashboard session.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```yaml
//! metric_history: 300
//! log_history: 1000
//! backfill:
//!   limit: 500
//!   window_secs: 3600
//!   timeout_ms: 5000
//! ```

use crate::error::ConfigError;
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Historical log query settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackfillConfig {
    /// Maximum number of entries the query may return.
    pub limit: usize,
    /// How far back the query looks, in seconds.
    pub window_secs: u64,
    /// Hard deadline for the query, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            limit: 500,
            window_secs: 3600,
            timeout_ms: 5000,
        }
    }
}

impl BackfillConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Session-wide retention settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Samples retained per (entity, metric).
    pub metric_history: usize,
    /// Entries retained per log view.
    pub log_history: usize,
    pub backfill: BackfillConfig,
    /// Hard CPU limit in percent, used as the CPU graph ceiling.
    pub cpu_limit: Option<f64>,
    /// Hard memory limit in bytes, used as the memory graph ceiling.
    pub memory_limit: Option<f64>,
    pub logging: LogConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            metric_history: 300,
            log_history: 1000,
            backfill: BackfillConfig::default(),
            cpu_limit: None,
            memory_limit: None,
            logging: LogConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), "loaded session config");
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reject values the session cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("metric_history", self.metric_history),
            ("log_history", self.log_history),
            ("backfill.limit", self.backfill.limit),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        if self.backfill.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "backfill.timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        for (field, limit) in [("cpu_limit", self.cpu_limit), ("memory_limit", self.memory_limit)] {
            if let Some(limit) = limit {
                if !(limit.is_finite() && limit > 0.0) {
                    return Err(ConfigError::Invalid {
                        field,
                        reason: format!("{limit} is not a positive number"),
                    });
                }
            }
        }
        Ok(())
    }
}
