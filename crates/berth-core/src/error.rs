//! Error types for berth-core.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of the one-shot historical log query.
///
/// Never fatal: the view that asked for the backfill degrades to
/// streaming-only and is marked backfilled anyway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackfillError {
    /// The transport reported an error.
    #[error("backfill transport error: {0}")]
    Transport(String),

    /// The query did not resolve within its deadline.
    #[error("backfill timed out after {0:?}")]
    TimedOut(Duration),

    /// The task running the query went away before answering.
    #[error("backfill task aborted")]
    Aborted,
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading the config file.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML did not match the expected shape.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field holds a value the session cannot work with.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
