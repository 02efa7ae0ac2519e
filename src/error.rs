//! Error types shared by the decision core, name resolution, and config loading.

use std::path::PathBuf;

/// Errors produced by the pure due-date and recurrence decisions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// Frequency is neither DAILY nor WEEKLY.
    #[error("unsupported frequency: {0:?}")]
    UnsupportedFrequency(String),

    /// A due date did not parse as a `YYYY-MM-DD` calendar date.
    #[error("invalid due date {raw:?}: {reason}")]
    InvalidDate { raw: String, reason: String },

    /// A day offset that lands outside the years a `YYYY-MM-DD` due date can hold.
    #[error("due date offset {offset_days} days is out of range")]
    DueDateOutOfRange { offset_days: i64 },

    /// A WEEKLY record without a day-of-week.
    #[error("weekly task {task:?} has no day of week")]
    MissingDayOfWeek { task: String },

    /// A day-of-week label that is not a weekday name.
    #[error("invalid day of week: {0:?}")]
    InvalidDayOfWeek(String),
}

/// Failure to resolve a human-readable name to a remote identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{kind} not found: {name:?}")]
    NotFound { kind: &'static str, name: String },
}

/// Errors raised while loading a session config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("late_threshold must be >= 0, got {0}")]
    NegativeThreshold(i64),

    #[error("no access token: set access_token in the config or ASANA_ACCESS_TOKEN")]
    MissingToken,
}
