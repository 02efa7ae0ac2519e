//! Session configuration.
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "access_token": "...",
//!   "workspace_name": "Home",
//!   "project_name": "Chores",
//!   "late_threshold": 5,
//!   "recurrence_feed": { "type": "file", "path": "recurring.yaml" }
//! }
//! ```
//!
//! `ASANA_ACCESS_TOKEN` overrides `access_token` when set and non-empty.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asana::ASANA_API_URL;
use crate::error::ConfigError;
use crate::recurrence::{FileFeed, RecurrenceFeed, SheetFeed};

/// Environment variable that overrides the configured access token.
pub const ACCESS_TOKEN_ENV: &str = "ASANA_ACCESS_TOKEN";

/// Where recurrence records are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedConfig {
    File {
        path: PathBuf,
    },
    Sheet {
        spreadsheet_id: String,
        range: String,
        api_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
}

impl FeedConfig {
    pub fn into_feed(self) -> Box<dyn RecurrenceFeed> {
        match self {
            FeedConfig::File { path } => Box::new(FileFeed::new(path)),
            FeedConfig::Sheet {
                spreadsheet_id,
                range,
                api_key,
                base_url,
            } => {
                let feed = SheetFeed::new(&spreadsheet_id, &range, &api_key);
                match base_url {
                    Some(url) => Box::new(feed.with_base_url(url)),
                    None => Box::new(feed),
                }
            }
        }
    }
}

/// Config file as written on disk.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    access_token: Option<String>,
    workspace_name: String,
    project_name: String,
    late_threshold: i64,
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    recurrence_feed: Option<FeedConfig>,
}

/// Validated session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub access_token: String,
    pub workspace_name: String,
    pub project_name: String,
    /// Grace period in days before an overdue task is rescheduled.
    pub late_threshold: u32,
    pub api_base_url: String,
    pub recurrence_feed: Option<FeedConfig>,
}

impl SessionConfig {
    /// Load and validate a config file, applying the environment override.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let env_token = std::env::var(ACCESS_TOKEN_ENV).ok();
        let config = Self::parse(path, &contents, env_token)?;
        tracing::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Parse config text. Relative feed paths resolve against the config's directory.
    pub fn parse(
        path: &Path,
        contents: &str,
        env_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if raw.late_threshold < 0 {
            return Err(ConfigError::NegativeThreshold(raw.late_threshold));
        }
        let late_threshold = u32::try_from(raw.late_threshold).unwrap_or(u32::MAX);

        let access_token = env_token
            .filter(|t| !t.trim().is_empty())
            .or(raw.access_token)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let recurrence_feed = raw.recurrence_feed.map(|feed| match feed {
            FeedConfig::File { path } if path.is_relative() => FeedConfig::File {
                path: base_dir.join(path),
            },
            other => other,
        });

        Ok(Self {
            access_token,
            workspace_name: raw.workspace_name,
            project_name: raw.project_name,
            late_threshold,
            api_base_url: raw.api_base_url.unwrap_or_else(|| ASANA_API_URL.to_string()),
            recurrence_feed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "access_token": "file-token",
        "workspace_name": "Home",
        "project_name": "Chores",
        "late_threshold": 5
    }"#;

    #[test]
    fn test_parse_minimal() {
        let config = SessionConfig::parse(Path::new("session.json"), MINIMAL, None).unwrap();
        assert_eq!(config.access_token, "file-token");
        assert_eq!(config.workspace_name, "Home");
        assert_eq!(config.project_name, "Chores");
        assert_eq!(config.late_threshold, 5);
        assert_eq!(config.api_base_url, ASANA_API_URL);
        assert_eq!(config.recurrence_feed, None);
    }

    #[test]
    fn test_env_token_overrides_file() {
        let config = SessionConfig::parse(
            Path::new("session.json"),
            MINIMAL,
            Some("env-token".to_string()),
        )
        .unwrap();
        assert_eq!(config.access_token, "env-token");

        let config =
            SessionConfig::parse(Path::new("session.json"), MINIMAL, Some("  ".to_string()))
                .unwrap();
        assert_eq!(config.access_token, "file-token");
    }

    #[test]
    fn test_missing_token() {
        let contents =
            r#"{"workspace_name": "Home", "project_name": "Chores", "late_threshold": 5}"#;
        assert!(matches!(
            SessionConfig::parse(Path::new("session.json"), contents, None),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn test_late_threshold_is_required() {
        let contents = r#"{"access_token": "t", "workspace_name": "Home", "project_name": "Chores"}"#;
        let err = SessionConfig::parse(Path::new("session.json"), contents, None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("late_threshold"));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let contents = r#"{
            "access_token": "t",
            "workspace_name": "Home",
            "project_name": "Chores",
            "late_threshold": -1
        }"#;
        assert!(matches!(
            SessionConfig::parse(Path::new("session.json"), contents, None),
            Err(ConfigError::NegativeThreshold(-1))
        ));
    }

    #[test]
    fn test_relative_feed_path_resolves_against_config_dir() {
        let contents = r#"{
            "access_token": "t",
            "workspace_name": "Home",
            "project_name": "Chores",
            "late_threshold": 0,
            "recurrence_feed": {"type": "file", "path": "recurring.yaml"}
        }"#;
        let config =
            SessionConfig::parse(Path::new("/etc/taskkeeper/session.json"), contents, None)
                .unwrap();
        assert_eq!(config.late_threshold, 0);
        assert_eq!(
            config.recurrence_feed,
            Some(FeedConfig::File {
                path: PathBuf::from("/etc/taskkeeper/recurring.yaml")
            })
        );
    }

    #[test]
    fn test_sheet_feed() {
        let contents = r#"{
            "access_token": "t",
            "workspace_name": "Home",
            "project_name": "Chores",
            "late_threshold": 5,
            "recurrence_feed": {
                "type": "sheet",
                "spreadsheet_id": "abc123",
                "range": "Tasks!A1:E",
                "api_key": "key"
            }
        }"#;
        let config = SessionConfig::parse(Path::new("session.json"), contents, None).unwrap();
        assert!(matches!(
            config.recurrence_feed,
            Some(FeedConfig::Sheet { ref spreadsheet_id, .. }) if spreadsheet_id == "abc123"
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, MINIMAL).unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.project_name, "Chores");

        assert!(matches!(
            SessionConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
