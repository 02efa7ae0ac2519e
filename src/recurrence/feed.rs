//! Recurrence feed sources.
//!
//! Records come either from a local JSON/YAML file or from a Google Sheets
//! range. Tabular rows are mapped to records through their header row.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::types::RecurrenceRecord;

const SHEETS_API_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feed: {0}")]
    Parse(String),

    #[error("feed header has no {0:?} column")]
    MissingColumn(&'static str),

    #[error("feed request failed: {0}")]
    Http(String),
}

/// Supplies recurrence records in feed order.
#[async_trait]
pub trait RecurrenceFeed: Send + Sync {
    async fn records(&self) -> Result<Vec<RecurrenceRecord>, FeedError>;
}

/// Records stored in a local `.json`, `.yaml` or `.yml` file.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(path: &Path, contents: &str) -> Result<Vec<RecurrenceRecord>, FeedError> {
        let is_yaml = path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false);

        if is_yaml {
            serde_yaml::from_str(contents).map_err(|e| FeedError::Parse(e.to_string()))
        } else {
            serde_json::from_str(contents).map_err(|e| FeedError::Parse(e.to_string()))
        }
    }
}

#[async_trait]
impl RecurrenceFeed for FileFeed {
    async fn records(&self) -> Result<Vec<RecurrenceRecord>, FeedError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        let records = Self::parse(&self.path, &contents)?;
        tracing::debug!(
            "Loaded {} recurrence records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Records read from a Google Sheets range through the values API.
pub struct SheetFeed {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    api_key: String,
}

impl SheetFeed {
    pub fn new(spreadsheet_id: &str, range: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: SHEETS_API_URL.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Point the feed at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(&self.range)
        )
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[async_trait]
impl RecurrenceFeed for SheetFeed {
    async fn records(&self) -> Result<Vec<RecurrenceRecord>, FeedError> {
        let resp = self
            .client
            .get(self.values_url())
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(FeedError::Http(format!("{} - {}", status, text)));
        }

        let range: ValueRange =
            serde_json::from_str(&text).map_err(|e| FeedError::Parse(e.to_string()))?;
        let records = records_from_rows(&range.values)?;
        tracing::debug!(
            "Loaded {} recurrence records from sheet {}",
            records.len(),
            self.spreadsheet_id
        );
        Ok(records)
    }
}

/// Normalize a header cell: lower case, spaces and dashes as underscores.
fn normalize_header(cell: &str) -> String {
    cell.trim().to_lowercase().replace([' ', '-'], "_")
}

fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.as_str()))
}

/// Map spreadsheet rows to records. The first row is the header.
///
/// Blank rows are skipped; short rows read missing trailing cells as empty,
/// which is how the Sheets API trims them.
pub fn records_from_rows(rows: &[Vec<String>]) -> Result<Vec<RecurrenceRecord>, FeedError> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();

    let task = find_column(&headers, &["task_name", "task", "name"])
        .ok_or(FeedError::MissingColumn("task_name"))?;
    let section =
        find_column(&headers, &["section"]).ok_or(FeedError::MissingColumn("section"))?;
    let owner = find_column(&headers, &["owner", "assignee"])
        .ok_or(FeedError::MissingColumn("owner"))?;
    let frequency =
        find_column(&headers, &["frequency"]).ok_or(FeedError::MissingColumn("frequency"))?;
    let day = find_column(&headers, &["day_of_week", "day", "weekday"]);

    let cell = |row: &[String], idx: usize| -> String {
        row.get(idx).map(|c| c.trim().to_string()).unwrap_or_default()
    };

    let records = body
        .iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| RecurrenceRecord {
            task_name: cell(row, task),
            section: cell(row, section),
            owner: cell(row, owner),
            frequency: cell(row, frequency),
            day_of_week: day.map(|idx| cell(row, idx)).filter(|d| !d.is_empty()),
        })
        .collect();

    Ok(records)
}
