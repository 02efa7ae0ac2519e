//! Types for recurring task templates.

use serde::{Deserialize, Serialize};

use crate::error::DecisionError;

/// How often a recurring task is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
}

impl std::str::FromStr for Frequency {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("daily") {
            Ok(Self::Daily)
        } else if trimmed.eq_ignore_ascii_case("weekly") {
            Ok(Self::Weekly)
        } else {
            Err(DecisionError::UnsupportedFrequency(s.to_string()))
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "DAILY"),
            Self::Weekly => write!(f, "WEEKLY"),
        }
    }
}

/// One row of the recurrence feed.
///
/// `frequency` stays a free-form string here; it is parsed when the
/// record is scheduled so a bad value rejects only that record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRecord {
    #[serde(alias = "task", alias = "name")]
    pub task_name: String,
    pub section: String,
    #[serde(alias = "assignee")]
    pub owner: String,
    pub frequency: String,
    #[serde(default, alias = "day", skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
}

impl RecurrenceRecord {
    pub fn daily(task_name: &str, section: &str, owner: &str) -> Self {
        Self {
            task_name: task_name.to_string(),
            section: section.to_string(),
            owner: owner.to_string(),
            frequency: Frequency::Daily.to_string(),
            day_of_week: None,
        }
    }

    pub fn weekly(task_name: &str, section: &str, owner: &str, day_of_week: &str) -> Self {
        Self {
            frequency: Frequency::Weekly.to_string(),
            day_of_week: Some(day_of_week.to_string()),
            ..Self::daily(task_name, section, owner)
        }
    }
}

/// Instruction to create one task instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateInstruction {
    pub name: String,
    pub section: String,
    pub owner: String,
    /// Days from today the new task is due.
    pub due_offset_days: i64,
}
