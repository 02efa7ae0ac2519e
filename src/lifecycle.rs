//! Due-date lifecycle decisions.
//!
//! A task's due date is classified against "today" and the session's late
//! threshold. Two tiers apply:
//! - `PastDue`: overdue but inside the grace period, reported only
//! - `ReallyLate`: overdue by more than the threshold, rescheduled
//!
//! Everything here is a pure function of its inputs.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::asana::Task;
use crate::error::DecisionError;

/// Wire format of Asana `due_on` values.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Where a task sits in its due-date lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    OnTime,
    PastDue,
    ReallyLate,
    NoDueDate,
    Completed,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnTime => write!(f, "on time"),
            Self::PastDue => write!(f, "past due"),
            Self::ReallyLate => write!(f, "really late"),
            Self::NoDueDate => write!(f, "no due date"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// The two task fields the lifecycle looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueSnapshot {
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
}

impl DueSnapshot {
    /// Build a snapshot from a task, parsing its `due_on` field.
    ///
    /// A malformed `due_on` is an error, not an absent due date.
    pub fn from_task(task: &Task) -> Result<Self, DecisionError> {
        let due_date = task.due_on.as_deref().map(parse_due_date).transpose()?;
        Ok(Self {
            completed: task.completed,
            due_date,
        })
    }
}

/// Parse a `YYYY-MM-DD` due date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, DecisionError> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).map_err(|e| DecisionError::InvalidDate {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Latest year a `YYYY-MM-DD` due date can carry.
pub const MAX_DUE_YEAR: i32 = 9999;

/// Format a date the way Asana expects `due_on`.
pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}

/// Classify a task's due-date state.
///
/// Comparisons are strict: a task due today is `OnTime`, and a task exactly
/// `late_threshold` days overdue is still only `PastDue`.
pub fn classify(task: &DueSnapshot, today: NaiveDate, late_threshold: u32) -> Classification {
    if task.completed {
        return Classification::Completed;
    }
    let Some(due) = task.due_date else {
        return Classification::NoDueDate;
    };

    // Days overdue; negative when the due date is in the future.
    let overdue = (today - due).num_days();
    if overdue > i64::from(late_threshold) {
        Classification::ReallyLate
    } else if overdue > 0 {
        Classification::PastDue
    } else {
        Classification::OnTime
    }
}

/// New due date `offset_days` from `today`.
///
/// Saturates at the representable date range instead of panicking.
pub fn reschedule(today: NaiveDate, offset_days: i64) -> NaiveDate {
    let shifted = if offset_days >= 0 {
        today.checked_add_days(Days::new(offset_days.unsigned_abs()))
    } else {
        today.checked_sub_days(Days::new(offset_days.unsigned_abs()))
    };
    shifted.unwrap_or(if offset_days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// `due_on` value `offset_days` from `today`, or an error when the date
/// falls outside the four-digit years a `YYYY-MM-DD` field can hold.
pub fn due_on_after(today: NaiveDate, offset_days: i64) -> Result<String, DecisionError> {
    let due = reschedule(today, offset_days);
    if !(1..=MAX_DUE_YEAR).contains(&due.year()) {
        return Err(DecisionError::DueDateOutOfRange { offset_days });
    }
    Ok(format_due_date(due))
}
