//! Decides which recurring tasks to create today.
//!
//! Generation runs the night before tasks are due, so a WEEKLY record
//! matches when its day-of-week is *tomorrow*.

use chrono::{Datelike, NaiveDate, Weekday};

use super::types::{CreateInstruction, Frequency, RecurrenceRecord};
use crate::error::DecisionError;

/// Generated tasks are due the day after generation.
pub const DUE_OFFSET_DAYS: i64 = 1;

/// The weekday a task generated on `today` is prepared for.
pub fn target_weekday(today: Weekday) -> Weekday {
    match today {
        Weekday::Mon => Weekday::Tue,
        Weekday::Tue => Weekday::Wed,
        Weekday::Wed => Weekday::Thu,
        Weekday::Thu => Weekday::Fri,
        Weekday::Fri => Weekday::Sat,
        Weekday::Sat => Weekday::Sun,
        Weekday::Sun => Weekday::Mon,
    }
}

/// Upper-case English label used in the feed.
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// Parse a full weekday label, case-insensitively.
pub fn parse_weekday_label(label: &str) -> Result<Weekday, DecisionError> {
    let label = label.trim();
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
    .into_iter()
    .find(|day| weekday_label(*day).eq_ignore_ascii_case(label))
    .ok_or_else(|| DecisionError::InvalidDayOfWeek(label.to_string()))
}

/// Decide whether `record` produces a task when generation runs on `today`.
pub fn decide(
    record: &RecurrenceRecord,
    today: NaiveDate,
) -> Result<Option<CreateInstruction>, DecisionError> {
    let due = match record.frequency.parse::<Frequency>()? {
        Frequency::Daily => true,
        Frequency::Weekly => {
            let day = record
                .day_of_week
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .ok_or_else(|| DecisionError::MissingDayOfWeek {
                    task: record.task_name.clone(),
                })?;
            day.trim()
                .eq_ignore_ascii_case(weekday_label(target_weekday(today.weekday())))
        }
    };

    Ok(due.then(|| CreateInstruction {
        name: record.task_name.clone(),
        section: record.section.clone(),
        owner: record.owner.clone(),
        due_offset_days: DUE_OFFSET_DAYS,
    }))
}
