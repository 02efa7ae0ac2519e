//! Recurring task generation.
//!
//! - `types`: records read from the feed and the instructions they produce
//! - `schedule`: pure decision of what to create on a given day
//! - `feed`: where records come from (local file or Google Sheets)

mod types;
pub mod feed;
pub mod schedule;

pub use feed::{FeedError, FileFeed, RecurrenceFeed, SheetFeed};
pub use schedule::{decide, parse_weekday_label, target_weekday, weekday_label};
pub use types::{CreateInstruction, Frequency, RecurrenceRecord};
