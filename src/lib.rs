//! # taskkeeper
//!
//! Keeps an Asana project tidy from a cron job.
//!
//! This library provides:
//! - A narrow CRUD client for the Asana REST API
//! - Due-date lifecycle rules that push really-late tasks forward
//! - Recurring task generation from a spreadsheet or file feed
//!
//! ## Architecture
//!
//! ```text
//!   RecurrenceFeed ──records──┐
//!                             ▼
//!   Clock ──today──▶  Session  ──decisions──▶ TaskStore (Asana)
//!                      │    ▲
//!                      ▼    │
//!          lifecycle / recurrence (pure)
//! ```
//!
//! ## Modules
//! - `lifecycle`: classify due dates, compute rescheduled dates
//! - `recurrence`: recurrence records, scheduling decisions, feeds
//! - `asana`: `TaskStore` trait and its HTTP client
//! - `session`: orchestration over one workspace/project
//! - `config`: session config file

pub mod asana;
pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod recurrence;
pub mod resolve;
pub mod session;

pub use asana::{AsanaClient, TaskStore};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SessionConfig;
pub use error::{ConfigError, DecisionError, ResolveError};
pub use lifecycle::{classify, reschedule, Classification};
pub use recurrence::{decide, CreateInstruction, RecurrenceRecord};
pub use session::Session;
