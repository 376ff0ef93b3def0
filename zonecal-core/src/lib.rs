//! Core engine for zonecal.
//!
//! This crate holds everything the CLI drives:
//! - `Event` values and the per-calendar `EventStore`
//! - recurring series generation and scoped edits/deletes
//! - named calendars with time zones, and copying between them
//! - structured `Command` records and `dispatch`
//! - CSV and iCalendar export

pub mod calendar;
pub mod command;
pub mod config;
pub mod container;
pub mod copy;
pub mod create;
pub mod date_range;
pub mod delete;
pub mod edit;
pub mod error;
pub mod event;
pub mod export;
pub mod filter;
pub mod recurrence;
pub mod store;
pub mod time;

pub use calendar::Calendar;
pub use command::{Command, dispatch};
pub use config::ZonecalConfig;
pub use container::CalendarContainer;
pub use error::{CalError, CalResult};
pub use event::{Event, EventKind, EventStatus, Location, SeriesId};
pub use store::EventStore;
