//! Calendar event values.
//!
//! Events are immutable: an edit builds a new value through [`EventBuilder`] and the
//! store swaps it in for the old one. Two events are equal when their identity key
//! (subject, start, end) matches, regardless of series membership.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::{CalError, CalResult};
use crate::time::{all_day_end, all_day_start, format_date_time};

pub const DEFAULT_DESCRIPTION: &str = "No description given";

/// Identifier shared by every member of one generated series.
/// Single events own a private one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(Uuid);

impl SeriesId {
    pub fn new() -> Self {
        SeriesId(Uuid::new_v4())
    }
}

impl Default for SeriesId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    Physical,
    Online,
    #[default]
    Unknown,
}

impl Location {
    /// Anything unrecognised maps to `Unknown`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "physical" => Location::Physical,
            "online" => Location::Online,
            _ => Location::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Physical => "PHYSICAL",
            Location::Online => "ONLINE",
            Location::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventStatus {
    Public,
    Private,
    #[default]
    Unknown,
}

impl EventStatus {
    /// Anything unrecognised maps to `Unknown`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "public" => EventStatus::Public,
            "private" => EventStatus::Private,
            _ => EventStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Public => "PUBLIC",
            EventStatus::Private => "PRIVATE",
            EventStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Single,
    Series,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Single => write!(f, "SINGLE"),
            EventKind::Series => write!(f, "SERIES"),
        }
    }
}

/// One occurrence on a calendar.
#[derive(Debug, Clone)]
pub struct Event {
    subject: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    description: String,
    location: Location,
    status: EventStatus,
    kind: EventKind,
    series_id: SeriesId,
}

impl Event {
    /// Start building a single event lasting one hour.
    pub fn builder(subject: impl Into<String>, start: NaiveDateTime) -> EventBuilder {
        EventBuilder {
            subject: subject.into(),
            start,
            end: start + Duration::hours(1),
            description: DEFAULT_DESCRIPTION.to_string(),
            location: Location::Unknown,
            status: EventStatus::Unknown,
            kind: EventKind::Single,
            series_id: SeriesId::new(),
        }
    }

    /// A builder pre-filled with this event's fields, for copy-on-write edits.
    pub fn to_builder(&self) -> EventBuilder {
        EventBuilder {
            subject: self.subject.clone(),
            start: self.start,
            end: self.end,
            description: self.description.clone(),
            location: self.location,
            status: self.status,
            kind: self.kind,
            series_id: self.series_id,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn series_id(&self) -> SeriesId {
        self.series_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_series(&self) -> bool {
        self.kind == EventKind::Series
    }

    /// 08:00 to 17:00 on one calendar date.
    pub fn is_all_day(&self) -> bool {
        self.start.date() == self.end.date()
            && self.start.time() == all_day_start()
            && self.end.time() == all_day_end()
    }

    pub fn spans_multiple_days(&self) -> bool {
        self.start.date() != self.end.date()
    }

    /// The (subject, start, end) triple that decides equality.
    pub fn key(&self) -> (&str, NaiveDateTime, NaiveDateTime) {
        (&self.subject, self.start, self.end)
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Event {}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Subject: {}, Start: {}, End: {}, Description: {}, ",
            self.subject,
            format_date_time(&self.start),
            format_date_time(&self.end),
            self.description
        )?;
        if self.location != Location::Unknown {
            write!(f, "Location: {}, ", self.location)?;
        }
        if self.status != EventStatus::Unknown {
            write!(f, "Status: {}, ", self.status)?;
        }
        write!(f, "Type: {}, AllDayEvent: {}", self.kind, self.is_all_day())
    }
}

/// Builder for [`Event`]. `build` enforces `end >= start`.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    subject: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    description: String,
    location: Location,
    status: EventStatus,
    kind: EventKind,
    series_id: SeriesId,
}

impl EventBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = end;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Make this a member of the series `id`.
    pub fn series(mut self, id: SeriesId) -> Self {
        self.kind = EventKind::Series;
        self.series_id = id;
        self
    }

    /// Keep the kind, swap the identifier.
    pub fn series_id(mut self, id: SeriesId) -> Self {
        self.series_id = id;
        self
    }

    /// Detach from any series: single kind with a fresh identity.
    pub fn detached(mut self) -> Self {
        self.kind = EventKind::Single;
        self.series_id = SeriesId::new();
        self
    }

    pub fn build(self) -> CalResult<Event> {
        if self.end < self.start {
            return Err(CalError::InvalidValue(format!(
                "End {} cannot be before start {}",
                format_date_time(&self.end),
                format_date_time(&self.start)
            )));
        }

        Ok(Event {
            subject: self.subject,
            start: self.start,
            end: self.end,
            description: self.description,
            location: self.location,
            status: self.status,
            kind: self.kind,
            series_id: self.series_id,
        })
    }
}
