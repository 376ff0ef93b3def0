//! Event predicates used to locate edit, delete and copy targets.

use chrono::{NaiveDate, NaiveDateTime};

use crate::date_range::DateRange;
use crate::event::{Event, SeriesId};

/// Conjunction of optional criteria. An empty filter matches every event.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    subject: Option<String>,
    subject_ignore_case: bool,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    starts_at_or_after: Option<NaiveDateTime>,
    start_date: Option<NaiveDate>,
    series_id: Option<SeriesId>,
    overlapping: Option<DateRange>,
    starting_within: Option<DateRange>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Match the subject without regard to case.
    pub fn subject_ignore_case(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self.subject_ignore_case = true;
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn starts_at_or_after(mut self, anchor: NaiveDateTime) -> Self {
        self.starts_at_or_after = Some(anchor);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn series_id(mut self, id: SeriesId) -> Self {
        self.series_id = Some(id);
        self
    }

    /// Events whose interval touches `range`.
    pub fn overlapping(mut self, range: DateRange) -> Self {
        self.overlapping = Some(range);
        self
    }

    /// Events whose start lies inside `range`.
    pub fn starting_within(mut self, range: DateRange) -> Self {
        self.starting_within = Some(range);
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        let subject_ok = match &self.subject {
            Some(s) if self.subject_ignore_case => event.subject().eq_ignore_ascii_case(s),
            Some(s) => event.subject() == s,
            None => true,
        };

        subject_ok
            && self.start.is_none_or(|s| event.start() == s)
            && self.end.is_none_or(|e| event.end() == e)
            && self.starts_at_or_after.is_none_or(|a| event.start() >= a)
            && self.start_date.is_none_or(|d| event.start_date() == d)
            && self.series_id.is_none_or(|id| event.series_id() == id)
            && self.overlapping.is_none_or(|r| r.overlaps(event))
            && self.starting_within.is_none_or(|r| r.contains(event.start()))
    }
}
