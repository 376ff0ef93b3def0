//! Per-calendar event storage.
//!
//! Events are bucketed by the civil date they start on. No two resident events may
//! share an identity key; every mutation re-checks that.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::date_range::DateRange;
use crate::error::{CalError, CalResult};
use crate::event::Event;
use crate::filter::EventFilter;

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    by_date: BTreeMap<NaiveDate, Vec<Event>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.values().all(Vec::is_empty)
    }

    pub fn contains(&self, event: &Event) -> bool {
        self.by_date
            .get(&event.start_date())
            .is_some_and(|bucket| bucket.contains(event))
    }

    /// Insert under the event's start date. Fails if an equal event is resident.
    pub fn add(&mut self, event: Event) -> CalResult<Event> {
        if self.contains(&event) {
            return Err(duplicate(&event));
        }

        debug!(subject = %event.subject(), start = %event.start(), "adding event");
        self.by_date
            .entry(event.start_date())
            .or_default()
            .push(event.clone());
        Ok(event)
    }

    /// Remove the resident event equal to `event`, if any.
    pub fn remove(&mut self, event: &Event) -> Option<Event> {
        let date = event.start_date();
        let bucket = self.by_date.get_mut(&date)?;
        let index = bucket.iter().position(|e| e == event)?;
        let removed = bucket.remove(index);

        if bucket.is_empty() {
            self.by_date.remove(&date);
        }
        debug!(subject = %removed.subject(), start = %removed.start(), "removed event");
        Some(removed)
    }

    /// Swap `old` for `new`.
    ///
    /// `new` is checked against every other resident event. On collision, or when
    /// `old` is not resident, the store is left unchanged.
    pub fn replace(&mut self, old: &Event, new: Event) -> CalResult<Event> {
        let Some(removed) = self.remove(old) else {
            return Err(CalError::NotFound(format!(
                "Event to replace is not in the calendar: {}",
                old
            )));
        };

        if self.contains(&new) {
            self.by_date
                .entry(removed.start_date())
                .or_default()
                .push(removed);
            return Err(CalError::DuplicateEvent {
                subject: new.subject().to_string(),
                start: new.start(),
            });
        }

        self.by_date
            .entry(new.start_date())
            .or_default()
            .push(new.clone());
        Ok(new)
    }

    /// Events starting on `date`, in insertion order.
    pub fn events_on(&self, date: NaiveDate) -> &[Event] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Events overlapping `[from, to]`.
    ///
    /// A full-day range (00:00-23:59) returns that date's bucket directly.
    pub fn query(&self, from: NaiveDateTime, to: NaiveDateTime) -> CalResult<Vec<Event>> {
        let range = DateRange::new(from, to)?;

        if let Some(date) = range.single_day() {
            return Ok(self.events_on(date).to_vec());
        }
        Ok(self.filter(&EventFilter::new().overlapping(range)))
    }

    /// All events in date order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.by_date.values().flatten()
    }

    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&Event),
    {
        self.iter().for_each(f);
    }

    pub fn filter(&self, filter: &EventFilter) -> Vec<Event> {
        let mut found = Vec::new();
        self.for_each(|e| {
            if filter.matches(e) {
                found.push(e.clone());
            }
        });
        found
    }

    /// An event starts exactly at `at`, or `at` falls strictly inside one.
    pub fn is_busy(&self, at: NaiveDateTime) -> bool {
        self.iter()
            .any(|e| e.start() == at || (e.start() < at && at < e.end()))
    }
}

fn duplicate(event: &Event) -> CalError {
    CalError::DuplicateEvent {
        subject: event.subject().to_string(),
        start: event.start(),
    }
}
