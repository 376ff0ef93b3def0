//! Event creation: single, all-day, multi-day and recurring.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CalError, CalResult};
use crate::event::Event;
use crate::recurrence::{RepeatBound, SeriesRequest, Weekdays, create_series};
use crate::store::EventStore;
use crate::time::{all_day_end, all_day_start, end_of_day};

/// When the new event happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSpan {
    /// Explicit start and end.
    Timed {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// The canonical 08:00-17:00 window on one date.
    AllDay(NaiveDate),
}

impl EventSpan {
    /// A timed span that defaults to one hour when `end` is missing.
    pub fn timed(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Self {
        EventSpan::Timed {
            start,
            end: end.unwrap_or(start + Duration::hours(1)),
        }
    }

    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        match *self {
            EventSpan::Timed { start, end } => (start, end),
            EventSpan::AllDay(date) => (
                date.and_time(all_day_start()),
                date.and_time(all_day_end()),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub subject: String,
    pub span: EventSpan,
    pub repeat: Option<(Weekdays, RepeatBound)>,
}

/// What a create produced.
#[derive(Debug, Clone)]
pub enum Created {
    /// One event, or one piece per day when the span crossed midnight.
    Single(Vec<Event>),
    Series(Vec<Event>),
}

impl Created {
    pub fn events(&self) -> &[Event] {
        match self {
            Created::Single(events) | Created::Series(events) => events,
        }
    }
}

pub fn create_event(store: &mut EventStore, request: &CreateRequest) -> CalResult<Created> {
    let (start, end) = request.span.bounds();

    if end < start {
        return Err(CalError::InvalidValue("End is before start".to_string()));
    }

    if let Some((weekdays, bound)) = request.repeat {
        let series = SeriesRequest {
            subject: request.subject.clone(),
            start,
            end,
            weekdays,
            bound,
        };
        return create_series(store, &series).map(Created::Series);
    }

    let pieces = split_by_day(&request.subject, start, end)?;

    // Validate every piece first so a multi-day create is all-or-nothing.
    if let Some(conflict) = pieces.iter().find(|e| store.contains(e)) {
        return Err(CalError::DuplicateEvent {
            subject: conflict.subject().to_string(),
            start: conflict.start(),
        });
    }

    let mut created = Vec::with_capacity(pieces.len());
    for piece in pieces {
        created.push(store.add(piece)?);
    }
    Ok(Created::Single(created))
}

/// One event per civil day: first day to 23:59, middle days 00:00-23:59, last day from 00:00.
fn split_by_day(subject: &str, start: NaiveDateTime, end: NaiveDateTime) -> CalResult<Vec<Event>> {
    let mut pieces = Vec::new();
    let mut date = start.date();

    while date <= end.date() {
        let piece_start = if date == start.date() {
            start
        } else {
            date.and_time(NaiveTime::MIN)
        };
        let piece_end = if date == end.date() {
            end
        } else {
            date.and_time(end_of_day())
        };

        pieces.push(Event::builder(subject, piece_start).end(piece_end).build()?);
        date += Duration::days(1);
    }

    Ok(pieces)
}
