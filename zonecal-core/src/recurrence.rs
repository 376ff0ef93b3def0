//! Series generation.
//!
//! A series is expanded by walking forward one day at a time from the start date and
//! emitting an occurrence on every requested weekday. Candidates are buffered and
//! checked against the store; nothing is committed unless every candidate is clear.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use tracing::info;

use crate::error::{CalError, CalResult};
use crate::event::{Event, SeriesId};
use crate::store::EventStore;
use crate::time::{end_of_day, format_date_time};

/// Set of weekdays, written as letters `MTWRFSU` (Monday..Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Weekdays(u8);

impl Weekdays {
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    fn letter(day: Weekday) -> char {
        match day {
            Weekday::Mon => 'M',
            Weekday::Tue => 'T',
            Weekday::Wed => 'W',
            Weekday::Thu => 'R',
            Weekday::Fri => 'F',
            Weekday::Sat => 'S',
            Weekday::Sun => 'U',
        }
    }
}

impl FromStr for Weekdays {
    type Err = CalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut days = Weekdays::default();

        for c in s.trim().chars() {
            let day = match c {
                'M' => Weekday::Mon,
                'T' => Weekday::Tue,
                'W' => Weekday::Wed,
                'R' => Weekday::Thu,
                'F' => Weekday::Fri,
                'S' => Weekday::Sat,
                'U' => Weekday::Sun,
                other => {
                    return Err(CalError::InvalidValue(format!(
                        "Invalid day of week: {}",
                        other
                    )));
                }
            };
            days.insert(day);
        }

        if days.is_empty() {
            return Err(CalError::InvalidValue("At least one day of week is required".to_string()));
        }
        Ok(days)
    }
}

impl fmt::Display for Weekdays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut day = Weekday::Mon;
        for _ in 0..7 {
            if self.contains(day) {
                write!(f, "{}", Self::letter(day))?;
            }
            day = day.succ();
        }
        Ok(())
    }
}

/// When a series stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatBound {
    /// Exactly this many occurrences.
    Count(u32),
    /// Every matching day up to and including this date.
    Until(NaiveDate),
}

#[derive(Debug, Clone)]
pub struct SeriesRequest {
    pub subject: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub weekdays: Weekdays,
    pub bound: RepeatBound,
}

impl SeriesRequest {
    /// Expand into occurrences sharing one fresh series id, without touching any store.
    pub fn expand(&self) -> CalResult<Vec<Event>> {
        if self.end < self.start {
            return Err(CalError::InvalidValue("End is before start".to_string()));
        }
        if self.weekdays.is_empty() {
            return Err(CalError::InvalidValue("At least one day of week is required".to_string()));
        }

        let series_id = SeriesId::new();
        let duration = self.end - self.start;
        let occurrence = |date: NaiveDate| -> CalResult<Event> {
            let start = date.and_time(self.start.time());
            let end = start
                .checked_add_signed(duration)
                .ok_or_else(past_last_date)?;
            Event::builder(self.subject.clone(), start)
                .end(end)
                .series(series_id)
                .build()
        };

        let mut events = Vec::new();
        let mut date = self.start.date();

        match self.bound {
            RepeatBound::Count(0) => {
                return Err(CalError::InvalidValue(
                    "Repeat count must be greater than zero".to_string(),
                ));
            }
            RepeatBound::Count(count) => {
                loop {
                    if self.weekdays.contains(date.weekday()) {
                        events.push(occurrence(date)?);
                    }
                    if events.len() >= count as usize {
                        break;
                    }
                    date = date.succ_opt().ok_or_else(past_last_date)?;
                }
            }
            RepeatBound::Until(until) => {
                let until = until.and_time(end_of_day());
                if until < self.start {
                    return Err(CalError::InvalidValue(format!(
                        "Repeat until {} cannot be before start {}",
                        format_date_time(&until),
                        format_date_time(&self.start)
                    )));
                }
                loop {
                    if self.weekdays.contains(date.weekday()) {
                        events.push(occurrence(date)?);
                    }
                    if date >= until.date() {
                        break;
                    }
                    date = date.succ_opt().ok_or_else(past_last_date)?;
                }
            }
        }

        if events.is_empty() {
            return Err(CalError::InvalidValue(format!(
                "No {} days between {} and the repeat bound",
                self.weekdays,
                self.start.date()
            )));
        }
        Ok(events)
    }
}

fn past_last_date() -> CalError {
    CalError::InvalidValue("Series runs past the last supported date".to_string())
}

/// Expand `request`, check every occurrence against `store`, then commit them all.
///
/// On the first collision nothing has been inserted and the store is unchanged.
pub fn create_series(store: &mut EventStore, request: &SeriesRequest) -> CalResult<Vec<Event>> {
    let planned = request.expand()?;

    if let Some(conflict) = planned.iter().find(|e| store.contains(e)) {
        return Err(CalError::DuplicateEvent {
            subject: conflict.subject().to_string(),
            start: conflict.start(),
        });
    }

    let mut created = Vec::with_capacity(planned.len());
    for event in planned {
        created.push(store.add(event)?);
    }

    info!(
        subject = %request.subject,
        occurrences = created.len(),
        days = %request.weekdays,
        "created series"
    );
    Ok(created)
}
