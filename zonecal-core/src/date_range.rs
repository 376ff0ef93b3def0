//! Date range for filtering events.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CalError, CalResult};
use crate::event::Event;
use crate::time::end_of_day;

/// Inclusive civil date-time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> CalResult<Self> {
        if to < from {
            return Err(CalError::InvalidValue(
                "Range end cannot be before range start".to_string(),
            ));
        }
        Ok(DateRange { from, to })
    }

    /// 00:00 to 23:59 on one date.
    pub fn on(date: NaiveDate) -> Self {
        DateRange {
            from: date.and_time(NaiveTime::MIN),
            to: date.and_time(end_of_day()),
        }
    }

    /// Whole days from the start of `start` to the last second of `end`.
    pub fn days(start: NaiveDate, end: NaiveDate) -> CalResult<Self> {
        Self::new(
            start.and_time(NaiveTime::MIN),
            end.and_hms_opt(23, 59, 59).unwrap(),
        )
    }

    /// The date this range covers when it is exactly 00:00-23:59 of a single day.
    pub fn single_day(&self) -> Option<NaiveDate> {
        let same_day = self.from.date() == self.to.date();
        (same_day && self.from.time() == NaiveTime::MIN && self.to.time() == end_of_day())
            .then(|| self.from.date())
    }

    /// `event.end >= from && event.start <= to`
    pub fn overlaps(&self, event: &Event) -> bool {
        event.end() >= self.from && event.start() <= self.to
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.from && at <= self.to
    }
}
