//! Copying events from the active calendar into another calendar.
//!
//! Copies keep every field of the source event, its series id included. Range copies
//! move each event by its day offset from the range start and re-read its time of day
//! in the target calendar's zone.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::container::CalendarContainer;
use crate::date_range::DateRange;
use crate::error::{CalError, CalResult};
use crate::event::{Event, SeriesId};
use crate::filter::EventFilter;
use crate::time::convert_local;

pub const SPREAD_WARNING: &str =
    "WARNING: Series event in target calendar is spreading across multiple days";

/// Copy the events named `subject` on one date to an explicit start in another calendar.
#[derive(Debug, Clone)]
pub struct CopyEventRequest {
    pub subject: String,
    /// Only the date part selects source events.
    pub source_start: NaiveDateTime,
    pub target_calendar: String,
    /// Already in the target calendar's local time.
    pub target_start: NaiveDateTime,
}

/// Copy every event starting in `from..=to` so that `from` lands on `target_start`.
#[derive(Debug, Clone)]
pub struct CopyRangeRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub target_calendar: String,
    pub target_start: NaiveDate,
}

pub fn copy_event(
    container: &mut CalendarContainer,
    request: &CopyEventRequest,
) -> CalResult<Vec<Event>> {
    let source = container.active_calendar()?;
    container.calendar(&request.target_calendar)?;

    let matches: Vec<Event> = source
        .store()
        .filter(
            &EventFilter::new()
                .subject_ignore_case(request.subject.clone())
                .start_date(request.source_start.date()),
        );

    if matches.is_empty() {
        return Err(CalError::NotFound(format!(
            "No matching event to copy in: {}",
            source.name()
        )));
    }

    let planned = matches
        .iter()
        .map(|event| {
            event
                .to_builder()
                .start(request.target_start)
                .end(request.target_start + event.duration())
                .build()
        })
        .collect::<CalResult<Vec<_>>>()?;

    insert_all(container, &request.target_calendar, planned)
}

pub fn copy_events(
    container: &mut CalendarContainer,
    request: &CopyRangeRequest,
) -> CalResult<Vec<Event>> {
    let source = container.active_calendar()?;
    let target_zone = container.calendar(&request.target_calendar)?.timezone();
    let source_zone = source.timezone();

    let window = DateRange::days(request.from, request.to)?;
    let candidates = source
        .store()
        .filter(&EventFilter::new().starting_within(window));

    if candidates.is_empty() {
        return Err(CalError::NotFound(format!(
            "No matching event to copy in: {}",
            source.name()
        )));
    }

    // Series members are grouped behind their first member in the window.
    let mut seen: HashSet<SeriesId> = HashSet::new();
    let mut ordered: Vec<&Event> = Vec::with_capacity(candidates.len());
    for event in &candidates {
        if !event.is_series() {
            ordered.push(event);
        } else if seen.insert(event.series_id()) {
            ordered.extend(
                candidates
                    .iter()
                    .filter(|member| member.series_id() == event.series_id()),
            );
        }
    }

    let planned = ordered
        .into_iter()
        .map(|event| shift_into(event, request, source_zone, target_zone))
        .collect::<CalResult<Vec<_>>>()?;

    insert_all(container, &request.target_calendar, planned)
}

/// Target placement for one event of a range copy.
fn shift_into(event: &Event, request: &CopyRangeRequest, from: Tz, to: Tz) -> CalResult<Event> {
    let offset = event.start_date() - request.from;
    let mut date = request.target_start + offset;

    if event.is_series() {
        date = next_or_same(date, event.start_date().weekday());
    }

    let time = convert_local(event.start(), from, to).time();
    let start = date.and_time(time);

    event
        .to_builder()
        .start(start)
        .end(start + event.duration())
        .build()
}

fn next_or_same(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(i64::from(ahead))
}

/// Add copies one at a time. Earlier copies stay when a later one collides.
fn insert_all(
    container: &mut CalendarContainer,
    target: &str,
    planned: Vec<Event>,
) -> CalResult<Vec<Event>> {
    let store = container.calendar_mut(target)?.store_mut();
    let mut copied = Vec::with_capacity(planned.len());

    for event in planned {
        match store.add(event) {
            Ok(added) => copied.push(added),
            Err(e) => {
                if !copied.is_empty() {
                    warn!(copied = copied.len(), calendar = %target, "copy stopped part way");
                }
                return Err(e);
            }
        }
    }

    debug!(copied = copied.len(), calendar = %target, "copied events");
    Ok(copied)
}

/// `Copied Events:` followed by one line per copy, each series copy that now
/// crosses midnight preceded by a warning line.
pub fn render_copied(events: &[Event]) -> String {
    let mut out = String::from("Copied Events:\n");
    for event in events {
        if event.is_series() && event.spans_multiple_days() {
            out.push_str(SPREAD_WARNING);
            out.push('\n');
        }
        out.push_str(&event.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use crate::container::DEFAULT_CALENDAR;
    use crate::recurrence::{RepeatBound, SeriesRequest, create_series};
    use crate::time::{parse_date, parse_date_time};

    fn dt(s: &str) -> NaiveDateTime {
        parse_date_time(s).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn make_test_container(source: Tz, target: Tz) -> CalendarContainer {
        let mut container = CalendarContainer::new();
        container
            .add_calendar(Calendar::new(DEFAULT_CALENDAR, source))
            .unwrap();
        container.add_calendar(Calendar::new("Target", target)).unwrap();
        container
    }

    fn add_mondays(container: &mut CalendarContainer, start: &str, end: &str) -> SeriesId {
        let events = create_series(
            container.active_calendar_mut().unwrap().store_mut(),
            &SeriesRequest {
                subject: "Planning".to_string(),
                start: dt(start),
                end: dt(end),
                weekdays: "M".parse().unwrap(),
                bound: RepeatBound::Count(2),
            },
        )
        .unwrap();
        events[0].series_id()
    }

    #[test]
    fn test_copy_event_keeps_duration_and_series() {
        let mut container = make_test_container(chrono_tz::UTC, chrono_tz::UTC);
        let series_id = add_mondays(&mut container, "2025-06-02T10:00", "2025-06-02T11:30");

        let copied = copy_event(
            &mut container,
            &CopyEventRequest {
                subject: "planning".to_string(),
                source_start: dt("2025-06-02T00:00"),
                target_calendar: "Target".to_string(),
                target_start: dt("2025-08-20T15:00"),
            },
        )
        .unwrap();

        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].end(), dt("2025-08-20T16:30"));
        assert_eq!(copied[0].series_id(), series_id);
        assert_eq!(container.calendar("Target").unwrap().store().len(), 1);
    }

    #[test]
    fn test_copy_event_no_match() {
        let mut container = make_test_container(chrono_tz::UTC, chrono_tz::UTC);
        add_mondays(&mut container, "2025-06-02T10:00", "2025-06-02T11:00");

        let result = copy_event(
            &mut container,
            &CopyEventRequest {
                subject: "Planning".to_string(),
                source_start: dt("2025-06-03T10:00"),
                target_calendar: "Target".to_string(),
                target_start: dt("2025-08-20T15:00"),
            },
        );
        assert!(matches!(result, Err(CalError::NotFound(_))));
    }

    #[test]
    fn test_copy_to_unknown_calendar() {
        let mut container = make_test_container(chrono_tz::UTC, chrono_tz::UTC);
        add_mondays(&mut container, "2025-06-02T10:00", "2025-06-02T11:00");

        let result = copy_events(
            &mut container,
            &CopyRangeRequest {
                from: d("2025-06-01"),
                to: d("2025-06-30"),
                target_calendar: "Nowhere".to_string(),
                target_start: d("2025-07-01"),
            },
        );
        assert!(matches!(result, Err(CalError::NotFound(_))));
    }

    #[test]
    fn test_copy_range_nothing_in_window() {
        let mut container = make_test_container(chrono_tz::UTC, chrono_tz::UTC);
        add_mondays(&mut container, "2025-06-02T10:00", "2025-06-02T11:00");

        // 2025-06-03 is a Tuesday, between the two Mondays
        let result = copy_events(
            &mut container,
            &CopyRangeRequest {
                from: d("2025-06-03"),
                to: d("2025-06-03"),
                target_calendar: "Target".to_string(),
                target_start: d("2025-07-01"),
            },
        );

        match result {
            Err(CalError::NotFound(msg)) => {
                assert_eq!(msg, "No matching event to copy in: default")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(container.calendar("Target").unwrap().store().is_empty());
    }

    #[test]
    fn test_copy_range_realigns_series_weekday() {
        let mut container = make_test_container(chrono_tz::UTC, chrono_tz::UTC);
        add_mondays(&mut container, "2025-06-02T10:00", "2025-06-02T11:00");

        // 2025-07-01 is a Tuesday
        let copied = copy_events(
            &mut container,
            &CopyRangeRequest {
                from: d("2025-06-02"),
                to: d("2025-06-09"),
                target_calendar: "Target".to_string(),
                target_start: d("2025-07-01"),
            },
        )
        .unwrap();

        let starts: Vec<_> = copied.iter().map(|e| e.start()).collect();
        assert_eq!(starts, vec![dt("2025-07-07T10:00"), dt("2025-07-14T10:00")]);
        assert!(copied.iter().all(|e| e.start().weekday() == Weekday::Mon));
    }

    #[test]
    fn test_copy_range_converts_time_of_day() {
        let mut container =
            make_test_container(chrono_tz::America::New_York, chrono_tz::Europe::London);
        container
            .active_calendar_mut()
            .unwrap()
            .store_mut()
            .add(
                Event::builder("Lunch", dt("2025-06-03T12:00"))
                    .end(dt("2025-06-03T13:00"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let copied = copy_events(
            &mut container,
            &CopyRangeRequest {
                from: d("2025-06-03"),
                to: d("2025-06-03"),
                target_calendar: "Target".to_string(),
                target_start: d("2025-06-10"),
            },
        )
        .unwrap();

        assert_eq!(copied[0].start(), dt("2025-06-10T17:00"));
        assert_eq!(copied[0].end(), dt("2025-06-10T18:00"));
    }

    #[test]
    fn test_render_warns_on_series_crossing_midnight() {
        let mut container = make_test_container(chrono_tz::UTC, chrono_tz::Asia::Tokyo);
        add_mondays(&mut container, "2025-06-02T13:00", "2025-06-02T15:00");

        let copied = copy_events(
            &mut container,
            &CopyRangeRequest {
                from: d("2025-06-02"),
                to: d("2025-06-02"),
                target_calendar: "Target".to_string(),
                target_start: d("2025-06-16"),
            },
        )
        .unwrap();

        // 13:00 UTC is 22:00 in Tokyo, so the two hour meeting ends the next day
        assert_eq!(copied[0].start(), dt("2025-06-16T22:00"));
        let text = render_copied(&copied);
        assert!(text.starts_with("Copied Events:\n"));
        assert!(text.contains(SPREAD_WARNING));
    }

    #[test]
    fn test_copy_range_collision_keeps_earlier_copies() {
        let mut container = make_test_container(chrono_tz::UTC, chrono_tz::UTC);
        add_mondays(&mut container, "2025-06-02T10:00", "2025-06-02T11:00");
        container
            .calendar_mut("Target")
            .unwrap()
            .store_mut()
            .add(
                Event::builder("Planning", dt("2025-06-16T10:00"))
                    .end(dt("2025-06-16T11:00"))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let result = copy_events(
            &mut container,
            &CopyRangeRequest {
                from: d("2025-06-02"),
                to: d("2025-06-09"),
                target_calendar: "Target".to_string(),
                target_start: d("2025-06-09"),
            },
        );

        assert!(matches!(result, Err(CalError::DuplicateEvent { .. })));
        assert_eq!(container.calendar("Target").unwrap().store().len(), 2);
    }

    #[test]
    fn test_next_or_same() {
        assert_eq!(next_or_same(d("2025-07-01"), Weekday::Mon), d("2025-07-07"));
        assert_eq!(next_or_same(d("2025-07-07"), Weekday::Mon), d("2025-07-07"));
    }
}
