//! Structured command records and their dispatch onto a [`CalendarContainer`].
//!
//! Every handler returns the text shown to the user on success. Errors carry their
//! own message and leave the session usable.

use std::fmt::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::container::{CalendarContainer, CalendarProperty};
use crate::copy::{CopyEventRequest, CopyRangeRequest, copy_event, copy_events, render_copied};
use crate::create::{CreateRequest, Created, EventSpan, create_event};
use crate::date_range::DateRange;
use crate::delete::delete_events;
use crate::edit::{EditRequest, EditScope, EventLocator, EventProperty, edit_events};
use crate::error::{CalError, CalResult};
use crate::event::Event;
use crate::export::export_calendar;
use crate::recurrence::{RepeatBound, Weekdays};
use crate::time::{format_date_time, parse_date, parse_date_time, parse_timezone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    CreateEvent(CreateEventData),
    EditEvent(EditEventData),
    DeleteEvent(DeleteEventData),
    CopyEvent(CopyEventData),
    CopyEvents(CopyEventsData),
    CreateCalendar(CreateCalendarData),
    EditCalendar(EditCalendarData),
    UseCalendar(UseCalendarData),
    PrintEvents(PrintEventsData),
    ShowStatus(ShowStatusData),
    Export(ExportData),
}

/// `start`/`end` for a timed event, or `on` alone for an all-day one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventData {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatData>,
}

/// Weekday letters (`MTWRFSU`) and exactly one of `times` or `until`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatData {
    pub weekdays: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditEventData {
    pub property: String,
    pub subject: String,
    pub start: String,
    /// Required when `scope` is `single`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    pub value: String,
    #[serde(default)]
    pub scope: EditScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEventData {
    pub subject: String,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default)]
    pub scope: EditScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyEventData {
    pub subject: String,
    /// Date-time whose date selects the source events.
    pub on: String,
    pub target: String,
    /// Start in the target calendar's local time.
    pub to: String,
}

/// `on` one date or `between` two dates, copied to start at date `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyEventsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub between: Option<(String, String)>,
    pub target: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCalendarData {
    pub name: String,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditCalendarData {
    pub name: String,
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCalendarData {
    pub name: String,
}

/// `on` one date, or `between` two date-times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintEventsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub between: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowStatusData {
    pub on: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportData {
    pub file: String,
}

/// Run one command against `container`, returning the text to show.
pub fn dispatch(container: &mut CalendarContainer, command: Command) -> CalResult<String> {
    match command {
        Command::CreateEvent(data) => handle_create_event(container, data),
        Command::EditEvent(data) => handle_edit_event(container, data),
        Command::DeleteEvent(data) => handle_delete_event(container, data),
        Command::CopyEvent(data) => handle_copy_event(container, data),
        Command::CopyEvents(data) => handle_copy_events(container, data),
        Command::CreateCalendar(data) => {
            let timezone = parse_timezone(&data.timezone)?;
            container.add_calendar(Calendar::new(data.name.trim(), timezone))?;
            Ok(format!(
                "Calendar with name {} has been successfully created",
                data.name.trim()
            ))
        }
        Command::EditCalendar(data) => {
            let property: CalendarProperty = data.property.parse()?;
            container.update_calendar(data.name.trim(), property, &data.value)?;
            Ok(format!("Calendar {} edited successfully", property))
        }
        Command::UseCalendar(data) => {
            let name = data.name.trim();
            container.set_active_calendar(name)?;
            Ok(format!("Now you are using calendar {}", name))
        }
        Command::PrintEvents(data) => handle_print_events(container, data),
        Command::ShowStatus(data) => {
            let at = parse_date_time(&data.on)?;
            if container.active_calendar()?.store().is_busy(at) {
                Ok("User is Busy".to_string())
            } else {
                Ok("User is Available".to_string())
            }
        }
        Command::Export(data) => {
            let path = export_calendar(container.active_calendar()?, Path::new(&data.file))?;
            Ok(format!("Successfully exported to: {}", path.display()))
        }
    }
}

fn handle_create_event(
    container: &mut CalendarContainer,
    data: CreateEventData,
) -> CalResult<String> {
    let span = match (&data.start, &data.on) {
        (Some(start), None) => {
            let end = data.end.as_deref().map(parse_date_time).transpose()?;
            EventSpan::timed(parse_date_time(start)?, end)
        }
        (None, Some(on)) if data.end.is_none() => EventSpan::AllDay(parse_date(on)?),
        _ => {
            return Err(CalError::InvalidValue(
                "Give either a start (with optional end) or a single date".to_string(),
            ));
        }
    };

    let repeat = match &data.repeat {
        None => None,
        Some(repeat) => {
            let bound = match (repeat.times, &repeat.until) {
                (Some(times), None) => RepeatBound::Count(times),
                (None, Some(until)) => RepeatBound::Until(parse_date(until)?),
                _ => {
                    return Err(CalError::InvalidValue(
                        "Invalid repetition: give either times or until".to_string(),
                    ));
                }
            };
            Some((repeat.weekdays.parse::<Weekdays>()?, bound))
        }
    };

    let request = CreateRequest {
        subject: data.subject,
        span,
        repeat,
    };

    let created = create_event(container.active_calendar_mut()?.store_mut(), &request)?;
    let header = match created {
        Created::Single(_) => "Created Event:",
        Created::Series(_) => "Created a Series Event:",
    };
    Ok(render_list(header, created.events()))
}

fn handle_edit_event(container: &mut CalendarContainer, data: EditEventData) -> CalResult<String> {
    let request = EditRequest {
        scope: data.scope,
        property: data.property.parse::<EventProperty>()?,
        locator: locator(data.subject, &data.start, data.end.as_deref())?,
        value: data.value,
    };

    let edited = edit_events(container.active_calendar_mut()?.store_mut(), &request)?;
    Ok(render_list("Event updated:", &edited))
}

fn handle_delete_event(
    container: &mut CalendarContainer,
    data: DeleteEventData,
) -> CalResult<String> {
    let locator = locator(data.subject, &data.start, data.end.as_deref())?;
    let removed = delete_events(
        container.active_calendar_mut()?.store_mut(),
        data.scope,
        &locator,
    )?;

    Ok(match data.scope {
        EditScope::Single => render_list("Deleted event:", &removed),
        EditScope::From => format!("Deleted {} event(s)\n", removed.len()),
        EditScope::Series => format!("Deleted {} event(s) from series\n", removed.len()),
    })
}

fn handle_copy_event(container: &mut CalendarContainer, data: CopyEventData) -> CalResult<String> {
    let request = CopyEventRequest {
        subject: data.subject,
        source_start: parse_date_time(&data.on)?,
        target_calendar: data.target,
        target_start: parse_date_time(&data.to)?,
    };
    let copied = copy_event(container, &request)?;
    Ok(render_copied(&copied))
}

fn handle_copy_events(
    container: &mut CalendarContainer,
    data: CopyEventsData,
) -> CalResult<String> {
    let (from, to) = match (&data.on, &data.between) {
        (Some(on), None) => {
            let date = parse_date(on)?;
            (date, date)
        }
        (None, Some((from, to))) => (parse_date(from)?, parse_date(to)?),
        _ => {
            return Err(CalError::InvalidValue(
                "Give either a single date or a pair of dates to copy".to_string(),
            ));
        }
    };

    let request = CopyRangeRequest {
        from,
        to,
        target_calendar: data.target,
        target_start: parse_date(&data.to)?,
    };
    let copied = copy_events(container, &request)?;
    Ok(render_copied(&copied))
}

fn handle_print_events(container: &CalendarContainer, data: PrintEventsData) -> CalResult<String> {
    let store = container.active_calendar()?.store();

    let (events, on_date) = match (&data.on, &data.between) {
        (Some(on), None) => {
            let day = DateRange::on(parse_date(on)?);
            (store.query(day.from, day.to)?, true)
        }
        (None, Some((from, to))) => {
            let from = parse_date_time(from)?;
            let to = parse_date_time(to)?;
            (store.query(from, to)?, false)
        }
        _ => {
            return Err(CalError::InvalidValue(
                "Give either a date or a pair of date-times to print".to_string(),
            ));
        }
    };

    if events.is_empty() {
        return Err(CalError::NotFound(
            "No Events found with the given details".to_string(),
        ));
    }

    let mut out = String::new();
    for event in &events {
        if on_date {
            let _ = writeln!(
                out,
                "> Subject: {}, StartDateTime: {}, EndDateTime: {}, Location: {}",
                event.subject(),
                format_date_time(&event.start()),
                format_date_time(&event.end()),
                event.location()
            );
        } else {
            let _ = writeln!(
                out,
                "> {} starting on {} at {}, ending on {} at {}",
                event.subject(),
                event.start().date(),
                event.start().time().format("%H:%M"),
                event.end().date(),
                event.end().time().format("%H:%M")
            );
        }
    }
    Ok(out)
}

fn locator(subject: String, start: &str, end: Option<&str>) -> CalResult<EventLocator> {
    Ok(EventLocator {
        subject,
        start: parse_date_time(start)?,
        end: end.map(parse_date_time).transpose()?,
    })
}

fn render_list(header: &str, events: &[Event]) -> String {
    let mut out = format!("{}\n", header);
    for event in events {
        let _ = writeln!(out, "{}", event);
    }
    out
}
