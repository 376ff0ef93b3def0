//! iCalendar export.

use chrono::NaiveDateTime;
use icalendar::{Calendar as IcsCalendar, Component, EventLike, Property};
use uuid::Uuid;

use crate::calendar::Calendar;
use crate::event::{Event, EventStatus, Location};

/// One VEVENT per event, with start and end tagged with the calendar's zone.
pub fn generate_ics(calendar: &Calendar) -> String {
    let mut cal = IcsCalendar::new();
    cal.name(calendar.name());
    let tzid = calendar.timezone().name();

    for event in calendar.store().iter() {
        cal.push(to_vevent(event, tzid));
    }

    strip_ics_bloat(&cal.done().to_string())
}

fn to_vevent(event: &Event, tzid: &str) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&Uuid::new_v4().to_string());
    ics_event.summary(event.subject());
    ics_event.add_property(
        "DTSTAMP",
        chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string(),
    );

    add_zoned_property(&mut ics_event, "DTSTART", event.start(), tzid);
    add_zoned_property(&mut ics_event, "DTEND", event.end(), tzid);

    ics_event.description(event.description());

    if event.location() != Location::Unknown {
        ics_event.location(event.location().as_str());
    }

    match event.status() {
        EventStatus::Public => {
            ics_event.add_property("CLASS", "PUBLIC");
        }
        EventStatus::Private => {
            ics_event.add_property("CLASS", "PRIVATE");
        }
        EventStatus::Unknown => {}
    }

    ics_event.done()
}

fn add_zoned_property(ics_event: &mut icalendar::Event, name: &str, at: NaiveDateTime, tzid: &str) {
    let mut prop = Property::new(name, at.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", tzid);
    ics_event.append_property(prop);
}

/// Replace PRODID and drop CALSCALE:GREGORIAN (the default).
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:ZONECAL\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
