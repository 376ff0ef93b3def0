//! Scoped event edits.
//!
//! An edit locates anchor events by subject and start (plus end for the single
//! scope), widens each anchor to its scope, builds a replacement value for every
//! target and swaps it into the store. Each swap is atomic on its own; a batch that
//! fails part way keeps the swaps already made.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CalError, CalResult};
use crate::event::{Event, EventStatus, Location, SeriesId};
use crate::filter::EventFilter;
use crate::store::EventStore;
use crate::time::{format_date_time, parse_date_time};

/// Which part of a series an edit or delete applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditScope {
    /// The one event matching subject, start and end.
    #[default]
    Single,
    /// The anchor and every later member of its series.
    From,
    /// Every member of the anchor's series.
    Series,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventProperty {
    Subject,
    Start,
    End,
    Description,
    Location,
    Status,
}

impl FromStr for EventProperty {
    type Err = CalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "subject" => Ok(EventProperty::Subject),
            "start" => Ok(EventProperty::Start),
            "end" => Ok(EventProperty::End),
            "description" => Ok(EventProperty::Description),
            "location" => Ok(EventProperty::Location),
            "status" => Ok(EventProperty::Status),
            _ => Err(CalError::InvalidProperty(s.trim().to_string())),
        }
    }
}

impl fmt::Display for EventProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventProperty::Subject => "subject",
            EventProperty::Start => "start",
            EventProperty::End => "end",
            EventProperty::Description => "description",
            EventProperty::Location => "location",
            EventProperty::Status => "status",
        };
        f.write_str(name)
    }
}

/// Lookup key for edit and delete anchors.
#[derive(Debug, Clone)]
pub struct EventLocator {
    pub subject: String,
    pub start: NaiveDateTime,
    /// Required by the single scope, ignored by the others.
    pub end: Option<NaiveDateTime>,
}

impl fmt::Display for EventLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' starting {}", self.subject, format_date_time(&self.start))?;
        if let Some(end) = &self.end {
            write!(f, " ending {}", format_date_time(end))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct EditRequest {
    pub scope: EditScope,
    pub property: EventProperty,
    pub locator: EventLocator,
    pub value: String,
}

/// Anchors for `locator`, each widened to the events `scope` covers.
///
/// Series are visited once even if several anchors belong to them. An empty result
/// means nothing matched the locator.
pub(crate) fn resolve_targets(
    store: &EventStore,
    scope: EditScope,
    locator: &EventLocator,
) -> CalResult<Vec<Vec<Event>>> {
    let mut lookup = EventFilter::new()
        .subject(locator.subject.clone())
        .start(locator.start);

    if scope == EditScope::Single {
        let end = locator.end.ok_or_else(|| {
            CalError::InvalidValue("An end date-time is required to select a single event".into())
        })?;
        lookup = lookup.end(end);
    }

    let mut seen: HashSet<SeriesId> = HashSet::new();
    let mut groups = Vec::new();

    for anchor in store.filter(&lookup) {
        if scope == EditScope::Single || !anchor.is_series() {
            groups.push(vec![anchor]);
            continue;
        }
        if !seen.insert(anchor.series_id()) {
            continue;
        }

        let mut members = EventFilter::new().series_id(anchor.series_id());
        if scope == EditScope::From {
            members = members.starts_at_or_after(anchor.start());
        }
        groups.push(store.filter(&members));
    }

    Ok(groups)
}

/// Apply `request` and return the replacement events in the order they were stored.
pub fn edit_events(store: &mut EventStore, request: &EditRequest) -> CalResult<Vec<Event>> {
    let groups = resolve_targets(store, request.scope, &request.locator)?;

    if groups.is_empty() {
        return Err(CalError::NotFound(format!(
            "No events found for {}",
            request.locator
        )));
    }

    let mut edited = Vec::new();

    for targets in groups {
        let batch = request.scope != EditScope::Single && targets.len() > 1;
        // A batch start edit moves the edited members into a series of their own.
        let batch_series = SeriesId::new();

        for old in &targets {
            let replacement = if batch {
                edit_in_batch(old, request.property, &request.value, batch_series)
            } else {
                edit_one(old, request.property, &request.value)
            };

            let result = replacement.and_then(|new| store.replace(old, new));
            match result {
                Ok(new) => edited.push(new),
                Err(e) => {
                    if !edited.is_empty() {
                        warn!(
                            applied = edited.len(),
                            property = %request.property,
                            "edit stopped part way through a batch"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }

    info!(
        property = %request.property,
        scope = ?request.scope,
        count = edited.len(),
        "edited events"
    );
    Ok(edited)
}

/// Edit a lone event. A new start is taken literally and detaches series members.
fn edit_one(event: &Event, property: EventProperty, value: &str) -> CalResult<Event> {
    match property {
        EventProperty::Start => {
            let start = parse_date_time(value)?;
            let builder = if event.is_series() {
                event.to_builder().detached()
            } else {
                event.to_builder()
            };
            builder.start(start).build()
        }
        EventProperty::End => event.to_builder().end(parse_date_time(value)?).build(),
        _ => edit_plain(event, property, value),
    }
}

/// Edit one member of a batch. Start and end keep each member's own date and take
/// only the time of day from `value`.
fn edit_in_batch(
    event: &Event,
    property: EventProperty,
    value: &str,
    batch_series: SeriesId,
) -> CalResult<Event> {
    match property {
        EventProperty::Start => {
            let time = parse_date_time(value)?.time();
            event
                .to_builder()
                .series_id(batch_series)
                .start(event.start().date().and_time(time))
                .build()
        }
        EventProperty::End => {
            let time = parse_date_time(value)?.time();
            event
                .to_builder()
                .end(event.end().date().and_time(time))
                .build()
        }
        _ => edit_plain(event, property, value),
    }
}

fn edit_plain(event: &Event, property: EventProperty, value: &str) -> CalResult<Event> {
    let builder = event.to_builder();
    let builder = match property {
        EventProperty::Subject => builder.subject(value),
        EventProperty::Description => builder.description(value),
        EventProperty::Location => builder.location(Location::parse_lenient(value)),
        EventProperty::Status => builder.status(EventStatus::parse_lenient(value)),
        EventProperty::Start | EventProperty::End => {
            return Err(CalError::InvalidProperty(property.to_string()));
        }
    };
    builder.build()
}
