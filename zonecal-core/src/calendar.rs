//! A named calendar: one time zone and the events that live in it.

use chrono_tz::Tz;
use tracing::info;

use crate::error::{CalError, CalResult};
use crate::store::EventStore;
use crate::time::{convert_local, parse_timezone};

#[derive(Debug, Clone)]
pub struct Calendar {
    name: String,
    timezone: Tz,
    store: EventStore,
}

impl Calendar {
    pub fn new(name: impl Into<String>, timezone: Tz) -> Self {
        Calendar {
            name: name.into(),
            timezone,
            store: EventStore::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EventStore {
        &mut self.store
    }

    /// A copy of this calendar under a new name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Calendar {
            name: name.into(),
            timezone: self.timezone,
            store: self.store.clone(),
        }
    }

    /// Move every event to `zone`, keeping each absolute instant.
    ///
    /// The converted events are collected into a fresh store first. If two of them
    /// collide the calendar is left exactly as it was.
    pub fn change_timezone(&mut self, zone: &str) -> CalResult<()> {
        let target = parse_timezone(zone)?;
        if target == self.timezone {
            return Err(CalError::InvalidTimezone(format!(
                "Calendar {} is already in {}",
                self.name, target
            )));
        }

        let mut converted = EventStore::new();
        for event in self.store.iter() {
            let moved = event
                .to_builder()
                .start(convert_local(event.start(), self.timezone, target))
                .end(convert_local(event.end(), self.timezone, target))
                .build()?;
            converted.add(moved)?;
        }

        info!(
            calendar = %self.name,
            from = %self.timezone,
            to = %target,
            events = converted.len(),
            "converted calendar timezone"
        );
        self.timezone = target;
        self.store = converted;
        Ok(())
    }
}
