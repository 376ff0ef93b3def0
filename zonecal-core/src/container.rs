//! The set of calendars a session works with, and which one is active.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::calendar::Calendar;
use crate::error::{CalError, CalResult};

/// Name of the calendar used when none has been selected.
pub const DEFAULT_CALENDAR: &str = "default";

/// Calendar properties that can be edited after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarProperty {
    Name,
    Timezone,
}

impl FromStr for CalendarProperty {
    type Err = CalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(CalendarProperty::Name),
            "timezone" => Ok(CalendarProperty::Timezone),
            _ => Err(CalError::InvalidProperty(s.trim().to_string())),
        }
    }
}

impl fmt::Display for CalendarProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarProperty::Name => f.write_str("name"),
            CalendarProperty::Timezone => f.write_str("timezone"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CalendarContainer {
    calendars: BTreeMap<String, Calendar>,
    active: Option<String>,
}

impl CalendarContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_calendar(&mut self, calendar: Calendar) -> CalResult<()> {
        if calendar.name().trim().is_empty() {
            return Err(CalError::InvalidValue(
                "Calendar name cannot be empty".to_string(),
            ));
        }
        if self.calendars.contains_key(calendar.name()) {
            return Err(CalError::AlreadyExists(calendar.name().to_string()));
        }

        info!(calendar = %calendar.name(), timezone = %calendar.timezone(), "added calendar");
        self.calendars.insert(calendar.name().to_string(), calendar);
        Ok(())
    }

    /// Rename a calendar or move it to another time zone.
    ///
    /// A rename that collides with an existing name restores the original entry.
    pub fn update_calendar(
        &mut self,
        name: &str,
        property: CalendarProperty,
        value: &str,
    ) -> CalResult<()> {
        match property {
            CalendarProperty::Name => {
                let original = self
                    .calendars
                    .remove(name)
                    .ok_or_else(|| calendar_not_found(name))?;
                let renamed = original.renamed(value.trim());

                if let Err(e) = self.add_calendar(renamed) {
                    self.calendars.insert(name.to_string(), original);
                    return Err(e);
                }

                if self.active.as_deref() == Some(name) {
                    self.active = Some(value.trim().to_string());
                }
                info!(from = %name, to = %value.trim(), "renamed calendar");
                Ok(())
            }
            CalendarProperty::Timezone => self.calendar_mut(name)?.change_timezone(value),
        }
    }

    pub fn set_active_calendar(&mut self, name: &str) -> CalResult<()> {
        if !self.calendars.contains_key(name) {
            return Err(calendar_not_found(name));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    /// The selected calendar, or the one named "default" when nothing was selected.
    pub fn active_calendar(&self) -> CalResult<&Calendar> {
        self.calendar(self.active_name())
    }

    pub fn active_calendar_mut(&mut self) -> CalResult<&mut Calendar> {
        let name = self.active_name().to_string();
        self.calendar_mut(&name)
    }

    pub fn active_name(&self) -> &str {
        self.active.as_deref().unwrap_or(DEFAULT_CALENDAR)
    }

    pub fn calendar(&self, name: &str) -> CalResult<&Calendar> {
        self.calendars
            .get(name)
            .ok_or_else(|| calendar_not_found(name))
    }

    pub fn calendar_mut(&mut self, name: &str) -> CalResult<&mut Calendar> {
        self.calendars
            .get_mut(name)
            .ok_or_else(|| calendar_not_found(name))
    }

    /// Calendars sorted by name.
    pub fn calendars(&self) -> impl Iterator<Item = &Calendar> {
        self.calendars.values()
    }
}

fn calendar_not_found(name: &str) -> CalError {
    CalError::NotFound(format!("Calendar with name {} not found", name))
}
