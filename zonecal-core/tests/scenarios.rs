//! End-to-end command scenarios driven through `dispatch`.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use zonecal_core::command::{Command, dispatch};
use zonecal_core::container::{CalendarContainer, DEFAULT_CALENDAR};
use zonecal_core::{Calendar, CalError};

#[derive(Deserialize)]
struct Script {
    commands: Vec<Command>,
}

fn make_test_container() -> CalendarContainer {
    let mut container = CalendarContainer::new();
    container
        .add_calendar(Calendar::new(DEFAULT_CALENDAR, chrono_tz::UTC))
        .unwrap();
    container
}

/// Run every command, panicking on the first failure.
fn run(container: &mut CalendarContainer, script: &str) -> Vec<String> {
    let script: Script = toml::from_str(script).unwrap();
    script
        .commands
        .into_iter()
        .map(|command| dispatch(container, command).unwrap())
        .collect()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

const STANDUP: &str = r#"
[[commands]]
command = "create_calendar"
name = "Work"
timezone = "America/New_York"

[[commands]]
command = "use_calendar"
name = "Work"

[[commands]]
command = "create_event"
subject = "Standup"
start = "2025-06-02T09:00"
end = "2025-06-02T09:15"
repeat = { weekdays = "MWF", times = 3 }
"#;

#[test]
fn test_standup_series_rename() {
    let mut container = make_test_container();
    let out = run(&mut container, STANDUP);
    assert!(out[2].starts_with("Created a Series Event:"));

    let work = container.calendar("Work").unwrap();
    let events: Vec<_> = work.store().iter().cloned().collect();
    let dates: Vec<_> = events.iter().map(|e| e.start_date()).collect();
    assert_eq!(
        dates,
        vec![date("2025-06-02"), date("2025-06-04"), date("2025-06-06")]
    );
    assert!(events.iter().all(|e| e.series_id() == events[0].series_id()));

    run(
        &mut container,
        r#"
[[commands]]
command = "edit_event"
scope = "series"
property = "subject"
subject = "Standup"
start = "2025-06-04T09:00"
value = "Daily Sync"
"#,
    );

    let work = container.calendar("Work").unwrap();
    assert_eq!(work.store().len(), 3);
    assert!(work.store().iter().all(|e| e.subject() == "Daily Sync"));
}

#[test]
fn test_series_collision_commits_nothing() {
    let mut container = make_test_container();
    run(
        &mut container,
        r#"
[[commands]]
command = "create_event"
subject = "Standup"
start = "2025-06-06T09:00"
end = "2025-06-06T09:15"
"#,
    );

    let script: Script = toml::from_str(
        r#"
[[commands]]
command = "create_event"
subject = "Standup"
start = "2025-06-02T09:00"
end = "2025-06-02T09:15"
repeat = { weekdays = "MWF", times = 3 }
"#,
    )
    .unwrap();
    let result = dispatch(&mut container, script.commands[0].clone());

    assert!(matches!(result, Err(CalError::DuplicateEvent { .. })));
    assert_eq!(container.active_calendar().unwrap().store().len(), 1);
}

#[test]
fn test_detach_then_delete_rest_of_series() {
    let mut container = make_test_container();
    run(&mut container, STANDUP);

    let out = run(
        &mut container,
        r#"
[[commands]]
command = "edit_event"
property = "start"
subject = "Standup"
start = "2025-06-04T09:00"
end = "2025-06-04T09:15"
value = "2025-06-04T08:45"

[[commands]]
command = "delete_event"
scope = "series"
subject = "Standup"
start = "2025-06-02T09:00"
"#,
    );

    assert!(out[0].contains("Type: SINGLE"));
    assert_eq!(out[1], "Deleted 2 event(s) from series\n");

    let left: Vec<_> = container
        .active_calendar()
        .unwrap()
        .store()
        .iter()
        .map(|e| e.start().to_string())
        .collect();
    assert_eq!(left, vec!["2025-06-04 08:45:00"]);
}

#[test]
fn test_timezone_round_trip_through_commands() {
    let mut container = make_test_container();
    run(&mut container, STANDUP);
    let before: Vec<_> = container
        .calendar("Work")
        .unwrap()
        .store()
        .iter()
        .map(|e| (e.start(), e.end()))
        .collect();

    run(
        &mut container,
        r#"
[[commands]]
command = "edit_calendar"
name = "Work"
property = "timezone"
value = "Australia/Sydney"

[[commands]]
command = "edit_calendar"
name = "Work"
property = "timezone"
value = "America/New_York"
"#,
    );

    let after: Vec<_> = container
        .calendar("Work")
        .unwrap()
        .store()
        .iter()
        .map(|e| (e.start(), e.end()))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_copy_series_lands_on_mondays() {
    let mut container = make_test_container();
    let out = run(
        &mut container,
        r#"
[[commands]]
command = "create_calendar"
name = "Archive"
timezone = "UTC"

[[commands]]
command = "create_event"
subject = "Planning"
start = "2025-06-02T10:00"
end = "2025-06-02T11:00"
repeat = { weekdays = "M", until = "2025-06-16" }

[[commands]]
command = "copy_events"
between = ["2025-06-01", "2025-06-30"]
target = "Archive"
to = "2025-09-02"
"#,
    );

    assert!(out[2].starts_with("Copied Events:"));
    let archive = container.calendar("Archive").unwrap();
    assert_eq!(archive.store().len(), 3);
    assert!(
        archive
            .store()
            .iter()
            .all(|e| e.start().weekday() == Weekday::Mon),
        "copied series should stay on Mondays"
    );
}

#[test]
fn test_errors_do_not_end_the_session() {
    let mut container = make_test_container();
    let script: Script = toml::from_str(
        r#"
[[commands]]
command = "use_calendar"
name = "Missing"

[[commands]]
command = "edit_calendar"
name = "default"
property = "colour"
value = "red"

[[commands]]
command = "create_event"
subject = "Still works"
start = "2025-06-02T09:00"
"#,
    )
    .unwrap();

    let results: Vec<_> = script
        .commands
        .into_iter()
        .map(|command| dispatch(&mut container, command))
        .collect();

    assert!(matches!(results[0], Err(CalError::NotFound(_))));
    assert!(matches!(results[1], Err(CalError::InvalidProperty(_))));
    let created = results[2].as_ref().unwrap();
    assert!(created.contains("End: 2025-06-02T10:00"), "default length is one hour");
}

#[test]
fn test_export_through_command() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.csv");
    let mut container = make_test_container();
    run(&mut container, STANDUP);
    run(
        &mut container,
        r#"
[[commands]]
command = "use_calendar"
name = "Work"
"#,
    );

    let out = dispatch(
        &mut container,
        Command::Export(zonecal_core::command::ExportData {
            file: path.to_string_lossy().into_owned(),
        }),
    )
    .unwrap();

    assert!(out.starts_with("Successfully exported to: "));
    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains("Standup,06/04/2025,9:00AM"));
}
