//! Scoped event deletion.

use tracing::info;

use crate::edit::{EditScope, EventLocator, resolve_targets};
use crate::error::{CalError, CalResult};
use crate::event::Event;
use crate::store::EventStore;

/// Remove every event `scope` covers around the anchors matching `locator`.
pub fn delete_events(
    store: &mut EventStore,
    scope: EditScope,
    locator: &EventLocator,
) -> CalResult<Vec<Event>> {
    let groups = resolve_targets(store, scope, locator)?;

    if groups.is_empty() {
        return Err(CalError::NotFound("No events found to delete".to_string()));
    }

    let removed: Vec<Event> = groups
        .iter()
        .flatten()
        .filter_map(|event| store.remove(event))
        .collect();

    info!(scope = ?scope, count = removed.len(), "deleted events");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{RepeatBound, SeriesRequest, create_series};
    use crate::time::parse_date_time;
    use chrono::NaiveDateTime;

    fn dt(s: &str) -> NaiveDateTime {
        parse_date_time(s).unwrap()
    }

    fn make_series(store: &mut EventStore) {
        create_series(
            store,
            &SeriesRequest {
                subject: "Gym".to_string(),
                start: dt("2025-06-02T18:00"),
                end: dt("2025-06-02T19:00"),
                weekdays: "MR".parse().unwrap(),
                bound: RepeatBound::Count(4),
            },
        )
        .unwrap();
    }

    fn locator(start: &str, end: Option<&str>) -> EventLocator {
        EventLocator {
            subject: "Gym".to_string(),
            start: dt(start),
            end: end.map(dt),
        }
    }

    #[test]
    fn test_delete_single() {
        let mut store = EventStore::new();
        make_series(&mut store);

        let removed = delete_events(
            &mut store,
            EditScope::Single,
            &locator("2025-06-05T18:00", Some("2025-06-05T19:00")),
        )
        .unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_delete_from_keeps_earlier_members() {
        let mut store = EventStore::new();
        make_series(&mut store);

        // Members: 06-02, 06-05, 06-09, 06-12
        let removed =
            delete_events(&mut store, EditScope::From, &locator("2025-06-05T18:00", None)).unwrap();
        assert_eq!(removed.len(), 3);

        let left: Vec<_> = store.iter().map(|e| e.start()).collect();
        assert_eq!(left, vec![dt("2025-06-02T18:00")]);
    }

    #[test]
    fn test_delete_series_removes_all() {
        let mut store = EventStore::new();
        make_series(&mut store);

        let removed =
            delete_events(&mut store, EditScope::Series, &locator("2025-06-09T18:00", None))
                .unwrap();
        assert_eq!(removed.len(), 4);
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_nothing_matches() {
        let mut store = EventStore::new();
        make_series(&mut store);

        let result = delete_events(
            &mut store,
            EditScope::Series,
            &locator("2025-06-03T18:00", None),
        );
        assert!(matches!(result, Err(CalError::NotFound(_))));
        assert_eq!(store.len(), 4);
    }
}
