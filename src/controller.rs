// File: ./src/controller.rs
//
// Orchestrates the full listing pipeline for an event or a batch of raw
// records: normalize the schedule, expand it over the window, batch-fetch
// overrides (one store round-trip per window, never per occurrence),
// merge, and hand the expansion count to the auditor. Every step is pure
// except the single override fetch.
use crate::audit::audit_expansion;
use crate::config::EngineConfig;
use crate::model::dedupe::dedupe_series;
use crate::model::item::{Event, MergedOccurrence, Window};
use crate::model::merge::{index_overrides, merge_occurrences, without_cancelled};
use crate::model::recurrence::RecurrenceEngine;
use crate::store::{fetch_overrides_or_empty, OverrideStore};
use chrono::{DateTime, Duration, Utc};

/// Occurrence listing for a single event over a window.
pub fn list_occurrences(
    event: &Event,
    window: Window,
    store: &dyn OverrideStore,
    config: &EngineConfig,
) -> Vec<MergedOccurrence> {
    let rec = event.recurrence().unwrap_or_default();
    let occurrences = RecurrenceEngine::expand(
        &rec,
        event.anchor,
        window,
        config.max_occurrences.map(|n| n as usize),
    );

    if config.audit_expansions {
        audit_expansion(&rec, occurrences.len(), window, &event.title);
    }

    let overrides = fetch_overrides_or_empty(store, &event.id, window);
    let index = index_overrides(overrides);
    let merged = merge_occurrences(&event.id, &occurrences, &index);
    if config.include_cancelled {
        merged
    } else {
        without_cancelled(merged)
    }
}

/// Batch listing over raw records: collapses duplicate series first, then
/// expands each surviving record (series winners and pattern-less one-offs
/// alike).
pub fn list_series(
    records: Vec<Event>,
    window: Window,
    store: &dyn OverrideStore,
    config: &EngineConfig,
) -> Vec<(Event, Vec<MergedOccurrence>)> {
    let outcome = dedupe_series(records);
    outcome
        .series
        .into_iter()
        .chain(outcome.one_offs)
        .map(|event| {
            let merged = list_occurrences(&event, window, store, config);
            (event, merged)
        })
        .collect()
}

/// Window for "the upcoming dates", starting at a civil date the caller
/// already resolved.
pub fn upcoming_window(today: chrono::NaiveDate, config: &EngineConfig) -> Window {
    let span = config.default_window_days.max(1) as i64;
    Window::new(today, today + Duration::days(span - 1))
}

/// Convenience wrapper resolving "today" from an injected instant.
pub fn upcoming_window_at(
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> anyhow::Result<Window> {
    Ok(upcoming_window(config.civil_date(now)?, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::OccurrenceOverride;
    use crate::store::MemoryOverrideStore;
    use chrono::NaiveDate;

    fn date(key: &str) -> NaiveDate {
        NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_single_event_pipeline() {
        let mut event = Event::new("Monday Mic", "venue-1");
        event.id = "ev-1".into();
        event.rule_text = Some("FREQ=WEEKLY;BYDAY=MO".into());

        let mut store = MemoryOverrideStore::new();
        store.upsert(OccurrenceOverride::cancelled("ev-1", date("2026-03-09")));

        let window = Window::new(date("2026-03-01"), date("2026-03-31"));
        let merged = list_occurrences(&event, window, &store, &EngineConfig::default());

        // Mondays in March 2026: 2, 9, 16, 23, 30 — all listed, one cancelled
        assert_eq!(merged.len(), 5);
        assert!(merged[1].is_cancelled());
        assert_eq!(merged.iter().filter(|m| m.is_cancelled()).count(), 1);
    }

    #[test]
    fn test_hide_cancelled_view_mode() {
        let mut event = Event::new("Monday Mic", "venue-1");
        event.id = "ev-1".into();
        event.rule_text = Some("FREQ=WEEKLY;BYDAY=MO".into());

        let mut store = MemoryOverrideStore::new();
        store.upsert(OccurrenceOverride::cancelled("ev-1", date("2026-03-09")));

        let config = EngineConfig {
            include_cancelled: false,
            ..EngineConfig::default()
        };
        let window = Window::new(date("2026-03-01"), date("2026-03-31"));
        let merged = list_occurrences(&event, window, &store, &config);
        assert_eq!(merged.len(), 4);
        assert!(merged.iter().all(|m| !m.is_cancelled()));
    }

    #[test]
    fn test_series_listing_dedupes_first() {
        let mut complete = Event::new("Open Mic", "venue-1");
        complete.rule_text = Some("FREQ=WEEKLY;BYDAY=TU".into());
        complete.weekday = Some(2);
        let sparse = Event::new("open mic", "venue-1");

        let window = Window::new(date("2026-03-01"), date("2026-03-31"));
        let listed = list_series(
            vec![complete, sparse],
            window,
            &MemoryOverrideStore::new(),
            &EngineConfig::default(),
        );

        // One winning series plus the empty duplicate surfaced as one-off
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].1.len(), 5); // Tuesdays: 3, 10, 17, 24, 31
        assert!(listed[1].1.is_empty()); // no pattern, no anchor
    }

    #[test]
    fn test_upcoming_window_length() {
        let window = upcoming_window(date("2026-01-01"), &EngineConfig::default());
        assert_eq!(window.len_days(), 35);
        assert_eq!(window.end, date("2026-02-04"));
    }
}
