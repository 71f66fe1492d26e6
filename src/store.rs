// File: ./src/store.rs
use crate::model::item::{OccurrenceOverride, Window};
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Read boundary to wherever overrides persist. Implementations may do
/// I/O; the engine calls this once per window request (batch fetch), never
/// once per occurrence.
pub trait OverrideStore {
    fn fetch_overrides(&self, event_id: &str, window: Window) -> Result<Vec<OccurrenceOverride>>;
}

/// A failed fetch degrades to "no overrides for this window": every date
/// renders as normal, which never hides a legitimately scheduled
/// occurrence. The failure is logged, not propagated.
pub fn fetch_overrides_or_empty(
    store: &dyn OverrideStore,
    event_id: &str,
    window: Window,
) -> Vec<OccurrenceOverride> {
    match store.fetch_overrides(event_id, window) {
        Ok(overrides) => overrides,
        Err(e) => {
            log::warn!("override fetch failed for event {event_id}: {e}; rendering base schedule");
            Vec::new()
        }
    }
}

/// In-memory store: the reference implementation and the test double.
/// Enforces the one-override-per-(event, date) rule the way the production
/// table does with its unique key.
#[derive(Debug, Clone, Default)]
pub struct MemoryOverrideStore {
    overrides: HashMap<(String, NaiveDate), OccurrenceOverride>,
}

impl MemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces the override for its (event, date) slot.
    pub fn upsert(&mut self, o: OccurrenceOverride) {
        self.overrides.insert((o.event_id.clone(), o.date), o);
    }

    /// Deletes an override, fully reverting that date to the base
    /// schedule. Returns false when nothing was stored for the slot.
    pub fn delete(&mut self, event_id: &str, date: NaiveDate) -> bool {
        self.overrides
            .remove(&(event_id.to_string(), date))
            .is_some()
    }

    pub fn get(&self, event_id: &str, date: NaiveDate) -> Option<&OccurrenceOverride> {
        self.overrides.get(&(event_id.to_string(), date))
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl OverrideStore for MemoryOverrideStore {
    fn fetch_overrides(&self, event_id: &str, window: Window) -> Result<Vec<OccurrenceOverride>> {
        let mut hits: Vec<OccurrenceOverride> = self
            .overrides
            .values()
            .filter(|o| o.event_id == event_id && window.contains(o.date))
            .cloned()
            .collect();
        hits.sort_by_key(|o| o.date);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(key: &str) -> NaiveDate {
        NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_upsert_replaces_per_slot() {
        let mut store = MemoryOverrideStore::new();
        store.upsert(OccurrenceOverride::new("ev-1", date("2026-03-02")));
        store.upsert(OccurrenceOverride::cancelled("ev-1", date("2026-03-02")));
        assert_eq!(store.len(), 1);
        assert!(store.get("ev-1", date("2026-03-02")).unwrap().is_cancelled());
    }

    #[test]
    fn test_delete_reverts_to_base() {
        let mut store = MemoryOverrideStore::new();
        store.upsert(OccurrenceOverride::cancelled("ev-1", date("2026-03-02")));
        assert!(store.delete("ev-1", date("2026-03-02")));
        assert!(!store.delete("ev-1", date("2026-03-02")));
        assert!(store.get("ev-1", date("2026-03-02")).is_none());
    }

    #[test]
    fn test_fetch_is_scoped_to_event_and_window() {
        let mut store = MemoryOverrideStore::new();
        store.upsert(OccurrenceOverride::cancelled("ev-1", date("2026-03-02")));
        store.upsert(OccurrenceOverride::cancelled("ev-1", date("2026-05-04")));
        store.upsert(OccurrenceOverride::cancelled("ev-2", date("2026-03-02")));

        let window = Window::new(date("2026-03-01"), date("2026-03-31"));
        let hits = store.fetch_overrides("ev-1", window).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].date, date("2026-03-02"));
    }

    struct FailingStore;
    impl OverrideStore for FailingStore {
        fn fetch_overrides(&self, _: &str, _: Window) -> Result<Vec<OccurrenceOverride>> {
            anyhow::bail!("connection reset")
        }
    }

    #[test]
    fn test_fetch_or_empty_swallows_transport_failure() {
        let window = Window::new(date("2026-03-01"), date("2026-03-31"));
        let overrides = fetch_overrides_or_empty(&FailingStore, "ev-1", window);
        assert!(overrides.is_empty());
    }
}
