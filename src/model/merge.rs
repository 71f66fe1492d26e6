// File: ./src/model/merge.rs
use crate::model::item::{MergedOccurrence, Occurrence, OccurrenceOverride, Window};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Override lookup keyed by the structured (event, date) pair. Built once
/// per window request; every call site shares this shape instead of
/// improvising string keys.
pub type OverrideIndex = HashMap<(String, NaiveDate), OccurrenceOverride>;

pub fn index_overrides(
    overrides: impl IntoIterator<Item = OccurrenceOverride>,
) -> OverrideIndex {
    overrides
        .into_iter()
        .map(|o| ((o.event_id.clone(), o.date), o))
        .collect()
}

/// Attaches overrides to expanded occurrences. Cancelled dates stay in the
/// output; the two listing modes (hide cancelled / show with a toggle) are
/// a caller decision, not a merge decision.
pub fn merge_occurrences(
    event_id: &str,
    occurrences: &[Occurrence],
    index: &OverrideIndex,
) -> Vec<MergedOccurrence> {
    occurrences
        .iter()
        .map(|occ| MergedOccurrence {
            date: occ.date,
            confident: occ.confident,
            exception: index.get(&(event_id.to_string(), occ.date)).cloned(),
        })
        .collect()
}

/// The "normal occurrences only" view.
pub fn without_cancelled(merged: Vec<MergedOccurrence>) -> Vec<MergedOccurrence> {
    merged.into_iter().filter(|m| !m.is_cancelled()).collect()
}

/// Scans override patches for reschedule targets inside the window and
/// returns (original date, moved-to date) pairs. The merger itself never
/// follows these chains; consumers that answer "where did this date move
/// to" opt in here.
pub fn reschedule_targets(
    overrides: &[OccurrenceOverride],
    window: Window,
) -> Vec<(NaiveDate, NaiveDate)> {
    overrides
        .iter()
        .filter_map(|o| {
            let patch = o.patch.as_ref()?;
            let raw = patch
                .get("date")
                .or_else(|| patch.get("date_key"))?
                .as_str()?;
            let target = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
            window.contains(target).then_some((o.date, target))
        })
        .collect()
}
