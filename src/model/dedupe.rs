// File: ./src/model/dedupe.rs
//
// Community members re-list the same night under slightly different
// titles, or a scrape lands next to a hand-entered row. Before expansion
// we collapse those near-duplicates so a venue's weekly night counts as
// one series, keeping whichever record knows the most about it.
use crate::model::item::Event;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DedupeOutcome {
    /// One record per logical series, most complete candidate per group.
    pub series: Vec<Event>,
    /// Losing records with no recurrence shape at all; still worth showing
    /// as one-off listings.
    pub one_offs: Vec<Event>,
}

/// Collapses raw records to one per (venue, title) series. Completeness
/// wins a group; ties keep the first record encountered, so upstream
/// ordering (e.g. newest edit first) stays meaningful.
pub fn dedupe_series(records: Vec<Event>) -> DedupeOutcome {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut groups: HashMap<(String, String), Vec<Event>> = HashMap::new();

    for record in records {
        let key = (record.venue_id.clone(), normalize_title(&record.title));
        let group = groups.entry(key.clone()).or_default();
        if group.is_empty() {
            order.push(key);
        }
        group.push(record);
    }

    let mut outcome = DedupeOutcome::default();
    for key in order {
        let Some(group) = groups.remove(&key) else {
            continue;
        };
        let mut winner: Option<Event> = None;
        let mut losers: Vec<Event> = Vec::new();
        for candidate in group {
            match &winner {
                Some(current) if completeness_score(&candidate) <= completeness_score(current) => {
                    losers.push(candidate);
                }
                _ => {
                    if let Some(replaced) = winner.replace(candidate) {
                        losers.push(replaced);
                    }
                }
            }
        }
        if let Some(winner) = winner {
            outcome.series.push(winner);
        }
        outcome
            .one_offs
            .extend(losers.into_iter().filter(|e| e.recurrence().is_none()));
    }
    outcome
}

/// Case-insensitive, whitespace-collapsed grouping key.
fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One point each for a recurrence rule, a start time, and a weekday.
fn completeness_score(event: &Event) -> u8 {
    u8::from(event.rule_text.is_some())
        + u8::from(event.start_time.is_some())
        + u8::from(event.weekday.is_some())
}
