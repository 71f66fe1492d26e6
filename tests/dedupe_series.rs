// File: tests/dedupe_series.rs
use chrono::{NaiveDate, NaiveTime};
use stagetime::config::EngineConfig;
use stagetime::controller::list_series;
use stagetime::model::dedupe::dedupe_series;
use stagetime::model::{Event, Window};
use stagetime::store::MemoryOverrideStore;

fn date(key: &str) -> NaiveDate {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap()
}

#[test]
fn test_populated_record_beats_empty_duplicate() {
    // The round-trip property: two records for the same venue+title, one
    // with a rule and one without, collapse to one series.
    let mut populated = Event::new("Tuesday Open Mic", "venue-7");
    populated.id = "populated".into();
    populated.rule_text = Some("FREQ=WEEKLY;BYDAY=TU".into());
    populated.weekday = Some(2);

    let mut empty = Event::new("tuesday open mic", "venue-7");
    empty.id = "empty".into();

    let outcome = dedupe_series(vec![empty, populated]);
    assert_eq!(outcome.series.len(), 1);
    assert_eq!(outcome.series[0].id, "populated");
}

#[test]
fn test_scoring_prefers_fuller_records() {
    // rule only (1 point) vs rule + weekday + start time (3 points)
    let mut partial = Event::new("Jazz Jam", "venue-2");
    partial.id = "partial".into();
    partial.rule_text = Some("weekly".into());

    let mut full = Event::new("Jazz  Jam", "venue-2");
    full.id = "full".into();
    full.rule_text = Some("FREQ=WEEKLY;BYDAY=WE".into());
    full.weekday = Some(3);
    full.start_time = NaiveTime::from_hms_opt(21, 0, 0);

    let outcome = dedupe_series(vec![partial, full]);
    assert_eq!(outcome.series.len(), 1);
    assert_eq!(outcome.series[0].id, "full");
    // The loser has a recurrence rule, so it is NOT resurfaced as one-off
    assert!(outcome.one_offs.is_empty());
}

#[test]
fn test_series_count_through_the_pipeline() {
    let mut populated = Event::new("Tuesday Open Mic", "venue-7");
    populated.rule_text = Some("FREQ=WEEKLY;BYDAY=TU".into());
    let empty = Event::new("Tuesday Open Mic", "venue-7");

    let window = Window::new(date("2026-03-01"), date("2026-03-31"));
    let listed = list_series(
        vec![populated, empty],
        window,
        &MemoryOverrideStore::new(),
        &EngineConfig::default(),
    );

    // One series (5 Tuesdays) plus the empty duplicate as a dateless
    // one-off; the series count is 1, not 2.
    let with_dates: Vec<_> = listed.iter().filter(|(_, occ)| !occ.is_empty()).collect();
    assert_eq!(with_dates.len(), 1);
    assert_eq!(with_dates[0].1.len(), 5);
}

#[test]
fn test_one_off_losers_keep_their_anchor_listing() {
    // A duplicate without a pattern but with a resolved date still shows
    // up as a single listing.
    let mut series = Event::new("Poetry Night", "venue-4");
    series.rule_text = Some("monthly".into());
    series.weekday = Some(0);

    let mut single = Event::new("poetry night", "venue-4");
    single.anchor = Some(date("2026-03-15"));

    let window = Window::new(date("2026-03-01"), date("2026-03-31"));
    let listed = list_series(
        vec![series, single],
        window,
        &MemoryOverrideStore::new(),
        &EngineConfig::default(),
    );

    assert_eq!(listed.len(), 2);
    let one_off = &listed[1];
    assert_eq!(one_off.1.len(), 1);
    assert_eq!(one_off.1[0].date, date("2026-03-15"));
}
