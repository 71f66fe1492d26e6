// File: tests/audit_windows.rs
use chrono::NaiveDate;
use stagetime::audit::audit_expansion;
use stagetime::model::recurrence::RecurrenceEngine;
use stagetime::model::{Bound, Recurrence, Window};

fn date(key: &str) -> NaiveDate {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").unwrap()
}

fn window(start: &str, end: &str) -> Window {
    Window::new(date(start), date(end))
}

/// Expand, then audit the observed count, the way the listing pipeline
/// does.
fn expand_and_audit(rec: &Recurrence, win: Window) -> (usize, Option<String>) {
    let out = RecurrenceEngine::expand(rec, None, win, None);
    let diag = audit_expansion(rec, out.len(), win, "Monday Mic");
    (out.len(), diag)
}

#[test]
fn test_weekly_seven_day_window_is_never_flagged() {
    // One hit in a 7-day window is the correct answer, not a regression.
    let rec = Recurrence::weekly(1);
    let (count, diag) = expand_and_audit(&rec, window("2026-03-02", "2026-03-08"));
    assert_eq!(count, 1);
    assert!(diag.is_none());
}

#[test]
fn test_weekly_fourteen_day_window_with_one_hit_is_flagged() {
    // Fabricated under-count: a healthy expansion of this window finds 2.
    let rec = Recurrence::weekly(1);
    let win = window("2026-03-02", "2026-03-15");
    let diag = audit_expansion(&rec, 1, win, "Monday Mic");
    let line = diag.expect("sparse result in a two-week window must warn");
    assert!(line.contains("Monday Mic"));
    assert!(line.contains("2026-03-02"));
    assert!(line.contains("2026-03-15"));
    assert!(line.contains("got 1"));
}

#[test]
fn test_healthy_expansion_is_silent() {
    let rec = Recurrence::weekly(1);
    let (count, diag) = expand_and_audit(&rec, window("2026-03-01", "2026-03-31"));
    assert_eq!(count, 5);
    assert!(diag.is_none());
}

#[test]
fn test_bounded_series_is_exempt() {
    // A series that ended on purpose expands to nothing; that is not a
    // regression no matter how long the window is.
    let mut rec = Recurrence::weekly(1);
    rec.bound = Some(Bound::Until(date("2026-01-31")));
    let (count, diag) = expand_and_audit(&rec, window("2026-03-01", "2026-05-31"));
    assert_eq!(count, 0);
    assert!(diag.is_none());
}

#[test]
fn test_biweekly_and_monthly_grace_windows() {
    let biweekly = Recurrence::biweekly(1);
    assert!(audit_expansion(&biweekly, 1, window("2026-03-01", "2026-03-27"), "Mic").is_none());
    assert!(audit_expansion(&biweekly, 1, window("2026-03-01", "2026-03-28"), "Mic").is_some());

    let monthly = Recurrence::ordinal_monthly(6, vec![1]);
    assert!(audit_expansion(&monthly, 1, window("2026-03-01", "2026-04-24"), "Mic").is_none());
    assert!(audit_expansion(&monthly, 0, window("2026-03-01", "2026-04-25"), "Mic").is_some());
}

#[test]
fn test_custom_and_one_off_shapes_are_never_audited() {
    let custom = Recurrence::custom(vec![date("2026-03-20")]);
    assert!(audit_expansion(&custom, 0, window("2026-01-01", "2026-12-31"), "Mic").is_none());

    let none = Recurrence::default();
    assert!(audit_expansion(&none, 0, window("2026-01-01", "2026-12-31"), "Mic").is_none());
}
