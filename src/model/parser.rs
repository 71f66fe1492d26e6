// File: ./src/model/parser.rs
//
// Single translation boundary from free-form recurrence text to the
// normalized Recurrence shape. Two dialects are accepted:
//
//   (a) structured KEY=VALUE rules, semicolon separated, case-insensitive
//       (FREQ, INTERVAL, BYDAY with signed ordinals, BYMONTHDAY, COUNT,
//       UNTIL in compact date or date-time-Z form);
//   (b) plain keywords as hosts actually type them ("weekly", "biweekly",
//       "every other week", "monthly", "seasonal", "last friday",
//       "2nd/4th tuesday").
//
// Returning None means "no recurrence, one-off event" and is never an
// error. Junk tokens inside a recognized rule are skipped so that a rule
// written by a future version (or a sloppy host) still parses.
use crate::model::item::{Bound, Frequency, Recurrence};
use chrono::{NaiveDate, NaiveDateTime};
use std::str::FromStr;

pub fn parse_rule(text: &str, fallback_weekday: Option<u8>) -> Option<Recurrence> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Stored rules sometimes keep the property name; strip it so the same
    // text parses whether it came from an export or a form field.
    let clean = match trimmed.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("RRULE:") => trimmed[6..].trim(),
        _ => trimmed,
    };

    if clean.contains('=') {
        if let Some(rec) = parse_structured(clean, fallback_weekday) {
            return Some(rec);
        }
    }
    parse_keywords(clean, fallback_weekday)
}

fn parse_structured(rule: &str, fallback_weekday: Option<u8>) -> Option<Recurrence> {
    let mut frequency: Option<Frequency> = None;
    let mut interval: u32 = 1;
    let mut weekday: Option<u8> = None;
    let mut ordinals: Vec<i8> = Vec::new();
    let mut count: Option<u32> = None;
    let mut until: Option<NaiveDate> = None;

    for part in rule.split(';') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => {
                frequency = match value.to_ascii_uppercase().as_str() {
                    "WEEKLY" => Some(Frequency::Weekly),
                    "MONTHLY" => Some(Frequency::OrdinalMonthly),
                    // DAILY/YEARLY etc. never occur in this directory;
                    // leaving frequency unset falls through to keywords.
                    _ => frequency,
                };
            }
            "INTERVAL" => {
                if let Ok(n) = value.parse::<u32>()
                    && n >= 1
                {
                    interval = n;
                }
            }
            "BYDAY" => {
                for entry in value.split(',') {
                    let Some((ordinal, day)) = parse_byday_entry(entry.trim()) else {
                        continue; // malformed entry: skip, not fatal
                    };
                    if let Some(ord) = ordinal
                        && !ordinals.contains(&ord)
                    {
                        ordinals.push(ord);
                    }
                    weekday.get_or_insert(day);
                }
            }
            // Accepted for compatibility with imported rules; nth-day-of-
            // month is not a shape this directory schedules by.
            "BYMONTHDAY" => {}
            "COUNT" => count = value.parse::<u32>().ok(),
            "UNTIL" => until = parse_until(value),
            _ => {} // forward-compatible: unknown keys are ignored
        }
    }

    let mut frequency = frequency?;
    if frequency == Frequency::Weekly && !ordinals.is_empty() {
        // "1TU" under FREQ=WEEKLY is really a monthly ordinal rule; hosts
        // paste these from other calendars.
        frequency = Frequency::OrdinalMonthly;
    }

    let weekday = weekday.or(fallback_weekday);
    let fallback = weekday.is_none();
    Some(Recurrence {
        frequency,
        interval,
        weekday,
        ordinals,
        custom_dates: Vec::new(),
        bound: count.map(Bound::Count).or(until.map(Bound::Until)),
        fallback,
    })
}

/// One BYDAY entry: an optional signed ordinal followed by a two-letter
/// weekday code, e.g. "MO", "1TU", "-1FR".
fn parse_byday_entry(entry: &str) -> Option<(Option<i8>, u8)> {
    if entry.len() < 2 || !entry.is_ascii() {
        return None;
    }
    let split_at = entry.len() - 2;
    let (prefix, code) = entry.split_at(split_at);
    let day = weekday_code_index(code)?;
    if prefix.is_empty() {
        return Some((None, day));
    }
    let ord = prefix.parse::<i8>().ok().filter(|o| *o != 0)?;
    Some((Some(ord), day))
}

fn weekday_code_index(code: &str) -> Option<u8> {
    match code.to_ascii_uppercase().as_str() {
        "SU" => Some(0),
        "MO" => Some(1),
        "TU" => Some(2),
        "WE" => Some(3),
        "TH" => Some(4),
        "FR" => Some(5),
        "SA" => Some(6),
        _ => None,
    }
}

/// UNTIL accepts the compact date form (YYYYMMDD) or the date-time-with-Z
/// form (YYYYMMDDTHHMMSSZ); anything else is skipped.
fn parse_until(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        return Some(date);
    }
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ")
        .ok()
        .map(|dt| dt.date())
}

fn parse_keywords(text: &str, fallback_weekday: Option<u8>) -> Option<Recurrence> {
    let lower = text.to_ascii_lowercase();

    let mut frequency: Option<Frequency> = None;
    let mut ordinals: Vec<i8> = Vec::new();
    let mut weekday: Option<u8> = None;

    // Multi-word forms first; single tokens can then only refine them.
    if lower.contains("every other") {
        frequency = Some(Frequency::Biweekly);
    } else if lower.contains("every week") {
        frequency = Some(Frequency::Weekly);
    } else if lower.contains("every month") {
        frequency = Some(Frequency::OrdinalMonthly);
    }

    for raw in lower.split(|c: char| c.is_whitespace() || c == ',' || c == '&') {
        for token in raw.split('/') {
            let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
            if token.is_empty() {
                continue;
            }
            if let Ok(freq) = Frequency::from_str(token) {
                if freq != Frequency::None {
                    frequency.get_or_insert(freq);
                }
                continue;
            }
            if let Some(ord) = parse_ordinal_token(token) {
                if !ordinals.contains(&ord) {
                    ordinals.push(ord);
                }
                continue;
            }
            if let Some(day) = parse_weekday_name(token) {
                weekday.get_or_insert(day);
            }
            // everything else is ignored
        }
    }

    // A bare ordinal ("2nd/4th") implies a monthly shape even without the
    // word "monthly".
    if !ordinals.is_empty() {
        frequency.get_or_insert(Frequency::OrdinalMonthly);
    }

    let frequency = frequency?;
    if frequency != Frequency::OrdinalMonthly {
        ordinals.clear();
    }
    let weekday = weekday.or(fallback_weekday);
    let fallback = match frequency {
        Frequency::Weekly | Frequency::Biweekly | Frequency::OrdinalMonthly => weekday.is_none(),
        _ => false,
    };
    Some(Recurrence {
        frequency,
        interval: 1,
        weekday,
        ordinals,
        custom_dates: Vec::new(),
        bound: None,
        fallback,
    })
}

fn parse_ordinal_token(token: &str) -> Option<i8> {
    match token {
        "1st" | "first" => Some(1),
        "2nd" | "second" => Some(2),
        "3rd" | "third" => Some(3),
        "4th" | "fourth" => Some(4),
        "5th" | "fifth" => Some(5),
        "last" => Some(-1),
        _ => None,
    }
}

/// Full and abbreviated weekday names, tolerating the plural hosts write
/// ("tuesdays").
pub fn parse_weekday_name(token: &str) -> Option<u8> {
    let token = token.strip_suffix('s').unwrap_or(token);
    match token {
        "sun" | "sunday" => Some(0),
        "mon" | "monday" => Some(1),
        "tue" | "tues" | "tuesday" => Some(2),
        "wed" | "wednesday" => Some(3),
        "thu" | "thur" | "thursday" => Some(4),
        "fri" | "friday" => Some(5),
        "sat" | "saturday" => Some(6),
        _ => None,
    }
}
