// File: ./src/model/item.rs
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

fn default_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_interval() -> u32 {
    1
}

/// Maps the storage convention (0=Sunday..6=Saturday) to a chrono weekday.
/// Anything outside 0..=6 is a bad record and maps to None.
pub fn weekday_from_index(idx: u8) -> Option<Weekday> {
    match idx {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

// --- RECURRENCE SHAPE ---

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Frequency {
    #[default]
    #[strum(to_string = "none")]
    None,
    #[strum(to_string = "weekly")]
    Weekly,
    #[strum(to_string = "biweekly", serialize = "fortnightly")]
    Biweekly,
    #[strum(to_string = "monthly", serialize = "ordinal-monthly")]
    OrdinalMonthly,
    #[strum(to_string = "custom", serialize = "seasonal")]
    Custom,
}

/// Explicit series termination. Serialized like DateType in our sync records.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Bound {
    Count(u32),
    Until(NaiveDate),
}

/// Normalized shape of a schedule, independent of any concrete date.
/// Produced once per event edit by the parser; treated as immutable after.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// 0=Sunday..6=Saturday. Kept raw so a dirty record degrades at
    /// expansion time instead of failing deserialization.
    #[serde(default)]
    pub weekday: Option<u8>,
    /// Nth-weekday-of-month selectors; negative counts from month end
    /// (-1 = last). Only meaningful for OrdinalMonthly.
    #[serde(default)]
    pub ordinals: Vec<i8>,
    /// Explicit dates; only meaningful for Custom.
    #[serde(default)]
    pub custom_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub bound: Option<Bound>,
    /// True when the rule text gave a frequency but no resolvable weekday,
    /// so expansion is a best-effort guess.
    #[serde(default)]
    pub fallback: bool,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            frequency: Frequency::None,
            interval: 1,
            weekday: None,
            ordinals: Vec::new(),
            custom_dates: Vec::new(),
            bound: None,
            fallback: false,
        }
    }
}

impl Recurrence {
    pub fn weekly(weekday: u8) -> Self {
        Self {
            frequency: Frequency::Weekly,
            weekday: Some(weekday),
            ..Self::default()
        }
    }

    pub fn biweekly(weekday: u8) -> Self {
        Self {
            frequency: Frequency::Biweekly,
            weekday: Some(weekday),
            ..Self::default()
        }
    }

    pub fn ordinal_monthly(weekday: u8, ordinals: Vec<i8>) -> Self {
        Self {
            frequency: Frequency::OrdinalMonthly,
            weekday: Some(weekday),
            ordinals,
            ..Self::default()
        }
    }

    pub fn custom(dates: Vec<NaiveDate>) -> Self {
        Self {
            frequency: Frequency::Custom,
            custom_dates: dates,
            ..Self::default()
        }
    }

    /// Effective stride in weeks for the weekly family.
    /// Biweekly doubles whatever interval the rule carried.
    pub fn week_stride(&self) -> u32 {
        let base = self.interval.max(1);
        match self.frequency {
            Frequency::Biweekly => base * 2,
            _ => base,
        }
    }

    /// Whether expansion of this shape yields exact dates rather than a
    /// best-effort guess. Drives the confidence flag on occurrences.
    pub fn is_fully_specified(&self) -> bool {
        if self.fallback {
            return false;
        }
        match self.frequency {
            Frequency::Weekly | Frequency::Biweekly | Frequency::OrdinalMonthly => {
                self.weekday.is_some()
            }
            Frequency::Custom => !self.custom_dates.is_empty(),
            Frequency::None => false,
        }
    }
}

// --- WINDOW ---

/// Inclusive calendar-date range occurrences are requested for.
/// All day arithmetic happens in the one civil calendar configured for the
/// deployment; no time component ever enters the window.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parses a pair of `YYYY-MM-DD` keys as used at the API boundary.
    pub fn parse(start_key: &str, end_key: &str) -> Option<Self> {
        let start = NaiveDate::parse_from_str(start_key, "%Y-%m-%d").ok()?;
        let end = NaiveDate::parse_from_str(end_key, "%Y-%m-%d").ok()?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Inclusive length in days; zero or negative for an inverted window.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

// --- OCCURRENCES ---

/// One concrete date a series lands on. Recomputed per request, never stored.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    /// False when the date came out of a partial pattern and is a guess.
    pub confident: bool,
}

impl Occurrence {
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

// --- OVERRIDES ---

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum OverrideStatus {
    #[default]
    Normal,
    Cancelled,
}

/// Persisted per-date exception layered onto the base schedule.
/// At most one exists per (event, date); the store enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceOverride {
    pub event_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: OverrideStatus,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub cover_media: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Free-form field replacements (e.g. a reschedule target). The merger
    /// attaches this bag untouched; interpreting it is the caller's call.
    #[serde(default)]
    pub patch: Option<serde_json::Value>,
}

impl OccurrenceOverride {
    pub fn new(event_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            event_id: event_id.into(),
            date,
            status: OverrideStatus::Normal,
            start_time: None,
            cover_media: None,
            notes: None,
            patch: None,
        }
    }

    pub fn cancelled(event_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            status: OverrideStatus::Cancelled,
            ..Self::new(event_id, date)
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OverrideStatus::Cancelled
    }
}

/// Per-date view after overrides are applied. Ephemeral, like Occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedOccurrence {
    pub date: NaiveDate,
    pub confident: bool,
    pub exception: Option<OccurrenceOverride>,
}

impl MergedOccurrence {
    /// Derived, never stored: the status field on the exception is the only
    /// source of truth for "this date is off".
    pub fn is_cancelled(&self) -> bool {
        self.exception.as_ref().is_some_and(|o| o.is_cancelled())
    }

    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn effective_start_time(&self, base: Option<NaiveTime>) -> Option<NaiveTime> {
        self.exception
            .as_ref()
            .and_then(|o| o.start_time)
            .or(base)
    }

    pub fn effective_cover_media<'a>(&'a self, base: Option<&'a str>) -> Option<&'a str> {
        self.exception
            .as_ref()
            .and_then(|o| o.cover_media.as_deref())
            .or(base)
    }
}

// --- EVENT RECORDS ---

/// A raw event row as the community maintains it: partially filled,
/// sometimes duplicated, never trusted. The engine normalizes from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default = "default_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub venue_id: String,
    /// Free-form recurrence text ("FREQ=WEEKLY;BYDAY=MO", "2nd/4th", ...).
    #[serde(default)]
    pub rule_text: Option<String>,
    /// 0=Sunday..6=Saturday, used as the parse fallback when the rule text
    /// itself carries no weekday.
    #[serde(default)]
    pub weekday: Option<u8>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// A single resolved date. When present and inside the requested
    /// window it pins the expansion to exactly that date; the abstract
    /// pattern then only labels the series.
    #[serde(default)]
    pub anchor: Option<NaiveDate>,
    /// Explicit dates for custom-frequency series.
    #[serde(default)]
    pub custom_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub cover_media: Option<String>,
}

impl Event {
    pub fn new(title: impl Into<String>, venue_id: impl Into<String>) -> Self {
        Self {
            id: default_id(),
            title: title.into(),
            venue_id: venue_id.into(),
            rule_text: None,
            weekday: None,
            start_time: None,
            anchor: None,
            custom_dates: Vec::new(),
            cover_media: None,
        }
    }

    /// Normalizes this record's schedule. None means "one-off event";
    /// callers must not treat that as an error.
    pub fn recurrence(&self) -> Option<Recurrence> {
        let parsed = self
            .rule_text
            .as_deref()
            .and_then(|text| crate::model::parser::parse_rule(text, self.weekday));
        let mut rec = match parsed {
            Some(rec) => rec,
            // A date list with no rule text is still a custom series.
            None if !self.custom_dates.is_empty() => Recurrence::custom(Vec::new()),
            None => return None,
        };
        if rec.frequency == Frequency::Custom && rec.custom_dates.is_empty() {
            rec.custom_dates = self.custom_dates.clone();
        }
        Some(rec)
    }

}
