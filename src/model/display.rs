// File: ./src/model/display.rs
use crate::model::item::{weekday_from_index, Event, Frequency, Recurrence};

/// Human label for a schedule, e.g. "Every Monday" or "1st & 3rd Tuesday
/// of the month". The label always describes the series shape; a pinned
/// anchor date never changes it, it only pins one occurrence.
pub trait ScheduleDisplay {
    fn schedule_label(&self) -> String;
}

impl ScheduleDisplay for Recurrence {
    fn schedule_label(&self) -> String {
        let day = self
            .weekday
            .and_then(weekday_from_index)
            .map(weekday_label);
        match self.frequency {
            Frequency::None => "One-off".to_string(),
            Frequency::Custom => "Select dates".to_string(),
            Frequency::Weekly | Frequency::Biweekly => {
                let stride = self.week_stride();
                match (stride, day) {
                    (1, Some(day)) => format!("Every {day}"),
                    (1, None) => "Weekly".to_string(),
                    (2, Some(day)) => format!("Every other {day}"),
                    (2, None) => "Every other week".to_string(),
                    (n, Some(day)) => format!("Every {n} weeks on {day}"),
                    (n, None) => format!("Every {n} weeks"),
                }
            }
            Frequency::OrdinalMonthly => {
                let ordinals = if self.ordinals.is_empty() {
                    "Monthly".to_string()
                } else {
                    self.ordinals
                        .iter()
                        .map(|o| ordinal_label(*o))
                        .collect::<Vec<_>>()
                        .join(" & ")
                };
                match day {
                    Some(day) => format!("{ordinals} {day} of the month"),
                    None => "Monthly".to_string(),
                }
            }
        }
    }
}

impl ScheduleDisplay for Event {
    fn schedule_label(&self) -> String {
        if let Some(rec) = self.recurrence() {
            return rec.schedule_label();
        }
        match self.anchor {
            Some(date) => date.format("%A, %b %-d").to_string(),
            None => "Unscheduled".to_string(),
        }
    }
}

fn weekday_label(day: chrono::Weekday) -> &'static str {
    match day {
        chrono::Weekday::Sun => "Sunday",
        chrono::Weekday::Mon => "Monday",
        chrono::Weekday::Tue => "Tuesday",
        chrono::Weekday::Wed => "Wednesday",
        chrono::Weekday::Thu => "Thursday",
        chrono::Weekday::Fri => "Friday",
        chrono::Weekday::Sat => "Saturday",
    }
}

fn ordinal_label(ordinal: i8) -> String {
    match ordinal {
        -1 => "Last".to_string(),
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n if n > 0 => format!("{n}th"),
        n => format!("{}th-from-last", -n),
    }
}
