// File: ./src/model/recurrence.rs
use crate::model::item::{weekday_from_index, Bound, Frequency, Occurrence, Recurrence, Window};
use chrono::{Datelike, Days, Duration, NaiveDate, Weekday};

pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Expands a schedule into the concrete dates falling inside `window`.
    ///
    /// An anchor date inside the window wins over everything: the result is
    /// exactly that one date, even when it contradicts the abstract pattern.
    /// Reconciling the two is a data-entry concern, not an expansion
    /// concern; expansion stays permissive so a listing never breaks on an
    /// inconsistent record. An anchor outside the window leaves the pattern
    /// to expand normally (it still seeds biweekly parity below).
    ///
    /// Bad inputs degrade to an empty result, never a panic: an inverted
    /// window, a weekday outside 0..=6, a pattern with nothing to say.
    pub fn expand(
        rec: &Recurrence,
        anchor: Option<NaiveDate>,
        window: Window,
        max_occurrences: Option<usize>,
    ) -> Vec<Occurrence> {
        if window.is_empty() {
            return Vec::new();
        }

        if let Some(date) = anchor
            && window.contains(date)
        {
            return vec![Occurrence {
                date,
                confident: true,
            }];
        }

        let mut dates = match rec.frequency {
            Frequency::None => Vec::new(),
            Frequency::Custom => rec
                .custom_dates
                .iter()
                .copied()
                .filter(|d| window.contains(*d))
                .collect(),
            Frequency::Weekly | Frequency::Biweekly => {
                match Self::weekly_dates(rec, anchor, window) {
                    Some(dates) => dates,
                    None => return Vec::new(),
                }
            }
            Frequency::OrdinalMonthly => match Self::ordinal_dates(rec, anchor, window) {
                Some(dates) => dates,
                None => return Vec::new(),
            },
        };

        dates.sort_unstable();
        dates.dedup();

        if let Some(Bound::Until(until)) = rec.bound {
            dates.retain(|d| *d <= until);
        }
        if let Some(Bound::Count(n)) = rec.bound {
            dates.truncate(n as usize);
        }
        if let Some(max) = max_occurrences {
            dates.truncate(max);
        }

        let confident = rec.is_fully_specified();
        dates
            .into_iter()
            .map(|date| Occurrence { date, confident })
            .collect()
    }

    /// Weekday-strided dates. The stride is measured against a stable
    /// origin (the series anchor when present, the calendar epoch
    /// otherwise) so that "every other week" keeps the same parity no
    /// matter where the requested window starts.
    fn weekly_dates(
        rec: &Recurrence,
        anchor: Option<NaiveDate>,
        window: Window,
    ) -> Option<Vec<NaiveDate>> {
        let target = Self::target_weekday(rec, anchor, window)?;
        let stride_weeks = rec.week_stride() as i64;

        // Week counting: same-weekday dates sit exactly 7 days apart, so
        // days-from-CE divided by 7 numbers their weeks consecutively. The
        // anchor fixes which residue class the series lives in; without one
        // the class falls back to week zero, which is at least stable.
        let week_of = |d: NaiveDate| (d.num_days_from_ce() as i64).div_euclid(7);
        let origin_week = anchor.map_or(0, |a| week_of(align_to_weekday(a, target)));

        let mut cursor = align_to_weekday(window.start, target);
        while cursor <= window.end
            && (week_of(cursor) - origin_week).rem_euclid(stride_weeks) != 0
        {
            cursor += Duration::days(7);
        }

        let mut dates = Vec::new();
        while cursor <= window.end {
            dates.push(cursor);
            cursor += Duration::days(7 * stride_weeks);
        }
        Some(dates)
    }

    /// Nth-weekday dates for every month the window overlaps.
    fn ordinal_dates(
        rec: &Recurrence,
        anchor: Option<NaiveDate>,
        window: Window,
    ) -> Option<Vec<NaiveDate>> {
        let target = Self::target_weekday(rec, anchor, window)?;

        // "monthly" with no explicit ordinal: infer from where the anchor
        // sits in its month, else assume the first.
        let inferred;
        let ordinals: &[i8] = if rec.ordinals.is_empty() {
            inferred = [anchor.map_or(1, |d| ((d.day() - 1) / 7 + 1) as i8)];
            &inferred
        } else {
            &rec.ordinals
        };

        let mut dates = Vec::new();
        let (mut year, mut month) = (window.start.year(), window.start.month());
        let last = (window.end.year(), window.end.month());
        loop {
            for ordinal in ordinals {
                if let Some(date) = nth_weekday_of_month(year, month, target, *ordinal)
                    && window.contains(date)
                {
                    dates.push(date);
                }
            }
            if (year, month) == last {
                break;
            }
            (year, month) = if month == 12 {
                (year + 1, 1)
            } else {
                (year, month + 1)
            };
        }
        Some(dates)
    }

    /// Resolves the weekday a pattern runs on. A missing weekday means a
    /// partial rule: guess from the anchor, then the window start, and let
    /// the confidence flag mark the result. A weekday outside 0..=6 is a
    /// contract violation and yields None, which the caller turns into an
    /// empty expansion.
    fn target_weekday(
        rec: &Recurrence,
        anchor: Option<NaiveDate>,
        window: Window,
    ) -> Option<Weekday> {
        match rec.weekday {
            Some(idx) => weekday_from_index(idx),
            None => Some(anchor.map_or_else(|| window.start.weekday(), |d| d.weekday())),
        }
    }
}

/// First date on/after `from` falling on `target`.
fn align_to_weekday(from: NaiveDate, target: Weekday) -> NaiveDate {
    let offset = (7 + target.num_days_from_sunday() as i64
        - from.weekday().num_days_from_sunday() as i64)
        % 7;
    from + Duration::days(offset)
}

/// Resolves "the nth `weekday` of `month`". Positive ordinals count from
/// the month start, negative from the month end (-1 = last). None when the
/// month has no such occurrence (e.g. a 5th Monday in a four-Monday month).
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: i8,
) -> Option<NaiveDate> {
    if ordinal == 0 {
        return None;
    }
    if ordinal > 0 {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let date = align_to_weekday(first, weekday) + Duration::days(7 * (ordinal as i64 - 1));
        (date.month() == month && date.year() == year).then_some(date)
    } else {
        let last = last_day_of_month(year, month)?;
        let back = (7 + last.weekday().num_days_from_sunday() as i64
            - weekday.num_days_from_sunday() as i64)
            % 7;
        let date = last - Duration::days(back + 7 * (-(ordinal as i64) - 1));
        (date.month() == month && date.year() == year).then_some(date)
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
}
