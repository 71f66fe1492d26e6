// File: ./src/audit.rs
//
// Regression detector for silent under-generation. A weekly night that
// expands to one date over a five-week window is almost always an engine
// bug, not a quiet month; this layer flags it without ever touching the
// expansion output. The diagnostic goes through the `log` facade, so test
// runs (which install no logger) stay silent and only the deployed
// runtime reports.
use crate::model::item::{Frequency, Recurrence, Window};

/// Checks an expansion result against the plausible minimum for its
/// frequency and window length. Returns the diagnostic line when the count
/// is implausibly low, None otherwise. At most one line per call.
pub fn audit_expansion(
    rec: &Recurrence,
    observed: usize,
    window: Window,
    event_label: &str,
) -> Option<String> {
    // An explicit bound means truncation is intentional, never a bug.
    if rec.bound.is_some() {
        return None;
    }

    let days = window.len_days();
    // Short windows legitimately hold zero or one date; warning there was
    // a recurring false-positive source.
    let grace_days = match rec.frequency {
        Frequency::Weekly | Frequency::Biweekly => 14 * rec.week_stride() as i64,
        Frequency::OrdinalMonthly => 56,
        // No plausibility model for explicit date lists or one-offs.
        Frequency::Custom | Frequency::None => return None,
    };
    if days < grace_days || observed >= 2 {
        return None;
    }

    let line = format!(
        "sparse expansion for '{}' ({} pattern, {}..{}, {} days): expected >=2 occurrences, got {}",
        event_label,
        rec.frequency,
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d"),
        days,
        observed
    );
    log::warn!("{line}");
    Some(line)
}
