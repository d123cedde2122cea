/// Completion timestamp parsing
///
/// Completions are stored as the ISO-8601 strings the client sent, either a
/// bare date (`2025-06-20`) or a full date-time. This module turns them into
/// values the analytics engine can do date arithmetic on.

use std::collections::BTreeSet;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Naive date-time layouts accepted besides RFC 3339
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single parsed completion event
///
/// Streaks and calendar cells count by `day`. Period windows, lookbacks and
/// best hour use `at`, so an offset timestamp near midnight can land on
/// different days in the two views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Completion {
    /// Calendar date as written in the first 10 characters of the timestamp
    pub day: NaiveDate,
    /// Local wall-clock time of the completion (midnight for date-only input)
    pub at: NaiveDateTime,
}

/// Parse one completion timestamp
///
/// Returns `None` when the string is not a recognizable date or date-time.
/// Offset-bearing timestamps are converted to the local zone.
pub fn parse_completion(raw: &str) -> Option<Completion> {
    let raw = raw.trim();
    let day = raw
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())?;

    if raw.len() == 10 {
        return Some(Completion {
            day,
            at: day.and_time(NaiveTime::MIN),
        });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(Completion {
            day,
            at: dt.with_timezone(&Local).naive_local(),
        });
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|at| Completion { day, at })
}

/// Parse a whole completion log, skipping entries that do not parse
pub fn parse_completions<S: AsRef<str>>(raw: &[S]) -> Vec<Completion> {
    raw.iter()
        .filter_map(|entry| {
            let entry = entry.as_ref();
            let parsed = parse_completion(entry);
            if parsed.is_none() {
                tracing::debug!("Skipping unparseable completion timestamp: {:?}", entry);
            }
            parsed
        })
        .collect()
}

/// Distinct calendar days with at least one completion, in ascending order
pub fn distinct_days(completions: &[Completion]) -> BTreeSet<NaiveDate> {
    completions.iter().map(|c| c.day).collect()
}
