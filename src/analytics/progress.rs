/// Period progress and rate metrics
///
/// Works out the calendar window a habit's target applies to, counts the
/// completions inside it and derives a capped completion rate. The fixed
/// lookback rates, best hour and consistency score share the same inputs
/// and live here as well.

use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::analytics::frequency::NormalizedFrequency;
use crate::domain::{distinct_days, Completion, Period};

/// An inclusive time range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PeriodWindow {
    /// Monday 00:00:00.000 through Sunday 23:59:59.999 of `now`'s week
    pub fn week_containing(now: NaiveDateTime) -> Self {
        let today = now.date();
        let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        Self::spanning(monday, monday + Duration::days(7))
    }

    /// First through last day of `now`'s month
    pub fn month_containing(now: NaiveDateTime) -> Self {
        let today = now.date();
        let first = today - Duration::days(today.day0() as i64);
        Self::spanning(first, first + Months::new(1))
    }

    /// January 1 through December 31 of `now`'s year
    pub fn year_containing(now: NaiveDateTime) -> Self {
        let today = now.date();
        let first = today - Duration::days(today.ordinal0() as i64);
        Self::spanning(first, first + Months::new(12))
    }

    /// Window a target of the given period is measured in
    ///
    /// Daily targets are measured over the current week.
    pub fn for_period(period: Period, now: NaiveDateTime) -> Self {
        match period {
            Period::Day | Period::Week => Self::week_containing(now),
            Period::Month => Self::month_containing(now),
            Period::Year => Self::year_containing(now),
        }
    }

    /// Whether `at` lies inside the window, bounds included
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }

    fn spanning(first: NaiveDate, next_first: NaiveDate) -> Self {
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: next_first.and_time(NaiveTime::MIN) - Duration::milliseconds(1),
        }
    }
}

/// Progress toward a habit's target in the active period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodProgress {
    /// Completions inside the window
    pub period_completions: u32,
    /// Completions the target asks for inside the window
    pub expected_in_period: f64,
    /// Percentage in `[0, 100]`
    pub completion_rate: f64,
    /// "This Week Progress", "This Month Progress" or "This Year Progress"
    pub period_label: String,
    pub window: PeriodWindow,
}

/// Compute progress toward the target for the period containing `now`
pub fn period_progress(
    completions: &[Completion],
    frequency: &NormalizedFrequency,
    now: NaiveDateTime,
) -> PeriodProgress {
    let (window_period, expected_in_period) = match *frequency {
        NormalizedFrequency::PerPeriod {
            count,
            period: Period::Day,
        } => (Period::Week, count as f64 * 7.0),
        NormalizedFrequency::PerPeriod { count, period } => (period, count as f64),
        NormalizedFrequency::PerWeek { times_per_week } => (Period::Week, times_per_week),
    };

    let window = PeriodWindow::for_period(window_period, now);
    let period_completions = completions.iter().filter(|c| window.contains(c.at)).count() as u32;

    PeriodProgress {
        period_completions,
        expected_in_period,
        completion_rate: capped_rate(period_completions, expected_in_period),
        period_label: period_label(window_period).to_string(),
        window,
    }
}

/// `min(done / expected, 1) * 100`, or 0 when nothing is expected
fn capped_rate(done: u32, expected: f64) -> f64 {
    if !expected.is_finite() || expected <= 0.0 {
        return 0.0;
    }
    (done as f64 / expected).min(1.0) * 100.0
}

fn period_label(window_period: Period) -> &'static str {
    match window_period {
        Period::Day | Period::Week => "This Week Progress",
        Period::Month => "This Month Progress",
        Period::Year => "This Year Progress",
    }
}

/// Completions in the trailing `days` days, `(now - days, now]`
pub fn completions_in_last_days(completions: &[Completion], now: NaiveDateTime, days: i64) -> u32 {
    let since = now - Duration::days(days);
    completions
        .iter()
        .filter(|c| c.at > since && c.at <= now)
        .count() as u32
}

/// `round(completions in the last `days` days / days * 100)`
///
/// Not capped: several completions a day can push this past 100.
pub fn lookback_success_rate(completions: &[Completion], now: NaiveDateTime, days: i64) -> u32 {
    let count = completions_in_last_days(completions, now, days);
    (count as f64 / days as f64 * 100.0).round() as u32
}

/// Hour of day with the most completions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestHour {
    Hour(u32),
    NotAvailable,
}

impl fmt::Display for BestHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BestHour::Hour(hour) => write!(f, "{:02}:00", hour),
            BestHour::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for BestHour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BestHour::Hour(hour) => serializer.serialize_u32(*hour),
            BestHour::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Most common local hour across the whole history
///
/// Ties go to the hour seen first in log order.
pub fn best_hour(completions: &[Completion]) -> BestHour {
    // (hour, count) in first-seen order
    let mut counts: Vec<(u32, u32)> = Vec::new();
    for completion in completions {
        let hour = completion.at.hour();
        match counts.iter_mut().find(|(h, _)| *h == hour) {
            Some((_, count)) => *count += 1,
            None => counts.push((hour, 1)),
        }
    }

    let mut best: Option<(u32, u32)> = None;
    for (hour, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((hour, count));
        }
    }

    best.map_or(BestHour::NotAvailable, |(hour, _)| BestHour::Hour(hour))
}

/// Number of distinct days with at least one completion
pub fn active_days(completions: &[Completion]) -> u32 {
    distinct_days(completions).len() as u32
}

/// Blend of streak length and day coverage, 0 to 100
///
/// `min(round(streak / 30 * 50) + round(active_days / total_days * 50), 100)`
/// where `total_days` runs from the earliest completion day through today.
pub fn consistency_score(completions: &[Completion], current_streak: u32, now: NaiveDateTime) -> u32 {
    let Some(earliest) = completions.iter().map(|c| c.day).min() else {
        return 0;
    };

    let total_days = ((now.date() - earliest).num_days() + 1).max(1);
    let active = active_days(completions);

    let streak_part = (current_streak as f64 / 30.0 * 50.0).round();
    let coverage_part = (active as f64 / total_days as f64 * 50.0).round();

    ((streak_part + coverage_part) as u32).min(100)
}
