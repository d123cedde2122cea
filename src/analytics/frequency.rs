/// Expected-frequency normalization
///
/// Turns any shape of `FrequencyConfig` into one canonical target before a
/// calculation runs. Structured configs keep their own period; every legacy
/// shape becomes a per-week rate.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::{FrequencyConfig, Period};

/// Rate used for absent or unrecognized frequencies (daily)
pub const DEFAULT_TIMES_PER_WEEK: f64 = 7.0;

static TIMES_PER_WEEK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*times?\s*(?:per|/)\s*week").expect("valid times-per-week regex")
});
static EVERY_N_DAYS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"every\s+(\d+)\s*days?").expect("valid every-n-days regex"));

/// Canonical frequency target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NormalizedFrequency {
    /// `count` completions per `period`, evaluated against that period
    #[serde(rename_all = "camelCase")]
    PerPeriod { count: u32, period: Period },
    /// Legacy rate, evaluated against the current week
    #[serde(rename_all = "camelCase")]
    PerWeek { times_per_week: f64 },
}

impl NormalizedFrequency {
    /// The period whose calendar window this target is measured in
    ///
    /// Per-week rates are measured weekly.
    pub fn period(&self) -> Period {
        match self {
            NormalizedFrequency::PerPeriod { period, .. } => *period,
            NormalizedFrequency::PerWeek { .. } => Period::Week,
        }
    }

    /// Human readable form, e.g. "3 times per week"
    pub fn describe(&self) -> String {
        match self {
            NormalizedFrequency::PerPeriod { count: 1, period } => format!("once per {}", period),
            NormalizedFrequency::PerPeriod { count, period } => {
                format!("{} times per {}", count, period)
            }
            NormalizedFrequency::PerWeek { times_per_week } => {
                format!("{} times per week", format_rate(*times_per_week))
            }
        }
    }
}

fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{:.0}", rate)
    } else {
        format!("{:.1}", rate)
    }
}

/// Normalize a frequency config. Never fails.
pub fn normalize(config: &FrequencyConfig) -> NormalizedFrequency {
    match config {
        FrequencyConfig::Structured { count, period } => NormalizedFrequency::PerPeriod {
            count: *count,
            period: *period,
        },
        FrequencyConfig::TimesPerWeek(times) if times.is_finite() && *times >= 0.0 => {
            NormalizedFrequency::PerWeek {
                times_per_week: *times,
            }
        }
        FrequencyConfig::TimesPerWeek(times) => {
            tracing::debug!("Ignoring invalid numeric frequency {}, using daily", times);
            NormalizedFrequency::PerWeek {
                times_per_week: DEFAULT_TIMES_PER_WEEK,
            }
        }
        FrequencyConfig::Text(text) => NormalizedFrequency::PerWeek {
            times_per_week: times_per_week_from_text(text),
        },
        FrequencyConfig::Absent => NormalizedFrequency::PerWeek {
            times_per_week: DEFAULT_TIMES_PER_WEEK,
        },
    }
}

/// Extract a per-week rate from legacy frequency text
///
/// Recognizes "daily", "weekly", "N times per week", "N times/week" and
/// "every N days". Anything else is treated as daily.
pub fn times_per_week_from_text(text: &str) -> f64 {
    let text = text.trim().to_lowercase();

    match text.as_str() {
        "" | "daily" => return DEFAULT_TIMES_PER_WEEK,
        "weekly" => return 1.0,
        _ => {}
    }

    if let Some(times) = capture_number(&TIMES_PER_WEEK_RE, &text) {
        return times as f64;
    }

    if let Some(days) = capture_number(&EVERY_N_DAYS_RE, &text).filter(|d| *d > 0) {
        return (7.0 / days as f64).round();
    }

    tracing::debug!("Unrecognized frequency text {:?}, using daily", text);
    DEFAULT_TIMES_PER_WEEK
}

fn capture_number(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
