/// Streak calculation
///
/// A streak is a run of consecutive calendar days with at least one
/// completion. Only day coverage matters here: ten completions on one day
/// extend a streak exactly as far as one does.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{distinct_days, Completion};

/// Current consecutive-day streak ending today
///
/// The streak is 0 unless the latest completion day is `now`'s date; a
/// streak has to include today to count as current.
pub fn current_streak(completions: &[Completion], now: NaiveDateTime) -> u32 {
    let days: Vec<NaiveDate> = distinct_days(completions).into_iter().collect();

    let Some(latest) = days.last() else {
        return 0;
    };
    if *latest != now.date() {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2).rev() {
        if (pair[1] - pair[0]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

/// Longest consecutive-day run anywhere in the history
pub fn longest_streak(completions: &[Completion]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in distinct_days(completions) {
        run = match previous {
            Some(prev) if (day - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}

/// Get a motivational message based on the current streak
pub fn motivational_message(current_streak: u32) -> String {
    match current_streak {
        0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
        1 => "Great start! One day down, keep the momentum going.".to_string(),
        2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", current_streak),
        7..=13 => format!("Excellent! {} days strong. You're in the groove now!", current_streak),
        14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", current_streak),
        30..=99 => format!("Incredible! {} days of consistency. You're a habit master!", current_streak),
        _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", current_streak),
    }
}
