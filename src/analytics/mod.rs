/// Analytics engine for completion rates, streaks and calendar views
///
/// Everything in here is a pure function of a habit's completion log, its
/// expected frequency and a reference time. Nothing touches storage, and
/// calling any function twice with the same inputs gives the same output.

pub mod calendar;
pub mod frequency;
pub mod progress;
pub mod streak;

pub use calendar::{CalendarView, ColorTier, HeatmapCell, MonthCell, YearHeatmap};
pub use frequency::{normalize, NormalizedFrequency};
pub use progress::{BestHour, PeriodProgress, PeriodWindow};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::{parse_completions, FrequencyConfig, HabitRecord};

/// Lookback for the weekly success rate, in days
pub const WEEKLY_LOOKBACK_DAYS: i64 = 7;
/// Lookback for the monthly success rate, in days
pub const MONTHLY_LOOKBACK_DAYS: i64 = 30;

/// Every metric the engine derives for one habit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitMetrics {
    pub habit_id: String,
    pub name: String,
    pub frequency: NormalizedFrequency,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    pub active_days: u32,
    pub last_completed: Option<NaiveDate>,
    pub progress: PeriodProgress,
    pub weekly_success_rate: u32,
    pub monthly_success_rate: u32,
    pub best_hour: BestHour,
    pub consistency_score: u32,
}

/// Month grid or heatmap, tagged by layout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Calendar {
    Month {
        year: i32,
        month: u32,
        cells: Vec<MonthCell>,
    },
    Heatmap(YearHeatmap),
}

/// Analytics engine for processing habit data
///
/// Stateless; the struct exists so callers hold one handle the way they
/// hold a storage handle.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Canonical target for a frequency config
    pub fn normalize_frequency(&self, frequency: &FrequencyConfig) -> NormalizedFrequency {
        frequency::normalize(frequency)
    }

    /// Consecutive days ending today with at least one completion
    pub fn current_streak(&self, completions: &[String], now: NaiveDateTime) -> u32 {
        streak::current_streak(&parse_completions(completions), now)
    }

    /// Progress toward the target in the period containing `now`
    pub fn period_progress(
        &self,
        completions: &[String],
        frequency: &FrequencyConfig,
        now: NaiveDateTime,
    ) -> PeriodProgress {
        progress::period_progress(
            &parse_completions(completions),
            &frequency::normalize(frequency),
            now,
        )
    }

    /// 42-cell grid for the month containing `reference`
    pub fn month_grid(&self, completions: &[String], reference: NaiveDate, today: NaiveDate) -> Vec<MonthCell> {
        calendar::month_grid(&parse_completions(completions), reference, today)
    }

    /// 53 x 7 heatmap starting on the Sunday on or before one year before `today`
    ///
    /// The grid can end the day before `today`; see [`calendar::year_heatmap`].
    pub fn year_heatmap(&self, completions: &[String], today: NaiveDate) -> YearHeatmap {
        calendar::year_heatmap(&parse_completions(completions), today)
    }

    /// Compute all metrics for a habit
    pub fn habit_metrics(&self, habit: &HabitRecord, now: NaiveDateTime) -> HabitMetrics {
        let completions = parse_completions(&habit.completed_dates);
        let frequency = frequency::normalize(&habit.expected_frequency);

        let current_streak = streak::current_streak(&completions, now);

        HabitMetrics {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            frequency,
            current_streak,
            longest_streak: streak::longest_streak(&completions),
            total_completions: completions.len() as u32,
            active_days: progress::active_days(&completions),
            last_completed: completions.iter().map(|c| c.day).max(),
            progress: progress::period_progress(&completions, &frequency, now),
            weekly_success_rate: progress::lookback_success_rate(&completions, now, WEEKLY_LOOKBACK_DAYS),
            monthly_success_rate: progress::lookback_success_rate(&completions, now, MONTHLY_LOOKBACK_DAYS),
            best_hour: progress::best_hour(&completions),
            consistency_score: progress::consistency_score(&completions, current_streak, now),
        }
    }

    /// Calendar for a habit
    ///
    /// Without an explicit `view` the layout follows the habit's period.
    /// `reference` picks the month shown in month view.
    pub fn habit_calendar(
        &self,
        habit: &HabitRecord,
        view: Option<CalendarView>,
        reference: NaiveDate,
        today: NaiveDate,
    ) -> Calendar {
        let view = view.unwrap_or_else(|| {
            CalendarView::for_period(frequency::normalize(&habit.expected_frequency).period())
        });
        let completions = parse_completions(&habit.completed_dates);

        match view {
            CalendarView::Month => Calendar::Month {
                year: reference.year(),
                month: reference.month(),
                cells: calendar::month_grid(&completions, reference, today),
            },
            CalendarView::Heatmap => Calendar::Heatmap(calendar::year_heatmap(&completions, today)),
        }
    }
}
