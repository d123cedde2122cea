/// Worked examples for streaks, period progress, tiers and frequency parsing
use chrono::{NaiveDate, NaiveDateTime};
use habit_analytics_mcp::*;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
}

fn log(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

fn record(entries: &[&str], frequency: FrequencyConfig) -> HabitRecord {
    HabitRecord::from_existing(
        HabitId::new(),
        "Scenario".to_string(),
        log(entries),
        frequency,
        vec![],
        None,
        chrono::Utc::now(),
    )
}

#[test]
fn test_three_day_daily_streak() {
    let engine = AnalyticsEngine::new();
    let habit = record(
        &["2025-06-20", "2025-06-21", "2025-06-22"],
        FrequencyConfig::structured(1, Period::Day),
    );

    let metrics = engine.habit_metrics(&habit, at(2025, 6, 22, 21));
    assert_eq!(metrics.current_streak, 3);
    assert_eq!(engine.current_streak(&habit.completed_dates, at(2025, 6, 22, 21)), 3);
}

#[test]
fn test_empty_history() {
    let engine = AnalyticsEngine::new();
    let habit = record(&[], FrequencyConfig::structured(1, Period::Day));

    let metrics = engine.habit_metrics(&habit, at(2025, 6, 22, 21));
    assert_eq!(metrics.current_streak, 0);
    assert_eq!(metrics.progress.completion_rate, 0.0);
    assert_eq!(metrics.best_hour, BestHour::NotAvailable);
    assert_eq!(metrics.best_hour.to_string(), "N/A");
}

#[test]
fn test_weekly_target_midweek() {
    let engine = AnalyticsEngine::new();
    // 2025-06-18 is a Wednesday
    let progress = engine.period_progress(
        &log(&["2025-06-16T07:00:00", "2025-06-17T07:00:00"]),
        &FrequencyConfig::structured(3, Period::Week),
        at(2025, 6, 18, 12),
    );

    assert_eq!(progress.period_completions, 2);
    assert_eq!(progress.expected_in_period, 3.0);
    assert!((progress.completion_rate - 66.666).abs() < 0.01);
}

#[test]
fn test_busiest_day_gets_top_tier() {
    let engine = AnalyticsEngine::new();
    let today = NaiveDate::from_ymd_opt(2025, 6, 22).unwrap();
    let cells = engine.month_grid(&log(&["2025-06-10"; 5]), today, today);

    let busiest = cells
        .iter()
        .find(|c| c.iso_date == NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
        .unwrap();
    assert_eq!(busiest.completion_count, 5);
    assert_eq!(busiest.color_tier.level(), 4);
    assert_eq!(ColorTier::for_count(5, 5), ColorTier::Max);
}

#[test]
fn test_every_two_days_is_four_per_week() {
    let engine = AnalyticsEngine::new();
    assert_eq!(
        engine.normalize_frequency(&FrequencyConfig::Text("every 2 days".to_string())),
        NormalizedFrequency::PerWeek { times_per_week: 4.0 }
    );
}

#[test]
fn test_ten_completions_on_one_day() {
    let engine = AnalyticsEngine::new();
    let habit = record(&["2025-06-22T08:00:00"; 10], FrequencyConfig::Absent);

    let same_day = engine.habit_metrics(&habit, at(2025, 6, 22, 21));
    assert_eq!(same_day.active_days, 1);
    assert_eq!(same_day.total_completions, 10);
    assert_eq!(same_day.current_streak, 1);

    let next_day = engine.habit_metrics(&habit, at(2025, 6, 23, 9));
    assert_eq!(next_day.current_streak, 0);
}

#[test]
fn test_day_period_measured_over_week() {
    let engine = AnalyticsEngine::new();
    let progress = engine.period_progress(
        &log(&["2025-06-16", "2025-06-17", "2025-06-18"]),
        &FrequencyConfig::structured(2, Period::Day),
        at(2025, 6, 18, 12),
    );

    assert_eq!(progress.expected_in_period, 14.0);
    assert_eq!(progress.period_label, "This Week Progress");
}

#[test]
fn test_unparseable_entries_are_skipped() {
    let engine = AnalyticsEngine::new();
    let habit = record(
        &["2025-06-21", "not a date", "2025-13-40", "2025-06-22T06:00:00"],
        FrequencyConfig::Absent,
    );

    let metrics = engine.habit_metrics(&habit, at(2025, 6, 22, 21));
    assert_eq!(metrics.total_completions, 2);
    assert_eq!(metrics.current_streak, 2);
}
