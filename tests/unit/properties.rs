/// Invariants that hold for any completion log
use chrono::{Duration, NaiveDate, NaiveDateTime};
use habit_analytics_mcp::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 22).unwrap().and_hms_opt(20, 0, 0).unwrap()
}

/// Deterministic spread of logs with gaps, repeats and stale entries
fn sample_logs() -> Vec<Vec<String>> {
    let today = now().date();
    let mut logs = vec![Vec::new()];

    for pattern in 1..=12u32 {
        let log: Vec<String> = (0..60i64)
            .filter(|offset| (*offset as u32 * 7 + pattern) % (pattern + 1) != 0)
            .flat_map(|offset| {
                let day = today - Duration::days(offset + (pattern % 3) as i64);
                let repeats = 1 + (offset as u32 + pattern) % 3;
                (0..repeats).map(move |r| format!("{}T{:02}:15:00", day, (6 + r * 5) % 24))
            })
            .collect();
        logs.push(log);
    }

    logs
}

fn frequencies() -> Vec<FrequencyConfig> {
    vec![
        FrequencyConfig::structured(1, Period::Day),
        FrequencyConfig::structured(3, Period::Week),
        FrequencyConfig::structured(4, Period::Month),
        FrequencyConfig::structured(50, Period::Year),
        FrequencyConfig::TimesPerWeek(2.5),
        FrequencyConfig::TimesPerWeek(0.0),
        FrequencyConfig::Text("every 3 days".to_string()),
        FrequencyConfig::Text("gibberish".to_string()),
        FrequencyConfig::Absent,
    ]
}

#[test]
fn test_logging_today_never_shortens_streak() {
    let engine = AnalyticsEngine::new();
    for mut log in sample_logs() {
        let before = engine.current_streak(&log, now());
        log.push(now().date().to_string());
        let after = engine.current_streak(&log, now());
        assert!(after >= before, "streak dropped from {} to {}", before, after);
    }
}

#[test]
fn test_completion_rate_stays_in_range() {
    let engine = AnalyticsEngine::new();
    for log in sample_logs() {
        for frequency in frequencies() {
            let rate = engine.period_progress(&log, &frequency, now()).completion_rate;
            assert!(rate.is_finite());
            assert!((0.0..=100.0).contains(&rate), "rate {} out of range", rate);
        }
    }
}

#[test]
fn test_tier_non_decreasing_in_count() {
    for max in 1..=20 {
        let tiers: Vec<ColorTier> = (0..=25).map(|count| ColorTier::for_count(count, max)).collect();
        assert!(tiers.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}

#[test]
fn test_grid_sizes_are_fixed() {
    let engine = AnalyticsEngine::new();
    let today = now().date();
    for log in sample_logs() {
        for month in 1..=12 {
            let reference = NaiveDate::from_ymd_opt(2024, month, 15).unwrap();
            assert_eq!(engine.month_grid(&log, reference, today).len(), 42);
        }

        let heatmap = engine.year_heatmap(&log, today);
        assert_eq!(heatmap.weeks.len(), 53);
        assert_eq!(heatmap.weeks.iter().map(Vec::len).sum::<usize>(), 371);
    }

    // Leap day as today
    let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(engine.year_heatmap(&[], leap).weeks.len(), 53);
}

#[test]
fn test_identical_inputs_give_identical_output() {
    let engine = AnalyticsEngine::new();
    for log in sample_logs() {
        for frequency in frequencies() {
            let habit = HabitRecord::from_existing(
                HabitId::new(),
                "Repeatable".to_string(),
                log.clone(),
                frequency,
                vec![],
                None,
                chrono::Utc::now(),
            );
            assert_eq!(engine.habit_metrics(&habit, now()), engine.habit_metrics(&habit, now()));
            assert_eq!(
                engine.habit_calendar(&habit, None, now().date(), now().date()),
                engine.habit_calendar(&habit, None, now().date(), now().date())
            );
        }
    }
}
