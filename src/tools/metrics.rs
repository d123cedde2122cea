/// Tool for computing a habit's full analytics
///
/// This module implements the habit_metrics MCP tool.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analytics::streak::motivational_message;
use crate::analytics::{AnalyticsEngine, HabitMetrics};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_habit_id;

/// Parameters for the metrics tool
#[derive(Debug, Deserialize)]
pub struct HabitMetricsParams {
    pub habit_id: String,
}

/// Metrics plus a readable summary
#[derive(Debug, Serialize)]
pub struct HabitMetricsResponse {
    pub metrics: HabitMetrics,
    pub message: String,
}

/// Compute metrics for one habit as of `now`
pub fn habit_metrics<S: HabitStorage + ?Sized>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: HabitMetricsParams,
    now: NaiveDateTime,
) -> Result<HabitMetricsResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;

    let metrics = analytics.habit_metrics(&habit, now);
    tracing::debug!(
        "Computed metrics for '{}': streak {}, rate {:.1}",
        metrics.name,
        metrics.current_streak,
        metrics.progress.completion_rate
    );

    Ok(HabitMetricsResponse {
        message: render_metrics(&metrics),
        metrics,
    })
}

fn render_metrics(metrics: &HabitMetrics) -> String {
    let progress = &metrics.progress;
    let last_completed = metrics
        .last_completed
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());

    let lines = [
        format!("{} ({})", metrics.name, metrics.frequency.describe()),
        format!(
            "{}: {}/{} ({:.1}%)",
            progress.period_label,
            progress.period_completions,
            format_expected(progress.expected_in_period),
            progress.completion_rate
        ),
        format!(
            "Current streak: {} day{} (longest {})",
            metrics.current_streak,
            if metrics.current_streak == 1 { "" } else { "s" },
            metrics.longest_streak
        ),
        format!(
            "Completions: {} across {} active day{}, last on {}",
            metrics.total_completions,
            metrics.active_days,
            if metrics.active_days == 1 { "" } else { "s" },
            last_completed
        ),
        format!(
            "Last 7 days: {}%  Last 30 days: {}%",
            metrics.weekly_success_rate, metrics.monthly_success_rate
        ),
        format!("Best time: {}", metrics.best_hour),
        format!("Consistency score: {}/100", metrics.consistency_score),
        motivational_message(metrics.current_streak),
    ];

    lines.join("\n")
}

fn format_expected(expected: f64) -> String {
    if expected.fract() == 0.0 {
        format!("{:.0}", expected)
    } else {
        format!("{:.1}", expected)
    }
}
