/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analytics::{normalize, AnalyticsEngine};
use crate::domain::{parse_completions, DomainError};
use crate::storage::{HabitStorage, StorageError};

/// Parameters for listing habits
#[derive(Debug, Deserialize)]
pub struct ListHabitsParams {
    pub tag: Option<String>,
    pub sort_by: Option<String>, // "name", "streak", "completion_rate", "total_completions"
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub target: String,
    pub tags: Vec<String>,
    pub current_streak: u32,
    /// Progress toward the target in the current period, 0 to 100
    pub completion_rate: f64,
    pub period_label: String,
    pub total_completions: u32,
    pub last_completed: Option<String>,
}

/// Summary statistics for all habits
#[derive(Debug, Serialize)]
pub struct HabitListSummary {
    pub total_habits: u32,
    pub habits_on_streak: u32,
    pub avg_completion_rate: f64,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub summary: HabitListSummary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortKey {
    Name,
    Streak,
    CompletionRate,
    TotalCompletions,
}

impl SortKey {
    fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "streak" | "current_streak" => Ok(SortKey::Streak),
            "completion_rate" | "rate" => Ok(SortKey::CompletionRate),
            "total_completions" | "completions" => Ok(SortKey::TotalCompletions),
            other => Err(DomainError::Validation {
                message: format!(
                    "Invalid sort_by '{}'. Valid options: name, streak, completion_rate, total_completions",
                    other
                ),
            }),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// List habits using the provided storage
///
/// Without `sort_by` habits come back newest first.
pub fn list_habits<S: HabitStorage + ?Sized>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: ListHabitsParams,
    now: NaiveDateTime,
) -> Result<ListHabitsResponse, StorageError> {
    let sort_key = params.sort_by.as_deref().map(SortKey::parse).transpose()?;
    let tag = params.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let habits = storage.list_habits(tag)?;

    let mut summaries: Vec<HabitSummary> = habits
        .into_iter()
        .map(|habit| {
            let progress = analytics.period_progress(&habit.completed_dates, &habit.expected_frequency, now);
            let parsed = parse_completions(&habit.completed_dates);
            let last_completed = parsed.iter().map(|c| c.day).max().map(|d| d.to_string());

            HabitSummary {
                habit_id: habit.id.to_string(),
                target: normalize(&habit.expected_frequency).describe(),
                current_streak: analytics.current_streak(&habit.completed_dates, now),
                completion_rate: round1(progress.completion_rate),
                period_label: progress.period_label,
                total_completions: parsed.len() as u32,
                last_completed,
                name: habit.name,
                tags: habit.tags,
            }
        })
        .collect();

    match sort_key {
        Some(SortKey::Name) => summaries.sort_by_key(|h| h.name.to_lowercase()),
        Some(SortKey::Streak) => summaries.sort_by(|a, b| b.current_streak.cmp(&a.current_streak)),
        Some(SortKey::CompletionRate) => {
            summaries.sort_by(|a, b| b.completion_rate.total_cmp(&a.completion_rate))
        }
        Some(SortKey::TotalCompletions) => {
            summaries.sort_by(|a, b| b.total_completions.cmp(&a.total_completions))
        }
        None => {}
    }

    let total_habits = summaries.len() as u32;
    let habits_on_streak = summaries.iter().filter(|h| h.current_streak > 0).count() as u32;
    let avg_completion_rate = if summaries.is_empty() {
        0.0
    } else {
        round1(summaries.iter().map(|h| h.completion_rate).sum::<f64>() / summaries.len() as f64)
    };

    tracing::debug!("Listed {} habits", total_habits);

    Ok(ListHabitsResponse {
        habits: summaries,
        summary: HabitListSummary {
            total_habits,
            habits_on_streak,
            avg_completion_rate,
        },
    })
}
