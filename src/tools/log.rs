/// Tools for logging and removing habit completions
///
/// This module implements the habit_log and habit_unlog MCP tools.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analytics::streak::motivational_message;
use crate::analytics::AnalyticsEngine;
use crate::domain::{parse_completions, HabitRecord};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_habit_id;

/// Timestamp format used when no completion time is supplied
const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parameters for logging a habit completion
#[derive(Debug, Deserialize)]
pub struct LogHabitParams {
    pub habit_id: String,
    /// ISO date or date-time; defaults to now
    pub completed_at: Option<String>,
}

/// Response from logging a habit
#[derive(Debug, Serialize)]
pub struct LogHabitResponse {
    pub success: bool,
    pub completed_at: String,
    pub current_streak: u32,
    pub total_completions: u32,
    pub message: String,
}

/// Parameters for removing a logged completion
#[derive(Debug, Deserialize)]
pub struct UnlogHabitParams {
    pub habit_id: String,
    /// Exact timestamp as it was logged
    pub completed_at: String,
}

/// Response from removing a completion
#[derive(Debug, Serialize)]
pub struct UnlogHabitResponse {
    pub success: bool,
    pub current_streak: u32,
    pub remaining_completions: u32,
    pub message: String,
}

/// Log a habit completion using the provided storage
///
/// The timestamp must parse and must not be later than `now`. Repeat
/// completions on the same day are kept; each one counts.
pub fn log_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: LogHabitParams,
    now: NaiveDateTime,
) -> Result<LogHabitResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let completed_at = match params.completed_at.as_deref().map(str::trim) {
        Some(ts) if !ts.is_empty() => ts.to_string(),
        _ => now.format(LOCAL_TIMESTAMP_FORMAT).to_string(),
    };

    HabitRecord::validate_completion(&completed_at, now)?;
    storage.add_completion(&habit_id, &completed_at)?;
    habit.completed_dates.push(completed_at.clone());

    let current_streak = analytics.current_streak(&habit.completed_dates, now);
    tracing::info!(
        "Logged completion {} for '{}', streak now {}",
        completed_at,
        habit.name,
        current_streak
    );

    Ok(LogHabitResponse {
        success: true,
        message: format!(
            "Logged '{}'! Current streak: {} day{}. {}",
            habit.name,
            current_streak,
            if current_streak == 1 { "" } else { "s" },
            motivational_message(current_streak)
        ),
        completed_at,
        current_streak,
        total_completions: parse_completions(&habit.completed_dates).len() as u32,
    })
}

/// Remove one occurrence of a logged completion
pub fn unlog_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: UnlogHabitParams,
    now: NaiveDateTime,
) -> Result<UnlogHabitResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let completed_at = params.completed_at.trim();

    storage.remove_completion(&habit_id, completed_at)?;
    let habit = storage.get_habit(&habit_id)?;

    let current_streak = analytics.current_streak(&habit.completed_dates, now);
    let remaining_completions = parse_completions(&habit.completed_dates).len() as u32;
    tracing::info!("Removed completion {} from '{}'", completed_at, habit.name);

    Ok(UnlogHabitResponse {
        success: true,
        message: format!(
            "Removed completion {} from '{}'. {} completion{} remaining, current streak {}.",
            completed_at,
            habit.name,
            remaining_completions,
            if remaining_completions == 1 { "" } else { "s" },
            current_streak
        ),
        current_streak,
        remaining_completions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FrequencyConfig, HabitId, Period};
    use crate::storage::InMemoryStorage;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 22).unwrap().and_hms_opt(18, 30, 0).unwrap()
    }

    fn setup() -> (InMemoryStorage, HabitId) {
        let habit = HabitRecord::new(
            "Read".to_string(),
            FrequencyConfig::structured(1, Period::Day),
            vec![],
            None,
        )
        .unwrap();
        let id = habit.id.clone();
        (InMemoryStorage::with_habits(vec![habit]), id)
    }

    fn log(storage: &InMemoryStorage, id: &HabitId, at: Option<&str>) -> Result<LogHabitResponse, StorageError> {
        log_habit(
            storage,
            &AnalyticsEngine::new(),
            LogHabitParams {
                habit_id: id.to_string(),
                completed_at: at.map(str::to_string),
            },
            now(),
        )
    }

    #[test]
    fn test_log_defaults_to_now() {
        let (storage, id) = setup();
        let response = log(&storage, &id, None).unwrap();

        assert_eq!(response.completed_at, "2025-06-22T18:30:00");
        assert_eq!(response.current_streak, 1);
        assert_eq!(storage.get_habit(&id).unwrap().completed_dates, vec!["2025-06-22T18:30:00"]);
    }

    #[test]
    fn test_log_builds_streak() {
        let (storage, id) = setup();
        log(&storage, &id, Some("2025-06-20")).unwrap();
        log(&storage, &id, Some("2025-06-21T07:15:00")).unwrap();
        let response = log(&storage, &id, Some("2025-06-22")).unwrap();

        assert_eq!(response.current_streak, 3);
        assert_eq!(response.total_completions, 3);
        assert!(response.message.contains("3 days"));
    }

    #[test]
    fn test_log_rejects_future_and_garbage() {
        let (storage, id) = setup();
        assert!(log(&storage, &id, Some("2025-06-23")).is_err());
        assert!(log(&storage, &id, Some("2025-06-22T19:00:00")).is_err());
        assert!(log(&storage, &id, Some("yesterday")).is_err());
        assert!(storage.get_habit(&id).unwrap().completed_dates.is_empty());
    }

    #[test]
    fn test_totals_skip_unparseable_entries() {
        let mut habit = HabitRecord::new(
            "Read".to_string(),
            FrequencyConfig::structured(1, Period::Day),
            vec![],
            None,
        )
        .unwrap();
        habit.completed_dates = vec!["2025-06-21".to_string(), "garbage".to_string()];
        let id = habit.id.clone();
        let storage = InMemoryStorage::with_habits(vec![habit]);

        let response = log(&storage, &id, Some("2025-06-22")).unwrap();
        assert_eq!(response.total_completions, 2);
        assert_eq!(response.current_streak, 2);

        let response = unlog_habit(
            &storage,
            &AnalyticsEngine::new(),
            UnlogHabitParams {
                habit_id: id.to_string(),
                completed_at: "2025-06-22".to_string(),
            },
            now(),
        )
        .unwrap();
        assert_eq!(response.remaining_completions, 1);
        assert_eq!(storage.get_habit(&id).unwrap().completed_dates.len(), 2);
    }

    #[test]
    fn test_log_unknown_habit() {
        let (storage, _) = setup();
        assert!(matches!(
            log(&storage, &HabitId::new(), None),
            Err(StorageError::HabitNotFound { .. })
        ));
    }

    #[test]
    fn test_unlog_removes_single_occurrence() {
        let (storage, id) = setup();
        log(&storage, &id, Some("2025-06-22")).unwrap();
        log(&storage, &id, Some("2025-06-22")).unwrap();

        let unlog = |at: &str| {
            unlog_habit(
                &storage,
                &AnalyticsEngine::new(),
                UnlogHabitParams {
                    habit_id: id.to_string(),
                    completed_at: at.to_string(),
                },
                now(),
            )
        };

        let response = unlog("2025-06-22").unwrap();
        assert_eq!(response.remaining_completions, 1);
        assert_eq!(response.current_streak, 1);

        assert_eq!(unlog("2025-06-22").unwrap().current_streak, 0);
        assert!(matches!(unlog("2025-06-22"), Err(StorageError::CompletionNotFound { .. })));
    }
}
