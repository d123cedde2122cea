/// End-to-end tool flows over SQLite and the in-memory store
use chrono::{NaiveDate, NaiveDateTime};
use habit_analytics_mcp::tools::*;
use habit_analytics_mcp::*;
use serde_json::json;
use tempfile::tempdir;

fn wednesday() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 18).unwrap().and_hms_opt(19, 0, 0).unwrap()
}

fn create<S: HabitStorage + ?Sized>(storage: &S, args: serde_json::Value) -> String {
    let params: CreateHabitParams = serde_json::from_value(args).unwrap();
    create_habit(storage, params).unwrap().habit_id.unwrap()
}

fn log_at<S: HabitStorage + ?Sized>(storage: &S, habit_id: &str, at: &str) -> LogHabitResponse {
    log_habit(
        storage,
        &AnalyticsEngine::new(),
        LogHabitParams {
            habit_id: habit_id.to_string(),
            completed_at: Some(at.to_string()),
        },
        wednesday(),
    )
    .unwrap()
}

fn run_workflow<S: HabitStorage + ?Sized>(storage: &S) {
    let engine = AnalyticsEngine::new();
    let gym = create(storage, json!({"name": "Gym", "frequency": {"count": 3, "period": "week"}, "tags": ["health"]}));
    let journal = create(storage, json!({"name": "Journal", "frequency": "daily", "tags": ["mind"]}));

    log_at(storage, &gym, "2025-06-16T07:00:00");
    log_at(storage, &gym, "2025-06-17T07:10:00");
    for day in ["2025-06-16", "2025-06-17", "2025-06-18"] {
        log_at(storage, &journal, day);
    }

    let metrics = habit_metrics(storage, &engine, HabitMetricsParams { habit_id: gym.clone() }, wednesday()).unwrap();
    assert_eq!(metrics.metrics.progress.period_completions, 2);
    assert!((metrics.metrics.progress.completion_rate - 66.67).abs() < 0.01);
    assert_eq!(metrics.metrics.best_hour, BestHour::Hour(7));

    let journal_metrics =
        habit_metrics(storage, &engine, HabitMetricsParams { habit_id: journal.clone() }, wednesday()).unwrap();
    assert_eq!(journal_metrics.metrics.current_streak, 3);
    assert_eq!(journal_metrics.metrics.weekly_success_rate, 43);

    let listed = list_habits(
        storage,
        &engine,
        ListHabitsParams {
            tag: None,
            sort_by: Some("streak".to_string()),
        },
        wednesday(),
    )
    .unwrap();
    assert_eq!(listed.habits.len(), 2);
    assert_eq!(listed.habits[0].name, "Journal");

    let updated: UpdateHabitParams =
        serde_json::from_value(json!({"habit_id": gym, "frequency": 2})).unwrap();
    update_habit(storage, updated).unwrap();
    let metrics = habit_metrics(storage, &engine, HabitMetricsParams { habit_id: gym.clone() }, wednesday()).unwrap();
    assert_eq!(metrics.metrics.progress.completion_rate, 100.0);

    let unlogged = unlog_habit(
        storage,
        &engine,
        UnlogHabitParams {
            habit_id: journal.clone(),
            completed_at: "2025-06-18".to_string(),
        },
        wednesday(),
    )
    .unwrap();
    assert_eq!(unlogged.current_streak, 0);
    assert_eq!(unlogged.remaining_completions, 2);

    let calendar = habit_calendar(
        storage,
        &engine,
        HabitCalendarParams {
            habit_id: journal.clone(),
            view: Some("heatmap".to_string()),
            month: None,
        },
        wednesday(),
    )
    .unwrap();
    match calendar.calendar {
        Calendar::Heatmap(heatmap) => assert_eq!(heatmap.total_completions, 2),
        other => panic!("expected heatmap, got {:?}", other),
    }

    delete_habit(storage, DeleteHabitParams { habit_id: journal }).unwrap();
    assert_eq!(storage.list_habits(None).unwrap().len(), 1);
}

#[test]
fn test_workflow_in_memory() {
    run_workflow(&InMemoryStorage::new());
}

#[test]
fn test_workflow_sqlite() {
    let temp_dir = tempdir().unwrap();
    let storage = SqliteStorage::new(temp_dir.path().join("habits.db")).unwrap();
    run_workflow(&storage);
}

#[test]
fn test_workflow_through_boxed_store() {
    let server = HabitAnalyticsServer::in_memory();
    run_workflow(server.storage());
}

#[test]
fn test_future_completion_is_rejected() {
    let storage = InMemoryStorage::new();
    let habit_id = create(&storage, json!({"name": "Nap"}));

    let result = log_habit(
        &storage,
        &AnalyticsEngine::new(),
        LogHabitParams {
            habit_id: habit_id.clone(),
            completed_at: Some("2025-06-19".to_string()),
        },
        wednesday(),
    );
    assert!(matches!(result, Err(StorageError::Domain(DomainError::InvalidDate(_)))));
}
