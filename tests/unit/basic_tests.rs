/// Basic unit tests to verify core functionality
use habit_analytics_mcp::*;
use serde_json::json;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = HabitRecord::new(
            "Test Habit".to_string(),
            FrequencyConfig::structured(2, Period::Week),
            vec!["health".to_string()],
            Some("A test habit".to_string()),
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert!(habit.completed_dates.is_empty());
    }

    #[test]
    fn test_record_json_shape() {
        let habit = HabitRecord::new(
            "Stretch".to_string(),
            FrequencyConfig::Text("3 times/week".to_string()),
            vec![],
            None,
        )
        .unwrap();

        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(value["expectedFrequency"], json!("3 times/week"));
        assert_eq!(value["completedDates"], json!([]));

        let back: HabitRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, habit);
    }

    #[test]
    fn test_frequency_from_loose_json() {
        assert_eq!(
            FrequencyConfig::from_value(&json!({"count": "2", "period": "Month"})),
            FrequencyConfig::structured(2, Period::Month)
        );
        assert_eq!(FrequencyConfig::from_value(&json!(4)), FrequencyConfig::TimesPerWeek(4.0));
        assert_eq!(FrequencyConfig::from_value(&json!([1])), FrequencyConfig::Absent);
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitAnalyticsServer::new(temp_file.path().to_path_buf()).await;
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_metrics_serialize_as_camel_case() {
        let habit = HabitRecord::new("Walk".to_string(), FrequencyConfig::Absent, vec![], None).unwrap();
        let now = chrono::NaiveDate::from_ymd_opt(2025, 6, 22)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let value = serde_json::to_value(AnalyticsEngine::new().habit_metrics(&habit, now)).unwrap();
        assert_eq!(value["bestHour"], json!("N/A"));
        assert_eq!(value["progress"]["periodLabel"], json!("This Week Progress"));
        assert_eq!(value["frequency"], json!({"kind": "perWeek", "timesPerWeek": 7.0}));
    }
}
