/// Basic integration tests
use habit_analytics_mcp::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitAnalyticsServer::new(temp_file.path().to_path_buf())
            .await
            .expect("Failed to create server");

        let habit = HabitRecord::new(
            "Morning Run".to_string(),
            FrequencyConfig::structured(3, Period::Week),
            vec![],
            None,
        )
        .unwrap();
        server.storage().create_habit(&habit).unwrap();
        server.storage().add_completion(&habit.id, "2025-06-16T06:30:00").unwrap();

        let stored = server.storage().get_habit(&habit.id).unwrap();
        let now = chrono::NaiveDate::from_ymd_opt(2025, 6, 18)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let metrics = server.analytics().habit_metrics(&stored, now);

        assert_eq!(metrics.progress.period_completions, 1);
        assert_eq!(metrics.best_hour, BestHour::Hour(6));
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let habit = HabitRecord::new(
            "Read".to_string(),
            FrequencyConfig::Text("every 2 days".to_string()),
            vec!["mind".to_string()],
            Some("Fiction counts".to_string()),
        )
        .unwrap();

        {
            let server = HabitAnalyticsServer::new(db_path.clone())
                .await
                .expect("Failed to create first server");
            server.storage().create_habit(&habit).unwrap();
            server.storage().add_completion(&habit.id, "2025-06-20").unwrap();
            server.storage().add_completion(&habit.id, "2025-06-20").unwrap();
        }

        let server2 = HabitAnalyticsServer::new(db_path)
            .await
            .expect("Failed to create second server");
        let reloaded = server2.storage().get_habit(&habit.id).unwrap();

        assert_eq!(reloaded.name, "Read");
        assert_eq!(reloaded.expected_frequency, habit.expected_frequency);
        assert_eq!(reloaded.tags, vec!["mind".to_string()]);
        assert_eq!(reloaded.notes.as_deref(), Some("Fiction counts"));
        assert_eq!(reloaded.completed_dates.len(), 2);
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let sqlite = SqliteStorage::new(temp_file.path().to_path_buf()).expect("Failed to create storage");
        let memory = InMemoryStorage::new();

        let stores: Vec<&dyn HabitStorage> = vec![&sqlite, &memory];
        for storage in stores {
            let habit = HabitRecord::new("Floss".to_string(), FrequencyConfig::Absent, vec![], None).unwrap();
            storage.create_habit(&habit).unwrap();
            storage.add_completion(&habit.id, "2025-06-21").unwrap();
            storage.remove_completion(&habit.id, "2025-06-21").unwrap();
            assert!(matches!(
                storage.remove_completion(&habit.id, "2025-06-21"),
                Err(StorageError::CompletionNotFound { .. })
            ));
            storage.delete_habit(&habit.id).unwrap();
            assert!(storage.list_habits(None).unwrap().is_empty());
        }
    }
}
