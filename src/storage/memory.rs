/// In-memory mock store
///
/// Keeps habit records in a map behind a lock. Used by `--memory` for quick
/// local runs and by tests that do not need a database file.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{HabitId, HabitRecord};
use crate::storage::{HabitStorage, StorageError};

/// Habit records held in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    habits: RwLock<HashMap<HabitId, HabitRecord>>,
}

impl InMemoryStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with records
    pub fn with_habits(habits: impl IntoIterator<Item = HabitRecord>) -> Self {
        let map = habits.into_iter().map(|h| (h.id.clone(), h)).collect();
        Self {
            habits: RwLock::new(map),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<HabitId, HabitRecord>>, StorageError> {
        self.habits.read().map_err(|_| StorageError::Lock)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<HabitId, HabitRecord>>, StorageError> {
        self.habits.write().map_err(|_| StorageError::Lock)
    }
}

fn not_found(habit_id: &HabitId) -> StorageError {
    StorageError::HabitNotFound {
        habit_id: habit_id.to_string(),
    }
}

impl HabitStorage for InMemoryStorage {
    fn create_habit(&self, habit: &HabitRecord) -> Result<(), StorageError> {
        self.write()?.insert(habit.id.clone(), habit.clone());
        tracing::debug!("Created habit in memory: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<HabitRecord, StorageError> {
        self.read()?
            .get(habit_id)
            .cloned()
            .ok_or_else(|| not_found(habit_id))
    }

    fn update_habit(&self, habit: &HabitRecord) -> Result<(), StorageError> {
        let mut habits = self.write()?;
        let stored = habits.get_mut(&habit.id).ok_or_else(|| not_found(&habit.id))?;

        stored.name = habit.name.clone();
        stored.expected_frequency = habit.expected_frequency.clone();
        stored.tags = habit.tags.clone();
        stored.notes = habit.notes.clone();

        tracing::debug!("Updated habit in memory: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        self.write()?
            .remove(habit_id)
            .map(|_| ())
            .ok_or_else(|| not_found(habit_id))
    }

    fn list_habits(&self, tag: Option<&str>) -> Result<Vec<HabitRecord>, StorageError> {
        let mut habits: Vec<HabitRecord> = self
            .read()?
            .values()
            .filter(|h| tag.map_or(true, |t| h.has_tag(t)))
            .cloned()
            .collect();

        habits.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(habits)
    }

    fn add_completion(&self, habit_id: &HabitId, completed_at: &str) -> Result<(), StorageError> {
        let mut habits = self.write()?;
        let habit = habits.get_mut(habit_id).ok_or_else(|| not_found(habit_id))?;
        habit.completed_dates.push(completed_at.to_string());
        Ok(())
    }

    fn remove_completion(&self, habit_id: &HabitId, completed_at: &str) -> Result<(), StorageError> {
        let mut habits = self.write()?;
        let habit = habits.get_mut(habit_id).ok_or_else(|| not_found(habit_id))?;

        if habit.remove_completion(completed_at) {
            Ok(())
        } else {
            Err(StorageError::CompletionNotFound {
                habit_id: habit_id.to_string(),
                completed_at: completed_at.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FrequencyConfig, Period};

    fn habit(name: &str, tags: &[&str]) -> HabitRecord {
        HabitRecord::new(
            name.to_string(),
            FrequencyConfig::structured(1, Period::Day),
            tags.iter().map(|t| t.to_string()).collect(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let storage = InMemoryStorage::new();
        let record = habit("Read", &[]);
        storage.create_habit(&record).unwrap();

        assert_eq!(storage.get_habit(&record.id).unwrap(), record);
        assert!(matches!(
            storage.get_habit(&HabitId::new()),
            Err(StorageError::HabitNotFound { .. })
        ));
    }

    #[test]
    fn test_completions_keep_duplicates() {
        let storage = InMemoryStorage::new();
        let record = habit("Water", &[]);
        storage.create_habit(&record).unwrap();

        storage.add_completion(&record.id, "2025-06-20").unwrap();
        storage.add_completion(&record.id, "2025-06-20").unwrap();
        assert_eq!(storage.get_habit(&record.id).unwrap().completed_dates.len(), 2);

        storage.remove_completion(&record.id, "2025-06-20").unwrap();
        assert_eq!(storage.get_habit(&record.id).unwrap().completed_dates.len(), 1);
        assert!(matches!(
            storage.remove_completion(&record.id, "2025-06-19"),
            Err(StorageError::CompletionNotFound { .. })
        ));
    }

    #[test]
    fn test_update_keeps_completions() {
        let storage = InMemoryStorage::new();
        let mut record = habit("Walk", &[]);
        storage.create_habit(&record).unwrap();
        storage.add_completion(&record.id, "2025-06-20").unwrap();

        record.name = "Evening walk".to_string();
        storage.update_habit(&record).unwrap();

        let stored = storage.get_habit(&record.id).unwrap();
        assert_eq!(stored.name, "Evening walk");
        assert_eq!(stored.completed_dates, vec!["2025-06-20".to_string()]);
    }

    #[test]
    fn test_list_filters_by_tag() {
        let storage = InMemoryStorage::with_habits(vec![
            habit("Run", &["health"]),
            habit("Journal", &["mind"]),
            habit("Stretch", &["Health", "morning"]),
        ]);

        assert_eq!(storage.list_habits(None).unwrap().len(), 3);
        let health = storage.list_habits(Some("health")).unwrap();
        assert_eq!(health.len(), 2);
        assert!(health.iter().all(|h| h.name != "Journal"));
    }

    #[test]
    fn test_delete() {
        let storage = InMemoryStorage::new();
        let record = habit("Floss", &[]);
        storage.create_habit(&record).unwrap();

        storage.delete_habit(&record.id).unwrap();
        assert!(storage.get_habit(&record.id).is_err());
        assert!(storage.delete_habit(&record.id).is_err());
    }
}
