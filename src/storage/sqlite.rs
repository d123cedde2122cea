/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit records. It handles all SQL queries and the
/// conversion between rows and `HabitRecord`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::domain::{FrequencyConfig, HabitId, HabitRecord};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, name, expected_frequency, tags, notes, created_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database (useful for testing)
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Completions are removed with their habit through ON DELETE CASCADE
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Build a record from a habits row; completions are loaded separately
    fn row_to_habit(row: &Row<'_>) -> rusqlite::Result<HabitRecord> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        // Unreadable frequency or tags degrade to defaults instead of hiding the habit
        let frequency_json: Option<String> = row.get(2)?;
        let expected_frequency = match frequency_json {
            Some(json) => serde_json::from_str(&json).unwrap_or(FrequencyConfig::Text(json)),
            None => FrequencyConfig::Absent,
        };

        let tags_json: String = row.get(3)?;
        let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_default();

        let created_at_str: String = row.get(5)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(5, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
            })?
            .with_timezone(&Utc);

        Ok(HabitRecord::from_existing(
            id,
            row.get(1)?, // name
            Vec::new(),
            expected_frequency,
            tags,
            row.get(4)?, // notes
            created_at,
        ))
    }

    /// Completion timestamps for a habit in logging order
    fn load_completions(&self, habit_id: &HabitId) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_at FROM habit_completions WHERE habit_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![habit_id.to_string()], |row| row.get::<_, String>(0))?;

        let mut completions = Vec::new();
        for completion in rows {
            completions.push(completion?);
        }
        Ok(completions)
    }

    fn habit_exists(&self, habit_id: &HabitId) -> Result<bool, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn frequency_to_json(frequency: &FrequencyConfig) -> Result<Option<String>, StorageError> {
        match frequency {
            FrequencyConfig::Absent => Ok(None),
            other => Ok(Some(serde_json::to_string(other)?)),
        }
    }
}

impl HabitStorage for SqliteStorage {
    /// Create a new habit in the database
    fn create_habit(&self, habit: &HabitRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, expected_frequency, tags, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.id.to_string(),
                habit.name,
                Self::frequency_to_json(&habit.expected_frequency)?,
                serde_json::to_string(&habit.tags)?,
                habit.notes,
                habit.created_at.to_rfc3339(),
            ],
        )?;

        for completed_at in &habit.completed_dates {
            self.add_completion(&habit.id, completed_at)?;
        }

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Get a habit by its ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<HabitRecord, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
        let result = self
            .conn
            .query_row(&sql, params![habit_id.to_string()], Self::row_to_habit);

        let mut habit = match result {
            Ok(habit) => habit,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StorageError::HabitNotFound {
                    habit_id: habit_id.to_string(),
                });
            }
            Err(e) => return Err(StorageError::Query(e)),
        };

        habit.completed_dates = self.load_completions(habit_id)?;
        Ok(habit)
    }

    /// Update an existing habit's descriptive fields
    fn update_habit(&self, habit: &HabitRecord) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?2,
                expected_frequency = ?3,
                tags = ?4,
                notes = ?5
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                Self::frequency_to_json(&habit.expected_frequency)?,
                serde_json::to_string(&habit.tags)?,
                habit.notes,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Delete a habit; its completions go with it
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![habit_id.to_string()])?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    /// List habits with optional tag filtering
    fn list_habits(&self, tag: Option<&str>) -> Result<Vec<HabitRecord>, StorageError> {
        let sql = format!("SELECT {} FROM habits ORDER BY created_at DESC, name", HABIT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let habit_iter = stmt.query_map([], Self::row_to_habit)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            let mut habit = habit?;
            if let Some(tag) = tag {
                if !habit.has_tag(tag) {
                    continue;
                }
            }
            habit.completed_dates = self.load_completions(&habit.id)?;
            habits.push(habit);
        }

        Ok(habits)
    }

    /// Append a completion to a habit's log
    fn add_completion(&self, habit_id: &HabitId, completed_at: &str) -> Result<(), StorageError> {
        if !self.habit_exists(habit_id)? {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        self.conn.execute(
            "INSERT INTO habit_completions (habit_id, completed_at) VALUES (?1, ?2)",
            params![habit_id.to_string(), completed_at],
        )?;

        tracing::debug!("Logged completion {} for habit {}", completed_at, habit_id);
        Ok(())
    }

    /// Remove the earliest-logged matching completion
    fn remove_completion(&self, habit_id: &HabitId, completed_at: &str) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habit_completions WHERE id = (
                SELECT id FROM habit_completions
                WHERE habit_id = ?1 AND completed_at = ?2
                ORDER BY id LIMIT 1
            )",
            params![habit_id.to_string(), completed_at],
        )?;

        if rows_affected == 0 {
            if !self.habit_exists(habit_id)? {
                return Err(StorageError::HabitNotFound {
                    habit_id: habit_id.to_string(),
                });
            }
            return Err(StorageError::CompletionNotFound {
                habit_id: habit_id.to_string(),
                completed_at: completed_at.to_string(),
            });
        }

        tracing::debug!("Removed completion {} for habit {}", completed_at, habit_id);
        Ok(())
    }
}
