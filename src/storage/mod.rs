/// Storage layer that supplies habit records
///
/// The analytics engine only ever sees the raw records handed out here.
/// Two stores implement the interface: SQLite for real use and an
/// in-memory mock store for development and tests.

pub mod memory;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

use thiserror::Error;

use crate::domain::{DomainError, HabitId, HabitRecord};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Completion not found: habit {habit_id} has no completion '{completed_at}'")]
    CompletionNotFound { habit_id: String, completed_at: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage lock poisoned")]
    Lock,

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the record source for habits
///
/// Implementations store completions exactly as given; parsing and
/// interpretation belong to the analytics engine.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &HabitRecord) -> Result<(), StorageError>;

    /// Get a habit by ID, including its full completion log
    fn get_habit(&self, habit_id: &HabitId) -> Result<HabitRecord, StorageError>;

    /// Replace a habit's name, frequency, tags and notes
    fn update_habit(&self, habit: &HabitRecord) -> Result<(), StorageError>;

    /// Delete a habit and its completions
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List habits, newest first, optionally only those carrying `tag`
    fn list_habits(&self, tag: Option<&str>) -> Result<Vec<HabitRecord>, StorageError>;

    /// Append one completion timestamp
    fn add_completion(&self, habit_id: &HabitId, completed_at: &str) -> Result<(), StorageError>;

    /// Remove one occurrence of an exact completion timestamp
    fn remove_completion(&self, habit_id: &HabitId, completed_at: &str) -> Result<(), StorageError>;
}
