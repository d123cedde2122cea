/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analytics::normalize;
use crate::domain::{FrequencyConfig, HabitRecord};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_frequency_arg;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    /// Structured object, times-per-week number, or free text
    #[serde(default)]
    pub frequency: Option<Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: Option<String>,
    /// Human-readable target, e.g. "3 times per week"
    pub target: String,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, StorageError> {
    let frequency = match params.frequency {
        Some(ref value) => parse_frequency_arg(value)?,
        None => FrequencyConfig::Absent,
    };

    let notes = params.notes.filter(|n| !n.trim().is_empty());
    let habit = HabitRecord::new(params.name, frequency, params.tags, notes)?;
    let target = normalize(&habit.expected_frequency).describe();

    storage.create_habit(&habit)?;
    tracing::info!("Created habit '{}' ({}) with target {}", habit.name, habit.id, target);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: Some(habit.id.to_string()),
        message: format!("Created habit '{}' with a target of {}. Ready to start your streak!", habit.name, target),
        target,
    })
}
