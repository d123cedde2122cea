/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool to modify a habit's
/// name, expected frequency, tags or notes. The completion log is left alone.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analytics::normalize;
use crate::storage::{HabitStorage, StorageError};
use crate::tools::{parse_frequency_arg, parse_habit_id};

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    pub name: Option<String>,
    pub frequency: Option<Value>,
    pub tags: Option<Vec<String>>,
    /// An empty string clears the notes
    pub notes: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub target: String,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let frequency = params.frequency.as_ref().map(parse_frequency_arg).transpose()?;
    let notes = params
        .notes
        .map(|n| if n.trim().is_empty() { None } else { Some(n) });

    habit.update(params.name, frequency, params.tags, notes)?;
    storage.update_habit(&habit)?;

    let target = normalize(&habit.expected_frequency).describe();
    tracing::info!("Updated habit '{}' ({})", habit.name, habit.id);

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("Updated habit '{}' (target: {})", habit.name, target),
        target,
    })
}
