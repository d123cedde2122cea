/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. The habit's
/// completion log is removed with it.

use serde::{Deserialize, Serialize};

use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_habit_id;

/// Parameters for deleting a habit
#[derive(Debug, Deserialize)]
pub struct DeleteHabitParams {
    pub habit_id: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Delete a habit using the provided storage
pub fn delete_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;

    storage.delete_habit(&habit_id)?;
    tracing::info!("Deleted habit '{}' ({})", habit.name, habit.id);

    Ok(DeleteHabitResponse {
        success: true,
        message: format!(
            "Deleted habit '{}' and its {} logged completion{}",
            habit.name,
            habit.completed_dates.len(),
            if habit.completed_dates.len() == 1 { "" } else { "s" }
        ),
    })
}
