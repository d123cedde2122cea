/// MCP tools for habit analytics
///
/// This module contains all the MCP tools that external clients can call.
/// Each tool fetches raw records from storage, validates its input, runs the
/// analytics engine and formats a response.

pub mod calendar;
pub mod create;
pub mod delete;
pub mod list;
pub mod log;
pub mod metrics;
pub mod update;

// Re-export tool functions for easy access
pub use calendar::*;
pub use create::*;
pub use delete::*;
pub use list::*;
pub use log::*;
pub use metrics::*;
pub use update::*;

use serde_json::Value;

use crate::domain::{DomainError, FrequencyConfig, HabitId};
use crate::storage::StorageError;

/// Parse a habit ID argument; anything that is not a UUID cannot name a habit
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, StorageError> {
    if raw.trim().is_empty() {
        return Err(DomainError::Validation {
            message: "Habit ID cannot be empty".to_string(),
        }
        .into());
    }

    HabitId::from_string(raw).map_err(|_| StorageError::HabitNotFound {
        habit_id: raw.to_string(),
    })
}

/// Read a user-supplied frequency argument
///
/// Unlike stored records, input whose shape is not a known frequency form
/// is rejected instead of falling back to the default.
pub(crate) fn parse_frequency_arg(value: &Value) -> Result<FrequencyConfig, StorageError> {
    let frequency = FrequencyConfig::from_value(value);

    let recognized = match value {
        // Blank text means no target, same as null
        Value::Null | Value::String(_) => true,
        Value::Number(_) | Value::Object(_) => frequency != FrequencyConfig::Absent,
        _ => false,
    };

    if !recognized {
        return Err(DomainError::InvalidFrequency(format!(
            "Unrecognized frequency {}. Use {{\"count\": N, \"period\": \"day|week|month|year\"}}, a number of times per week, or text like \"3 times/week\"",
            value
        ))
        .into());
    }

    frequency.validate()?;
    Ok(frequency)
}
