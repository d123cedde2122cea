/// Domain module containing the habit record and its value types
///
/// This module defines the raw habit record handed to the analytics engine
/// (id, name, completion timestamps, expected frequency, tags, notes) and the
/// validation rules applied when records are created or changed.

pub mod completion;
pub mod habit;
pub mod types;

// Re-export public types for easy access
pub use completion::*;
pub use habit::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
