/// Habit record and related functionality
///
/// This module defines the raw habit record the data layer hands out:
/// id, name, completion timestamps, expected frequency, tags and notes.
/// Validation lives here so every store applies the same rules.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{parse_completion, parse_completions, DomainError, FrequencyConfig, HabitId};

const MAX_NAME_LEN: usize = 100;
const MAX_NOTES_LEN: usize = 500;
const MAX_TAGS: usize = 20;
const MAX_TAG_LEN: usize = 30;

/// A habit and its full completion history
///
/// `completed_dates` keeps every completion exactly as it was logged;
/// several completions on one day are allowed and all of them count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// ISO-8601 completion timestamps in logging order
    #[serde(default)]
    pub completed_dates: Vec<String>,
    /// How often this habit should be performed
    #[serde(default)]
    pub expected_frequency: FrequencyConfig,
    /// Free-form labels used for filtering
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional notes about the habit
    #[serde(default)]
    pub notes: Option<String>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl HabitRecord {
    /// Create a new habit with validation
    pub fn new(
        name: String,
        expected_frequency: FrequencyConfig,
        tags: Vec<String>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        expected_frequency.validate()?;
        let tags = Self::clean_tags(tags)?;
        Self::validate_notes(&notes)?;

        Ok(Self {
            id: HabitId::new(),
            name: name.trim().to_string(),
            completed_dates: Vec::new(),
            expected_frequency,
            tags,
            notes,
            created_at: Utc::now(),
        })
    }

    /// Create a habit from existing data (used when loading from a store)
    ///
    /// Stored data is trusted; malformed completions are skipped later by
    /// the analytics engine instead of being rejected here.
    pub fn from_existing(
        id: HabitId,
        name: String,
        completed_dates: Vec<String>,
        expected_frequency: FrequencyConfig,
        tags: Vec<String>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            completed_dates,
            expected_frequency,
            tags,
            notes,
            created_at,
        }
    }

    /// Update the habit's properties with validation
    ///
    /// Nothing is applied unless every supplied value is valid.
    /// `notes: Some(None)` clears the notes.
    pub fn update(
        &mut self,
        name: Option<String>,
        expected_frequency: Option<FrequencyConfig>,
        tags: Option<Vec<String>>,
        notes: Option<Option<String>>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_frequency) = expected_frequency {
            new_frequency.validate()?;
        }
        let tags = tags.map(Self::clean_tags).transpose()?;
        if let Some(ref new_notes) = notes {
            Self::validate_notes(new_notes)?;
        }

        if let Some(new_name) = name {
            self.name = new_name.trim().to_string();
        }
        if let Some(new_frequency) = expected_frequency {
            self.expected_frequency = new_frequency;
        }
        if let Some(new_tags) = tags {
            self.tags = new_tags;
        }
        if let Some(new_notes) = notes {
            self.notes = new_notes;
        }

        Ok(())
    }

    /// Validate a completion timestamp before it is logged
    ///
    /// The timestamp must parse and must not lie after `now`.
    pub fn validate_completion(timestamp: &str, now: NaiveDateTime) -> Result<(), DomainError> {
        let completion = parse_completion(timestamp).ok_or_else(|| {
            DomainError::InvalidDate(format!(
                "'{}' is not an ISO-8601 date (YYYY-MM-DD) or date-time",
                timestamp
            ))
        })?;

        if completion.at > now || completion.day > now.date() {
            return Err(DomainError::InvalidDate(
                "Cannot log completions in the future".to_string(),
            ));
        }

        Ok(())
    }

    /// Append a validated completion
    pub fn add_completion(&mut self, timestamp: &str, now: NaiveDateTime) -> Result<(), DomainError> {
        Self::validate_completion(timestamp, now)?;
        self.completed_dates.push(timestamp.trim().to_string());
        Ok(())
    }

    /// Remove one occurrence of an exact completion timestamp
    ///
    /// Returns `false` when no such completion was logged.
    pub fn remove_completion(&mut self, timestamp: &str) -> bool {
        let timestamp = timestamp.trim();
        match self.completed_dates.iter().position(|d| d == timestamp) {
            Some(index) => {
                self.completed_dates.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of logged completions that parse as timestamps
    pub fn total_completions(&self) -> usize {
        parse_completions(&self.completed_dates).len()
    }

    /// Case-insensitive tag check
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidHabitName(format!(
                "Habit name cannot be longer than {} characters",
                MAX_NAME_LEN
            )));
        }

        Ok(())
    }

    fn validate_notes(notes: &Option<String>) -> Result<(), DomainError> {
        if let Some(text) = notes {
            if text.chars().count() > MAX_NOTES_LEN {
                return Err(DomainError::Validation {
                    message: format!("Notes cannot be longer than {} characters", MAX_NOTES_LEN),
                });
            }
        }
        Ok(())
    }

    /// Trim tags and drop duplicates, rejecting empty or oversized ones
    fn clean_tags(tags: Vec<String>) -> Result<Vec<String>, DomainError> {
        if tags.len() > MAX_TAGS {
            return Err(DomainError::InvalidValue {
                message: format!("A habit can have at most {} tags", MAX_TAGS),
            });
        }

        let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                return Err(DomainError::InvalidValue {
                    message: "Tags cannot be empty".to_string(),
                });
            }
            if trimmed.chars().count() > MAX_TAG_LEN {
                return Err(DomainError::InvalidValue {
                    message: format!("Tags cannot be longer than {} characters", MAX_TAG_LEN),
                });
            }
            if !cleaned.iter().any(|t| t.eq_ignore_ascii_case(trimmed)) {
                cleaned.push(trimmed.to_string());
            }
        }

        Ok(cleaned)
    }
}
