/// Core types used throughout the domain layer
///
/// This module defines the habit identifier, the period units a frequency is
/// measured against, and the loosely-typed expected-frequency value that
/// arrives from the record store.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety when passing ids
/// between the tools, the storage layer and the analytics output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The cadence unit an expected frequency is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// Parse a period name, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Some(Period::Day),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            "year" => Some(Period::Year),
            _ => None,
        }
    }

    /// Lowercase wire name ("day", "week", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a habit is expected to be completed
///
/// Records written by different versions of the app carry this field in
/// four shapes, so it is modeled explicitly instead of being re-inspected by
/// every calculation. `analytics::frequency::normalize` turns any of them
/// into one canonical target.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FrequencyConfig {
    /// Complete `count` times per `period`
    Structured { count: u32, period: Period },
    /// Legacy bare number meaning "times per week"
    TimesPerWeek(f64),
    /// Legacy free text such as "daily", "3 times/week", "every 2 days"
    Text(String),
    /// Missing or null
    #[default]
    Absent,
}

impl FrequencyConfig {
    /// Shorthand for the structured form
    pub fn structured(count: u32, period: Period) -> Self {
        FrequencyConfig::Structured { count, period }
    }

    /// Interpret an arbitrary JSON value as a frequency
    ///
    /// Shapes that match none of the known forms become `Absent` so that a
    /// malformed record still produces metrics.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => FrequencyConfig::Absent,
            Value::Number(n) => n
                .as_f64()
                .map(FrequencyConfig::TimesPerWeek)
                .unwrap_or(FrequencyConfig::Absent),
            Value::String(s) if s.trim().is_empty() => FrequencyConfig::Absent,
            Value::String(s) => FrequencyConfig::Text(s.clone()),
            Value::Object(map) => {
                let count = map.get("count").and_then(count_from_value);
                let period = map
                    .get("period")
                    .and_then(|p| p.as_str())
                    .and_then(Period::parse);

                match (count, period) {
                    (Some(count), Some(period)) => FrequencyConfig::Structured { count, period },
                    _ => FrequencyConfig::Absent,
                }
            }
            _ => FrequencyConfig::Absent,
        }
    }

    /// Convert back to the JSON shape it was read from
    pub fn to_value(&self) -> Value {
        match self {
            FrequencyConfig::Structured { count, period } => {
                json!({ "count": count, "period": period.as_str() })
            }
            FrequencyConfig::TimesPerWeek(times) => json!(times),
            FrequencyConfig::Text(text) => json!(text),
            FrequencyConfig::Absent => Value::Null,
        }
    }

    /// Validate a frequency supplied by a user
    ///
    /// Only shapes we can reject with certainty are checked. Free text is
    /// always accepted; unknown text resolves to the daily default later.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            FrequencyConfig::Structured { count, .. } => {
                if *count == 0 {
                    return Err(DomainError::InvalidFrequency(
                        "Frequency count must be at least 1".to_string(),
                    ));
                }
                if *count > 1000 {
                    return Err(DomainError::InvalidFrequency(format!(
                        "Frequency count cannot exceed 1000, got {}",
                        count
                    )));
                }
            }
            FrequencyConfig::TimesPerWeek(times) => {
                if !times.is_finite() || *times < 0.0 {
                    return Err(DomainError::InvalidFrequency(format!(
                        "Times per week must be a non-negative number, got {}",
                        times
                    )));
                }
            }
            FrequencyConfig::Text(_) | FrequencyConfig::Absent => {}
        }
        Ok(())
    }
}

fn count_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|c| u32::try_from(c).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

impl Serialize for FrequencyConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FrequencyConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(FrequencyConfig::from_value(&value))
    }
}
