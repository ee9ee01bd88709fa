//! Typed view of a generated workout plan.
//!
//! The generator hands back raw JSON and never corrects it. This module is
//! the lenient reading used for display and export: missing fields fall
//! back to empty values, and the profile echo accepts a string or number
//! age.

use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::profile::{Level, Position, string_or_number};
use crate::prompt::{capitalize, format_hours};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutPlan {
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    pub position: String,
    pub level: String,
    pub focus_areas: String,
    pub workout_schedule: Vec<DaySchedule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DaySchedule {
    pub day: String,
    /// Display text: `2`, `1.5`, or whatever string the model sent.
    #[serde(deserialize_with = "hours_text")]
    pub hours: String,
    #[serde(deserialize_with = "one_or_many")]
    pub time_of_day: Vec<String>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exercise {
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
    pub description: String,
}

impl WorkoutPlan {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Position name for display, falling back to the raw value.
    pub fn position_name(&self) -> String {
        Position::from_str(&self.position)
            .map(|p| p.name().to_owned())
            .unwrap_or_else(|_| self.position.clone())
    }

    /// Level label for display, falling back to the raw value.
    pub fn level_label(&self) -> String {
        Level::from_str(&self.level)
            .map(|l| l.label().to_owned())
            .unwrap_or_else(|_| self.level.clone())
    }

    /// "Your plan includes workouts on N days per week, ..."
    pub fn summary(&self) -> String {
        format!(
            "Your plan includes workouts on {} days per week, focusing on improving your skills as a {}.",
            self.workout_schedule.len(),
            self.position_name()
        )
    }
}

impl DaySchedule {
    pub fn day_label(&self) -> String {
        capitalize(&self.day)
    }
}

fn hours_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => match n.as_f64() {
            Some(hours) => Ok(format_hours(hours)),
            None => Ok(n.to_string()),
        },
        other => string_or_number(other).map_err(de::Error::custom),
    }
}

/// Accept `["Morning"]`, a bare `"Morning"`, or `null`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::String(s) if s.trim().is_empty() => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s]),
        Value::Array(items) => items
            .into_iter()
            .map(string_or_number)
            .collect::<Result<_, _>>()
            .map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a string or list of strings, got {other}"
        ))),
    }
}
