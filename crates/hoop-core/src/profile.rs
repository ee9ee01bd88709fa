//! Player profile, weekly availability, and the plan request wire type.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::GenerateError;

/// Error returned when a string does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Primary position on the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Self::PointGuard,
        Self::ShootingGuard,
        Self::SmallForward,
        Self::PowerForward,
        Self::Center,
    ];

    /// Wire value, as sent in `PlanRequest::position`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PointGuard => "pointGuard",
            Self::ShootingGuard => "shootingGuard",
            Self::SmallForward => "smallForward",
            Self::PowerForward => "powerForward",
            Self::Center => "center",
        }
    }

    /// Plain name, e.g. "Point Guard".
    pub fn name(self) -> &'static str {
        match self {
            Self::PointGuard => "Point Guard",
            Self::ShootingGuard => "Shooting Guard",
            Self::SmallForward => "Small Forward",
            Self::PowerForward => "Power Forward",
            Self::Center => "Center",
        }
    }

    /// Name with the usual abbreviation, e.g. "Point Guard (PG)".
    pub fn label(self) -> &'static str {
        match self {
            Self::PointGuard => "Point Guard (PG)",
            Self::ShootingGuard => "Shooting Guard (SG)",
            Self::SmallForward => "Small Forward (SF)",
            Self::PowerForward => "Power Forward (PF)",
            Self::Center => "Center (C)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::PointGuard => "Floor general, playmaker, ball handler",
            Self::ShootingGuard => "Scorer, perimeter shooter, defender",
            Self::SmallForward => "All-around player, versatile scorer",
            Self::PowerForward => "Inside scorer, rebounder, defender",
            Self::Center => "Rim protector, rebounder, inside presence",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "position",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Level of competition the player plays at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    Recreational,
    School,
    HighSchool,
    College,
    SemiPro,
    Professional,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Self::Recreational,
        Self::School,
        Self::HighSchool,
        Self::College,
        Self::SemiPro,
        Self::Professional,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recreational => "recreational",
            Self::School => "school",
            Self::HighSchool => "highSchool",
            Self::College => "college",
            Self::SemiPro => "semiPro",
            Self::Professional => "professional",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Recreational => "Recreational",
            Self::School => "School",
            Self::HighSchool => "High School",
            Self::College => "College",
            Self::SemiPro => "Semi-Pro",
            Self::Professional => "Professional",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "level",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Day / TimeOfDay
// ---------------------------------------------------------------------------

/// Day of the week. Ordering follows the training week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "day",
                value: s.to_owned(),
            })
    }
}

/// Preferred training window within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 3] = [Self::Morning, Self::Afternoon, Self::Evening];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "time of day",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

pub const MIN_HOURS: f64 = 1.0;
pub const MAX_HOURS: f64 = 4.0;
pub const HOURS_STEP: f64 = 0.5;

/// Snap `hours` to the nearest half hour within `[MIN_HOURS, MAX_HOURS]`.
pub fn clamp_hours(hours: f64) -> f64 {
    if !hours.is_finite() {
        return MIN_HOURS;
    }
    ((hours / HOURS_STEP).round() * HOURS_STEP).clamp(MIN_HOURS, MAX_HOURS)
}

/// Availability for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub selected: bool,
    pub hours: f64,
    pub time_of_day: Vec<TimeOfDay>,
}

impl Default for DayAvailability {
    fn default() -> Self {
        Self {
            selected: false,
            hours: MIN_HOURS,
            time_of_day: Vec::new(),
        }
    }
}

/// Weekly availability: one entry per day, always all seven days.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    days: BTreeMap<Day, DayAvailability>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            days: Day::ALL
                .into_iter()
                .map(|d| (d, DayAvailability::default()))
                .collect(),
        }
    }
}

impl Schedule {
    pub fn get(&self, day: Day) -> &DayAvailability {
        // Every day is inserted by `Default` and never removed.
        &self.days[&day]
    }

    fn entry(&mut self, day: Day) -> &mut DayAvailability {
        self.days.entry(day).or_default()
    }

    /// Flip the selected flag for `day`.
    pub fn toggle_day(&mut self, day: Day) {
        let entry = self.entry(day);
        entry.selected = !entry.selected;
    }

    pub fn set_selected(&mut self, day: Day, selected: bool) {
        self.entry(day).selected = selected;
    }

    /// Set the hours for `day`, clamped to the allowed range.
    pub fn set_hours(&mut self, day: Day, hours: f64) {
        self.entry(day).hours = clamp_hours(hours);
    }

    /// Add `time` to the day's windows if absent, remove it if present.
    pub fn toggle_time_of_day(&mut self, day: Day, time: TimeOfDay) {
        let windows = &mut self.entry(day).time_of_day;
        if let Some(pos) = windows.iter().position(|t| *t == time) {
            windows.remove(pos);
        } else {
            windows.push(time);
        }
    }

    /// Iterate over all seven days in week order.
    pub fn iter(&self) -> impl Iterator<Item = (Day, &DayAvailability)> {
        self.days.iter().map(|(d, a)| (*d, a))
    }

    /// The selected days in week order, in request form.
    pub fn selected_days(&self) -> Vec<AvailableDay> {
        self.iter()
            .filter(|(_, a)| a.selected)
            .map(|(day, a)| AvailableDay {
                day: day.as_str().to_owned(),
                hours: a.hours,
                time_of_day: a.time_of_day.iter().map(|t| t.as_str().to_owned()).collect(),
            })
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.days.values().filter(|a| a.selected).count()
    }
}

// ---------------------------------------------------------------------------
// Plan request
// ---------------------------------------------------------------------------

/// Body of `POST /api/generate-workout` and input to the generator.
///
/// Every field defaults to empty so that an incomplete body still
/// deserializes and is rejected by [`PlanRequest::validate`] instead of by
/// the JSON extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanRequest {
    pub name: String,
    #[serde(deserialize_with = "request_age")]
    pub age: String,
    pub position: String,
    pub level: String,
    pub improvement: String,
    pub available_days: Vec<AvailableDay>,
}

/// One selected training day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDay {
    pub day: String,
    #[serde(default = "default_hours")]
    pub hours: f64,
    #[serde(default)]
    pub time_of_day: Vec<String>,
}

fn default_hours() -> f64 {
    MIN_HOURS
}

impl PlanRequest {
    /// Names of the required fields that are empty, in wire order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let text_fields = [
            ("name", &self.name),
            ("age", &self.age),
            ("position", &self.position),
            ("level", &self.level),
            ("improvement", &self.improvement),
        ];
        for (field, value) in text_fields {
            if value.trim().is_empty() {
                missing.push(field);
            }
        }
        if self.available_days.is_empty() {
            missing.push("availableDays");
        }
        missing
    }

    /// Presence check run before any model call.
    pub fn validate(&self) -> Result<(), GenerateError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GenerateError::MissingFields(missing))
        }
    }
}

/// Accept `"17"`, `17`, or `null` where a display string is expected.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// Like [`string_or_number`], but a numeric zero reads as empty so the
/// presence check treats it as missing. The string `"0"` is kept.
fn request_age<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(String::new()),
        other => string_or_number(other).map_err(de::Error::custom),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_wire_values_roundtrip() {
        for p in Position::ALL {
            assert_eq!(p.as_str().parse::<Position>().unwrap(), p);
        }
        for l in Level::ALL {
            assert_eq!(l.as_str().parse::<Level>().unwrap(), l);
        }
        assert_eq!(
            serde_json::to_string(&Position::PointGuard).unwrap(),
            "\"pointGuard\""
        );
        assert_eq!(serde_json::to_string(&Level::SemiPro).unwrap(), "\"semiPro\"");
    }

    #[test]
    fn unknown_position_is_rejected() {
        let err = "goalkeeper".parse::<Position>().unwrap_err();
        assert_eq!(err.to_string(), "invalid position: \"goalkeeper\"");
    }

    #[test]
    fn clamp_hours_snaps_and_bounds() {
        assert_eq!(clamp_hours(0.2), 1.0);
        assert_eq!(clamp_hours(2.3), 2.5);
        assert_eq!(clamp_hours(2.2), 2.0);
        assert_eq!(clamp_hours(9.0), 4.0);
        assert_eq!(clamp_hours(f64::NAN), 1.0);
    }

    #[test]
    fn schedule_starts_with_seven_unselected_days() {
        let schedule = Schedule::default();
        assert_eq!(schedule.iter().count(), 7);
        assert_eq!(schedule.selected_count(), 0);
        let monday = schedule.get(Day::Monday);
        assert!(!monday.selected);
        assert_eq!(monday.hours, 1.0);
        assert!(monday.time_of_day.is_empty());
    }

    #[test]
    fn toggle_time_of_day_adds_then_removes() {
        let mut schedule = Schedule::default();
        schedule.toggle_time_of_day(Day::Friday, TimeOfDay::Evening);
        schedule.toggle_time_of_day(Day::Friday, TimeOfDay::Morning);
        assert_eq!(
            schedule.get(Day::Friday).time_of_day,
            vec![TimeOfDay::Evening, TimeOfDay::Morning]
        );
        schedule.toggle_time_of_day(Day::Friday, TimeOfDay::Evening);
        assert_eq!(schedule.get(Day::Friday).time_of_day, vec![TimeOfDay::Morning]);
    }

    #[test]
    fn selected_days_are_in_week_order() {
        let mut schedule = Schedule::default();
        schedule.toggle_day(Day::Sunday);
        schedule.toggle_day(Day::Tuesday);
        schedule.set_hours(Day::Tuesday, 2.5);
        schedule.toggle_time_of_day(Day::Tuesday, TimeOfDay::Afternoon);

        let days = schedule.selected_days();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, "tuesday");
        assert_eq!(days[0].hours, 2.5);
        assert_eq!(days[0].time_of_day, vec!["Afternoon".to_string()]);
        assert_eq!(days[1].day, "sunday");
    }

    #[test]
    fn request_accepts_numeric_age_and_camel_case_days() {
        let body = r#"{
            "name": "Jordan",
            "age": 17,
            "position": "shootingGuard",
            "level": "highSchool",
            "improvement": "free throws",
            "availableDays": [{"day": "monday", "hours": 2, "timeOfDay": ["Morning"]}]
        }"#;
        let req: PlanRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.age, "17");
        assert_eq!(req.available_days[0].hours, 2.0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn missing_fields_lists_every_empty_field() {
        let req: PlanRequest = serde_json::from_str(r#"{"name": "  ", "age": "20"}"#).unwrap();
        assert_eq!(
            req.missing_fields(),
            vec!["name", "position", "level", "improvement", "availableDays"]
        );
        assert!(matches!(
            req.validate(),
            Err(GenerateError::MissingFields(_))
        ));
    }

    #[test]
    fn numeric_zero_age_counts_as_missing() {
        let req: PlanRequest = serde_json::from_value(serde_json::json!({
            "name": "Jordan",
            "age": 0,
            "position": "center",
            "level": "beginner",
            "improvement": "Rebounding",
            "availableDays": [{"day": "monday", "hours": 1, "timeOfDay": []}]
        }))
        .unwrap();
        assert_eq!(req.missing_fields(), vec!["age"]);

        let req: PlanRequest = serde_json::from_str(r#"{"age": "0"}"#).unwrap();
        assert_eq!(req.age, "0");
        assert!(!req.missing_fields().contains(&"age"));
    }

    #[test]
    fn request_serializes_with_wire_names() {
        let req = PlanRequest {
            name: "Ana".into(),
            age: "22".into(),
            position: "center".into(),
            level: "college".into(),
            improvement: "post moves".into(),
            available_days: vec![AvailableDay {
                day: "saturday".into(),
                hours: 1.5,
                time_of_day: vec![],
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["availableDays"][0]["timeOfDay"], serde_json::json!([]));
        assert_eq!(json["age"], "22");
    }
}
