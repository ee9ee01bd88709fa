//! Prompt construction for workout plan generation.
//!
//! Pure string assembly; no I/O.

use crate::profile::{AvailableDay, PlanRequest};

/// System instruction sent alongside every prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are a professional basketball trainer specializing in \
creating personalized workout plans. Create a detailed basketball workout plan based on the \
user's profile information.";

/// Exercise-detail guidance included in every prompt.
const EXERCISE_GUIDELINES: &str = "For each day, create specific exercises with durations and \
descriptions. Describe the exercises in detail, including the equipment needed, the specific \
movements, and the target muscle groups.
Specify each workout separately with the number of repetitions and sets.
";

/// Closing instructions on output format.
const OUTPUT_RULES: &str = "IMPORTANT: Ensure the response is a valid JSON object. Use standard \
JSON format without any markdown or code blocks.
Make the exercises specific to basketball skills and appropriate for their position, level, \
and improvement areas.
";

/// Build the user prompt for `request`.
///
/// Embeds the profile, one line per available day, and the JSON shape the
/// model must answer with (profile values echoed back).
pub fn build_prompt(request: &PlanRequest) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(
        "Create a detailed basketball workout plan for a player with the following profile:\n\n",
    );
    prompt.push_str(&format!("Name: {}\n", request.name));
    prompt.push_str(&format!("Age: {}\n", request.age));
    prompt.push_str(&format!("Position: {}\n", request.position));
    prompt.push_str(&format!("Level: {}\n", request.level));
    prompt.push_str(&format!("Areas for improvement: {}\n\n", request.improvement));

    prompt.push_str("Available days for training:\n");
    for day in &request.available_days {
        prompt.push_str(&day_line(day));
        prompt.push('\n');
    }
    prompt.push('\n');

    prompt.push_str(EXERCISE_GUIDELINES);
    prompt.push_str(
        "Return your response as a properly formatted JSON object with the following structure:\n",
    );
    prompt.push_str(&response_shape(request));
    prompt.push('\n');
    prompt.push_str(OUTPUT_RULES);

    prompt
}

/// `- Monday: 2 hours, Time: Morning, Evening`
fn day_line(day: &AvailableDay) -> String {
    format!(
        "- {}: {} hours, Time: {}",
        capitalize(&day.day),
        format_hours(day.hours),
        day.time_of_day.join(", ")
    )
}

/// Render hours without a trailing `.0` (`2`, `1.5`).
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0}")
    } else {
        hours.to_string()
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn response_shape(request: &PlanRequest) -> String {
    // serde_json escapes quotes and newlines in user-provided values.
    let quoted = |s: &str| serde_json::Value::from(s).to_string();
    format!(
        r#"{{
  "name": {name},
  "age": {age},
  "position": {position},
  "level": {level},
  "focusAreas": "Brief summary of focus areas based on their improvement needs",
  "workoutSchedule": [
    {{
      "day": "day name",
      "hours": number of hours,
      "timeOfDay": ["Morning", "Afternoon", "Evening"],
      "exercises": [
        {{
          "name": "Exercise Name",
          "duration": "Duration in minutes",
          "description": "Detailed description of the exercise"
        }}
      ]
    }}
  ]
}}"#,
        name = quoted(&request.name),
        age = quoted(&request.age),
        position = quoted(&request.position),
        level = quoted(&request.level),
    )
}
