//! Plan export to Markdown or JSON files.

use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::plan::WorkoutPlan;
use crate::profile::ParseEnumError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Markdown => f.write_str("markdown"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(ParseEnumError {
                kind: "export format",
                value: s.to_owned(),
            }),
        }
    }
}

/// Render a plan as a Markdown document.
pub fn render_markdown(plan: &WorkoutPlan, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    let title = if plan.name.trim().is_empty() {
        "# HoopBuddy Workout Plan".to_owned()
    } else {
        format!("# HoopBuddy Workout Plan for {}", plan.name)
    };
    out.push_str(&title);
    out.push_str("\n\n");
    let _ = writeln!(out, "_Generated {}_\n", generated_at.format("%Y-%m-%d %H:%M UTC"));

    out.push_str("## Profile\n\n");
    let _ = writeln!(out, "- **Age:** {}", plan.age);
    let _ = writeln!(out, "- **Position:** {}", plan.position_name());
    let _ = writeln!(out, "- **Level:** {}\n", plan.level_label());

    out.push_str("## Focus Areas\n\n");
    let _ = writeln!(out, "{}\n", plan.focus_areas.trim());

    out.push_str("## Weekly Schedule\n");
    for day in &plan.workout_schedule {
        let _ = write!(out, "\n### {} ({} hours", day.day_label(), day.hours);
        if !day.time_of_day.is_empty() {
            let _ = write!(out, ", {}", day.time_of_day.join(", "));
        }
        out.push_str(")\n\n");

        for (i, exercise) in day.exercises.iter().enumerate() {
            let _ = write!(out, "{}. **{}**", i + 1, exercise.name);
            if !exercise.duration.is_empty() {
                let _ = write!(out, " ({})", exercise.duration);
            }
            if !exercise.description.is_empty() {
                let _ = write!(out, ": {}", exercise.description);
            }
            out.push('\n');
        }
    }

    out.push_str("\n## Summary\n\n");
    out.push_str(&plan.summary());
    out.push('\n');
    out
}

/// Render raw plan JSON in the requested format.
///
/// JSON output is the value exactly as generated. Markdown needs an object
/// shaped like a plan and fails otherwise.
pub fn render(
    plan: &Value,
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(plan),
        ExportFormat::Markdown => {
            let typed = WorkoutPlan::from_value(plan)?;
            Ok(render_markdown(&typed, generated_at))
        }
    }
}

/// Render `plan` and write it to `path`.
pub fn write_export(path: &Path, plan: &Value, format: ExportFormat) -> anyhow::Result<()> {
    let rendered = render(plan, format, Utc::now())
        .with_context(|| format!("failed to render plan as {format}"))?;
    std::fs::write(path, rendered)
        .with_context(|| format!("failed to write plan to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "name": "Jordan",
            "age": "17",
            "position": "shootingGuard",
            "level": "college",
            "focusAreas": "Catch-and-shoot footwork",
            "workoutSchedule": [
                {
                    "day": "monday",
                    "hours": 1.5,
                    "timeOfDay": ["Morning"],
                    "exercises": [
                        {"name": "Form shooting", "duration": "15 minutes", "description": "One hand, close range"},
                        {"name": "Pin-downs", "duration": "20 minutes", "description": ""}
                    ]
                },
                {"day": "thursday", "hours": 2, "timeOfDay": [], "exercises": []}
            ]
        })
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap()
    }

    #[test]
    fn parses_formats() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("Markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn markdown_has_sections_per_day() {
        let md = render(&sample(), ExportFormat::Markdown, at()).unwrap();
        assert!(md.starts_with("# HoopBuddy Workout Plan for Jordan\n"));
        assert!(md.contains("_Generated 2024-03-01 18:30 UTC_"));
        assert!(md.contains("- **Position:** Shooting Guard"));
        assert!(md.contains("- **Level:** College"));
        assert!(md.contains("### Monday (1.5 hours, Morning)"));
        assert!(md.contains("1. **Form shooting** (15 minutes): One hand, close range"));
        assert!(md.contains("2. **Pin-downs** (20 minutes)\n"));
        assert!(md.contains("### Thursday (2 hours)"));
        assert!(md.contains("workouts on 2 days per week"));
    }

    #[test]
    fn markdown_accepts_string_hours() {
        let value = json!({
            "name": "Sam",
            "position": "center",
            "workoutSchedule": [{
                "day": "tuesday",
                "hours": "2",
                "timeOfDay": "Evening",
                "exercises": [{"name": "Drop steps", "duration": "10 minutes"}]
            }]
        });
        let md = render(&value, ExportFormat::Markdown, at()).unwrap();
        assert!(md.contains("### Tuesday (2 hours, Evening)"));
        assert!(md.contains("1. **Drop steps** (10 minutes)\n"));
    }

    #[test]
    fn json_is_passed_through() {
        let value = json!({"anything": [1, 2, 3]});
        let out = render(&value, ExportFormat::Json, at()).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), value);
    }

    #[test]
    fn markdown_rejects_non_object_plans() {
        assert!(render(&json!("text"), ExportFormat::Markdown, at()).is_err());
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.md");
        write_export(&path, &sample(), ExportFormat::Markdown).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("## Weekly Schedule"));
    }
}
