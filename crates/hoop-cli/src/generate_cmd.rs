//! One-shot plan generation from a request file.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use hoop_core::PlanRequest;
use hoop_core::export::{ExportFormat, render, write_export};
use hoop_core::loading::{LoadingTicker, MESSAGE_INTERVAL};

use crate::config::HoopConfig;

/// Read a request JSON file, generate a plan, and print or save it.
///
/// The request is checked for missing fields before a planner is built, so
/// an incomplete file fails without needing an API key or a server.
pub async fn run_generate(
    config: &HoopConfig,
    profile: &Path,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let request = read_request(profile)?;
    request.validate()?;

    let planner = config.planner()?;

    let (tx, mut rx) = watch::channel("");
    let ticker = LoadingTicker::spawn(MESSAGE_INTERVAL, tx);
    let show_progress = std::io::stderr().is_terminal();
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let message = *rx.borrow_and_update();
            if show_progress {
                eprintln!("{message}");
            }
        }
    });

    let result = planner.plan(&request).await;
    ticker.stop().await;
    join_printer(printer).await;

    let plan = result.context("failed to generate workout plan")?;

    match output {
        Some(path) => {
            write_export(path, &plan, format)?;
            eprintln!("Plan written to {}", path.display());
        }
        None => {
            let rendered = render(&plan, format, Utc::now())
                .with_context(|| format!("failed to render plan as {format}"))?;
            println!("{rendered}");
        }
    }

    Ok(())
}

async fn join_printer(printer: JoinHandle<()>) {
    if let Err(err) = printer.await {
        debug!(error = %err, "loading message printer did not finish cleanly");
    }
}

fn read_request(path: &Path) -> Result<PlanRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse profile file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_request_with_numeric_age() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{"name":"Sam","age":15,"position":"center","level":"school",
                "improvement":"Rebounding","availableDays":[{"day":"tuesday","hours":1}]}"#,
        )
        .unwrap();

        let request = read_request(&path).unwrap();
        assert_eq!(request.age, "15");
        assert_eq!(request.available_days[0].time_of_day, Vec::<String>::new());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_request(Path::new("/nonexistent/profile.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/profile.json"));
    }

    #[tokio::test]
    async fn join_printer_tolerates_cancelled_task() {
        let printer = tokio::spawn(std::future::pending::<()>());
        printer.abort();
        join_printer(printer).await;
    }
}
