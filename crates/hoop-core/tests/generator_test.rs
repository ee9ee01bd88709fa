//! Tests for the in-process plan generator.

use std::sync::Arc;

use serde_json::json;

use hoop_core::model::ModelError;
use hoop_core::profile::AvailableDay;
use hoop_core::{GenerateError, PlanGenerator, Planner};
use hoop_test_utils::{StubModel, fenced, sample_plan_json, sample_request};

fn generator(model: &Arc<StubModel>) -> PlanGenerator {
    PlanGenerator::new(model.clone())
}

#[tokio::test]
async fn empty_schedule_is_rejected_without_calling_the_model() {
    let model = Arc::new(StubModel::replying("{}"));
    let mut request = sample_request();
    request.available_days.clear();

    let err = generator(&model).generate(&request).await.unwrap_err();

    assert!(matches!(err, GenerateError::MissingFields(ref f) if f == &["availableDays"]));
    assert!(err.is_validation());
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn blank_fields_are_listed_in_order() {
    let model = Arc::new(StubModel::replying("{}"));
    let mut request = sample_request();
    request.name = "   ".into();
    request.level.clear();

    let err = generator(&model).generate(&request).await.unwrap_err();

    assert_eq!(err.to_string(), "Missing required fields: name, level");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn fenced_reply_is_parsed() {
    let plan = sample_plan_json("monday");
    let model = Arc::new(StubModel::replying(fenced(&plan)));

    let result = generator(&model).generate(&sample_request()).await.unwrap();

    assert_eq!(result, plan);
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn bare_json_reply_is_parsed() {
    let plan = sample_plan_json("monday");
    let model = Arc::new(StubModel::replying(plan.to_string()));

    let result = generator(&model).generate(&sample_request()).await.unwrap();

    assert_eq!(result, plan);
}

#[tokio::test]
async fn any_json_value_passes_through_unchecked() {
    let model = Arc::new(StubModel::replying(r#"{"unexpected": true}"#));

    let result = generator(&model).generate(&sample_request()).await.unwrap();

    assert_eq!(result, json!({"unexpected": true}));
}

#[tokio::test]
async fn prose_reply_is_an_invalid_format() {
    let model = Arc::new(StubModel::replying("Sorry, I can't help with that."));

    let err = generator(&model).generate(&sample_request()).await.unwrap_err();

    assert!(matches!(err, GenerateError::InvalidFormat));
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn provider_error_is_surfaced_verbatim() {
    let model = Arc::new(StubModel::failing(ModelError::QuotaExceeded {
        provider: "gemini".into(),
        message: "Resource has been exhausted".into(),
    }));

    let err = generator(&model).generate(&sample_request()).await.unwrap_err();

    assert_eq!(err.to_string(), "gemini quota exceeded: Resource has been exhausted");
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn prompt_lists_only_submitted_days() {
    let model = Arc::new(StubModel::replying(sample_plan_json("monday").to_string()));
    let mut request = sample_request();
    request.available_days.push(AvailableDay {
        day: "friday".into(),
        hours: 1.5,
        time_of_day: vec!["Afternoon".into(), "Evening".into()],
    });

    generator(&model).generate(&request).await.unwrap();

    let prompt = model.last_prompt().unwrap();
    assert!(prompt.contains("- Monday: 2 hours, Time: Morning\n"));
    assert!(prompt.contains("- Friday: 1.5 hours, Time: Afternoon, Evening\n"));
    assert!(!prompt.contains("Tuesday"));
}

#[tokio::test]
async fn single_day_plan_has_one_schedule_entry() {
    let model = Arc::new(StubModel::replying(fenced(&sample_plan_json("monday"))));
    let planner: Arc<dyn Planner> = Arc::new(generator(&model));

    let result = planner.plan(&sample_request()).await.unwrap();

    let schedule = result["workoutSchedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0]["day"], "monday");
}

#[tokio::test]
async fn each_call_is_a_single_attempt() {
    let model = Arc::new(StubModel::new(vec![
        Ok("not json".into()),
        Ok(sample_plan_json("monday").to_string()),
    ]));
    let generator = generator(&model);

    assert!(generator.generate(&sample_request()).await.is_err());
    assert_eq!(model.call_count(), 1);
    assert!(generator.generate(&sample_request()).await.is_ok());
    assert_eq!(model.call_count(), 2);
}
