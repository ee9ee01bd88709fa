//! Shared test utilities for hoopbuddy integration tests.
//!
//! Provides a scripted [`StubModel`] standing in for the Gemini client and
//! fixtures for plan requests and model replies.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use hoop_core::PlanRequest;
use hoop_core::model::{ModelError, TextModel};
use hoop_core::profile::AvailableDay;

/// A [`TextModel`] that replays scripted replies in order.
///
/// Once the script runs out it keeps returning the last reply. Every call is
/// counted and its prompt recorded so tests can assert the model was (or was
/// not) contacted.
pub struct StubModel {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    last: Mutex<Option<Result<String, ModelError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubModel {
    pub fn new(replies: Vec<Result<String, ModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Always fail with `error`.
    pub fn failing(error: ModelError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextModel for StubModel {
    fn model_id(&self) -> &str {
        "stub-model"
    }

    async fn generate(
        &self,
        _system_instruction: &str,
        prompt: &str,
    ) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_owned());

        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            *last = Some(next);
        }
        (*last)
            .clone()
            .unwrap_or_else(|| Err(ModelError::Response("stub model has no scripted reply".into())))
    }
}

/// A complete request with only Monday selected.
pub fn sample_request() -> PlanRequest {
    PlanRequest {
        name: "Jordan".into(),
        age: "17".into(),
        position: "pointGuard".into(),
        level: "highSchool".into(),
        improvement: "Left-hand finishing and handling under pressure".into(),
        available_days: vec![AvailableDay {
            day: "monday".into(),
            hours: 2.0,
            time_of_day: vec!["Morning".into()],
        }],
    }
}

/// A well-formed plan with one scheduled day.
pub fn sample_plan_json(day: &str) -> Value {
    json!({
        "name": "Jordan",
        "age": "17",
        "position": "pointGuard",
        "level": "highSchool",
        "focusAreas": "Weak-hand finishing, pressure ball handling",
        "workoutSchedule": [{
            "day": day,
            "hours": 2,
            "timeOfDay": ["Morning"],
            "exercises": [
                {
                    "name": "Mikan drill",
                    "duration": "10 minutes",
                    "description": "Alternate left and right layups under the rim, 3 sets of 20."
                },
                {
                    "name": "Two-ball dribble",
                    "duration": "15 minutes",
                    "description": "Pound dribbles with both hands, stationary then walking."
                }
            ]
        }]
    })
}

/// Wrap `json` in a Markdown code fence the way models often reply.
pub fn fenced(json: &Value) -> String {
    format!(
        "Here is your plan:\n```json\n{}\n```\nGood luck!",
        serde_json::to_string_pretty(json).unwrap()
    )
}
