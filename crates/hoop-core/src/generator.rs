//! Plan generation: validate, prompt, call the model once, parse.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::GenerateError;
use crate::model::TextModel;
use crate::profile::PlanRequest;
use crate::prompt::{SYSTEM_INSTRUCTION, build_prompt};
use crate::response::parse_plan_response;

/// Anything that can turn a [`PlanRequest`] into workout plan JSON.
///
/// Implemented in-process by [`PlanGenerator`] and over HTTP by
/// [`crate::remote::RemotePlanner`]. Object-safe so front-ends can hold an
/// `Arc<dyn Planner>` without caring which one they got.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, request: &PlanRequest) -> Result<Value, GenerateError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn Planner) {}
};

/// In-process generation adapter around a [`TextModel`].
#[derive(Clone)]
pub struct PlanGenerator {
    model: Arc<dyn TextModel>,
}

impl PlanGenerator {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Run one generation attempt.
    ///
    /// - Rejects incomplete requests with [`GenerateError::MissingFields`]
    ///   before the model is contacted.
    /// - Calls the model exactly once.
    /// - Returns whatever JSON the model produced; the raw text is logged and
    ///   dropped when it does not parse.
    pub async fn generate(&self, request: &PlanRequest) -> Result<Value, GenerateError> {
        if let Err(e) = request.validate() {
            warn!(error = %e, "rejecting incomplete plan request");
            return Err(e);
        }

        let generation_id = Uuid::new_v4();
        let prompt = build_prompt(request);
        info!(
            %generation_id,
            model_id = %self.model.model_id(),
            days = request.available_days.len(),
            "generating workout plan"
        );
        debug!(%generation_id, prompt_len = prompt.len(), "prompt built");

        let text = self
            .model
            .generate(SYSTEM_INSTRUCTION, &prompt)
            .await
            .map_err(|e| {
                error!(%generation_id, error = %e, "model call failed");
                GenerateError::Provider(e)
            })?;

        match parse_plan_response(&text) {
            Ok(plan) => {
                info!(%generation_id, "workout plan generated");
                Ok(plan)
            }
            Err(e) => {
                warn!(%generation_id, raw_response = %text, "model response is not valid JSON");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for PlanGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanGenerator")
            .field("model_id", &self.model.model_id())
            .finish()
    }
}

#[async_trait]
impl Planner for PlanGenerator {
    async fn plan(&self, request: &PlanRequest) -> Result<Value, GenerateError> {
        self.generate(request).await
    }
}
