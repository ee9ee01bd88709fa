//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{ModelError, TextModel};

/// Public Gemini REST endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini text model reached over REST.
///
/// The client has no request timeout: a generation takes as long as the
/// provider needs.
#[derive(Debug, Clone)]
pub struct GeminiModel {
    model_id: String,
    api_key: String,
    base_url: String,
    client: Client,
}

impl GeminiModel {
    pub fn new(model_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            api_key: api_key.into(),
            base_url: GEMINI_BASE_URL.to_owned(),
            client: Client::new(),
        }
    }

    /// Point the client at another host (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model_id)
    }
}

#[async_trait]
impl TextModel for GeminiModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String, ModelError> {
        debug!(
            model_id = %self.model_id,
            prompt_len = prompt.len(),
            "sending Gemini generateContent request"
        );

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_owned()),
                }],
            }],
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(system_instruction.to_owned()),
                }],
            }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "failed to send request to Gemini API");
                ModelError::Request(e.without_url().to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            error!(status = %status, error = %error_text, "Gemini API returned error status");
            return Err(status_error(status, error_text));
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse Gemini API response");
            ModelError::Response(format!("Failed to parse response: {e}"))
        })?;

        extract_text(parsed)
    }
}

/// Map a non-success status to a [`ModelError`].
fn status_error(status: StatusCode, body: String) -> ModelError {
    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::PAYMENT_REQUIRED {
        return ModelError::QuotaExceeded {
            provider: "gemini".to_owned(),
            message: body,
        };
    }
    ModelError::Api {
        status: status.as_u16(),
        body,
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GeminiResponse) -> Result<String, ModelError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(ModelError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::Response("No content in API response".to_owned()))?;

    if matches!(candidate.finish_reason.as_deref(), Some("SAFETY" | "RECITATION")) {
        return Err(ModelError::Blocked(
            candidate.finish_reason.unwrap_or_default(),
        ));
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ModelError::Response("No content in API response".to_owned()));
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
