//! HTTP client for a running `hoopbuddy serve` instance.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::GenerateError;
use crate::generator::Planner;
use crate::profile::PlanRequest;

/// Path of the generation endpoint on the server.
pub const GENERATE_PATH: &str = "/api/generate-workout";

/// [`Planner`] that forwards requests to a remote server.
#[derive(Debug, Clone)]
pub struct RemotePlanner {
    endpoint: String,
    client: Client,
}

impl RemotePlanner {
    /// `base_url` is the server root, e.g. `http://localhost:5050`.
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}{GENERATE_PATH}", base_url.trim_end_matches('/')),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Planner for RemotePlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Value, GenerateError> {
        debug!(endpoint = %self.endpoint, "posting plan request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %self.endpoint, error = %e, "plan request failed");
                GenerateError::Remote(format!("Failed to reach {}: {e}", self.endpoint))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            return Err(GenerateError::Remote(error_message(status, body.as_ref())));
        }

        response
            .json::<Value>()
            .await
            .map_err(|_| GenerateError::InvalidFormat)
    }
}

/// Pick the message shown for a failed response: the body's `error`, then
/// its `details`, then a generic line with the status.
fn error_message(status: StatusCode, body: Option<&Value>) -> String {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };
    field("error").or_else(|| field("details")).unwrap_or_else(|| {
        format!(
            "Failed to generate workout plan: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_owned()
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            RemotePlanner::new("http://localhost:5050/").endpoint(),
            "http://localhost:5050/api/generate-workout"
        );
    }

    #[test]
    fn error_message_prefers_error_then_details() {
        let body = json!({"error": "Missing required fields", "details": "x"});
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, Some(&body)),
            "Missing required fields"
        );

        let body = json!({"details": "quota"});
        assert_eq!(error_message(StatusCode::INTERNAL_SERVER_ERROR, Some(&body)), "quota");
    }

    #[test]
    fn error_message_falls_back_to_status_line() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, None),
            "Failed to generate workout plan: 502 Bad Gateway"
        );
    }
}
