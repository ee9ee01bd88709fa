//! Text-generation model interface.
//!
//! The generator only ever needs "send a system instruction and a prompt,
//! get text back", so that is the whole trait. Concrete providers live in
//! submodules; tests substitute scripted implementations.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiModel;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Failures reported by a [`TextModel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider rejected the call for quota or rate-limit reasons.
    #[error("{provider} quota exceeded: {message}")]
    QuotaExceeded { provider: String, message: String },

    /// The prompt or the response was blocked by the provider's safety filters.
    #[error("Response was blocked: {0}")]
    Blocked(String),

    /// A success status with a body we could not use.
    #[error("{0}")]
    Response(String),
}

/// A generative text model.
///
/// Object-safe so it can be shared as `Arc<dyn TextModel>`.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Model identifier, e.g. "gemini-1.5-pro".
    fn model_id(&self) -> &str;

    /// Run one completion. No retry, no streaming.
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String, ModelError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn TextModel) {}
};
