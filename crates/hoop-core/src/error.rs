//! Errors surfaced by a plan generation attempt.

use thiserror::Error;

use crate::model::ModelError;

/// Why a generation attempt ended without a plan.
///
/// Every variant terminates the attempt; none is retried.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Required profile fields were empty. Raised before any model call.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The model call itself failed (network, HTTP status, quota, blocked).
    #[error(transparent)]
    Provider(#[from] ModelError),

    /// The model answered, but not with parseable JSON.
    #[error("The AI generated an invalid response format")]
    InvalidFormat,

    /// A remote HTTP planner reported a failure.
    #[error("{0}")]
    Remote(String),
}

impl GenerateError {
    /// `true` for errors raised before any external call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields(_))
    }
}
