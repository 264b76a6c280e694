//! Error types for the prediction pipeline
//!
//! Nothing in the inference path is fatal: load failures degrade the service
//! to the heuristic path, transform and invocation failures are recovered
//! locally, and request-level failures become tagged failure responses.

use thiserror::Error;

/// Errors raised inside the prediction pipeline
#[derive(Debug, Error)]
pub enum PredictError {
    /// Artifact missing or unreadable at startup. Recorded, never fatal.
    #[error("failed to load artifact {path}: {reason}")]
    Load { path: String, reason: String },

    /// Request body is not a JSON object.
    #[error("input data must be a JSON object")]
    Validation,

    /// A provided value could not be coerced during feature construction.
    #[error("invalid value for '{field}': {reason}")]
    Feature { field: String, reason: String },

    /// Unsupported model shape or estimator invocation failure.
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),
}

impl PredictError {
    pub fn feature(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Feature {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
