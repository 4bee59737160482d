//! Feedback Error Types
//!
//! This module defines the [`FeedbackError`] enum, which encapsulates all error types that can occur
//! while building prompts, calling the feedback provider, and validating its structured response.
//! Each variant provides a descriptive error message for robust error handling and debugging.
//!
//! Annotation-level problems are deliberately *not* errors: a malformed array element or an
//! unresolvable source location is dropped and recorded as a warning so the rest of the run can
//! still produce a report.

/// Result type for feedback pipeline operations.
pub type FeedbackResult<T> = Result<T, FeedbackError>;

/// Represents all error types that can occur in the feedback pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    /// The rubric or submission is empty; the run aborts before any provider call.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// The provider request failed (network, HTTP status, or response decoding).
    #[error("Provider request failed: {0}")]
    Provider(String),

    /// The provider call exceeded the configured time bound.
    #[error("Provider call timed out after {0} seconds")]
    ProviderTimeout(u64),

    /// The response as a whole could not be parsed as the declared schema.
    #[error("Response did not match the feedback schema: {0}")]
    Schema(String),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file not found, unreadable, etc.).
    #[error("I/O error: {0}")]
    Io(String),
}
