//!
//! # Provider Trait
//!
//! This module defines the [`Provider`] trait, the single external boundary of the
//! pipeline: given a rendered prompt and a schema description, produce the model's
//! raw structured response.
//!
//! The pipeline treats the provider as a black box. It does not parse or trust the
//! returned text here; schema validation and location reconciliation happen after
//! the call. Implementations should perform exactly one request per invocation so
//! that retries issued by the caller stay idempotent.

use crate::error::FeedbackResult;
use async_trait::async_trait;

/// Boundary to the external LLM service.
///
/// # Arguments
/// - `prompt`: The fully rendered instruction and submission text.
/// - `schema`: A JSON schema description of the expected structured response.
///
/// # Returns
/// - `Ok(String)`: The raw, JSON-shaped response text.
/// - `Err(FeedbackError)`: If the request fails.
#[async_trait]
pub trait Provider {
    async fn generate(&self, prompt: &str, schema: &str) -> FeedbackResult<String>;
}
