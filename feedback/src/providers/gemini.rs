//! # Gemini Provider
//!
//! [`Provider`] implementation backed by Google's Gemini API. The request disables
//! thinking for faster responses and asks for `application/json` output so the model
//! returns the structured annotation object directly instead of prose.
//!
//! ## Environment
//!
//! Requires the `GEMINI_API_KEY` environment variable (or `.env` entry); the model
//! name comes from `GEMINI_MODEL` and defaults to a fast flash-tier model.

use crate::error::{FeedbackError, FeedbackResult};
use crate::traits::provider::Provider;
use async_trait::async_trait;
use common::config;
use serde::{Deserialize, Serialize};

/// Provider backed by the Gemini generateContent endpoint.
pub struct GeminiProvider {
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new() -> Self {
        Self {
            model: config::gemini_model(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body for the Gemini API.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

/// Generation options: no thinking budget, JSON-only output.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
    response_mime_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    /// Set to 0 to disable thinking for faster requests.
    thinking_budget: u32,
}

/// Response from the Gemini API.
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: String,
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, prompt: &str, schema: &str) -> FeedbackResult<String> {
        dotenvy::dotenv().ok();

        let api_key = config::gemini_api_key();
        if api_key.is_empty() {
            return Err(FeedbackError::Provider(
                "GEMINI_API_KEY is not set".to_string(),
            ));
        }

        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{prompt}\nThe response must match this JSON schema:\n{schema}"),
                }],
            }],
            generation_config: Some(GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
                response_mime_type: "application/json".to_string(),
            }),
        };

        let response = self
            .client
            .post(format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
                self.model, api_key
            ))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| FeedbackError::Provider(e.to_string()))?;

        let response_text = response
            .text()
            .await
            .map_err(|e| FeedbackError::Provider(e.to_string()))?;
        let response = serde_json::from_str::<GeminiResponse>(&response_text).map_err(|e| {
            FeedbackError::Provider(format!(
                "error decoding response body: {}. Full response: {}",
                e, response_text
            ))
        })?;

        response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| FeedbackError::Provider("response contained no candidates".to_string()))
    }
}
