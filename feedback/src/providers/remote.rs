//! # Remote Provider
//!
//! [`Provider`] implementation for a self-hosted ai-server deployment. The server
//! accepts the prompt, a model name, system instructions and an optional JSON schema,
//! and returns the model's response body; authentication is a shared API key sent in
//! the `X-API-KEY` header.

use crate::error::{FeedbackError, FeedbackResult};
use crate::traits::provider::Provider;
use async_trait::async_trait;
use common::config;
use serde::Serialize;

const SYSTEM_INSTRUCTIONS: &str =
    "You are an automated marking assistant. Return only JSON that matches the provided schema.";

/// Provider backed by a configured ai-server chat endpoint.
pub struct RemoteProvider {
    remote_url: String,
    model_name: String,
    client: reqwest::Client,
}

impl RemoteProvider {
    pub fn new() -> Self {
        Self {
            remote_url: config::remote_url(),
            model_name: config::remote_model(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_endpoint(remote_url: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            model_name: model_name.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for RemoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct RemoteRequest<'a> {
    content: &'a str,
    model: &'a str,
    system_instructions: &'a str,
    json_schema: &'a str,
}

#[async_trait]
impl Provider for RemoteProvider {
    async fn generate(&self, prompt: &str, schema: &str) -> FeedbackResult<String> {
        dotenvy::dotenv().ok();

        if self.remote_url.is_empty() {
            return Err(FeedbackError::Provider("REMOTE_URL is not set".to_string()));
        }

        let request_body = RemoteRequest {
            content: prompt,
            model: &self.model_name,
            system_instructions: SYSTEM_INSTRUCTIONS,
            json_schema: schema,
        };

        let response = self
            .client
            .post(&self.remote_url)
            .header("X-API-KEY", config::remote_api_key())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| FeedbackError::Provider(e.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| FeedbackError::Provider(e.to_string()))?;

        if !status.is_success() {
            return Err(FeedbackError::Provider(format!(
                "remote server returned {status}: {response_text}"
            )));
        }

        Ok(response_text)
    }
}
