//! OpenAI-compatible chat-completion client.
//!
//! Works against api.openai.com or any compatible proxy endpoint; the
//! base URL is configuration, so a forwarding proxy needs no special
//! handling here.

use crate::backend::{LlmBackend, LlmRequest, LlmResponse};
use crate::error::LlmError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for an OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL of the endpoint (e.g. a proxy in front of api.openai.com).
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model identifier for completions.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

/// A chat-completion backend for OpenAI-compatible endpoints.
#[derive(Debug)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Debug, Deserialize)]
struct CompletionsResponse {
    model: Option<String>,
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAiBackend {
    /// Creates a backend from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidConfig` if the HTTP client cannot be
    /// built or the configuration is unusable.
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.base_url.is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: "base_url is empty".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = self.completions_url();
        tracing::debug!(
            endpoint = %url,
            model = %request.model,
            messages = request.messages.len(),
            "Requesting chat completion"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                endpoint = %url,
                status = %status,
                "Chat completion request rejected"
            );
            return Err(LlmError::RequestFailed {
                reason: format!("{status}: {body}"),
            });
        }

        let parsed: CompletionsResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::ResponseParseFailed {
                    reason: e.to_string(),
                })?;

        let choice = parsed.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;

        Ok(LlmResponse {
            content: choice.message.content,
            model: parsed.model.unwrap_or_else(|| request.model.clone()),
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> OpenAiConfig {
        OpenAiConfig {
            base_url: base_url.to_string(),
            api_key: "test-key".to_string(),
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn empty_base_url_rejected() {
        let err = OpenAiBackend::new(config("")).expect_err("must reject");
        assert!(matches!(err, LlmError::InvalidConfig { .. }));
    }

    #[test]
    fn completions_url_handles_trailing_slash() {
        let backend = OpenAiBackend::new(config("https://proxy.example.com/")).expect("backend");
        assert_eq!(
            backend.completions_url(),
            "https://proxy.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn response_parsing() {
        let body = r#"{
            "model": "gpt-4o-2024-08-06",
            "choices": [{"message": {"role": "assistant", "content": "Hello there."}}]
        }"#;
        let parsed: CompletionsResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.choices[0].message.content, "Hello there.");
    }

    #[test]
    fn model_accessor() {
        let backend = OpenAiBackend::new(config("https://api.openai.com")).expect("backend");
        assert_eq!(backend.model(), "gpt-4o");
    }
}
