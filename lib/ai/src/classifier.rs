//! Zero-shot classification client.
//!
//! Talks to a HuggingFace-style zero-shot inference endpoint: the request
//! carries the aggregated dialog transcript plus candidate labels, the
//! response scores each label. The bot-presence probability is the score
//! of the "bot" label.

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Candidate label whose score becomes the bot-presence probability.
pub const BOT_LABEL: &str = "bot";
/// The opposing candidate label.
pub const HUMAN_LABEL: &str = "human";

/// Configuration for the zero-shot classifier client.
#[derive(Debug, Clone)]
pub struct ZeroShotConfig {
    /// URL of the classification endpoint.
    pub endpoint: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

/// A zero-shot classification client.
pub struct ZeroShotClient {
    client: reqwest::Client,
    config: ZeroShotConfig,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    parameters: ClassifyParameters,
}

#[derive(Debug, Serialize)]
struct ClassifyParameters {
    candidate_labels: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    labels: Vec<String>,
    scores: Vec<f64>,
}

impl ClassifyResponse {
    fn score_for(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|i| self.scores.get(i).copied())
    }
}

impl ZeroShotClient {
    /// Creates a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::RequestFailed` if the HTTP client cannot
    /// be built.
    pub fn new(config: ZeroShotConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::RequestFailed {
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    /// Classifies a dialog transcript, returning the "bot" label score.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response cannot be
    /// parsed, or the response lacks the "bot" label.
    pub async fn bot_probability(&self, transcript: &str) -> Result<f64, ClassifierError> {
        let request = ClassifyRequest {
            inputs: transcript,
            parameters: ClassifyParameters {
                candidate_labels: vec![BOT_LABEL, HUMAN_LABEL],
            },
        };

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClassifierError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                endpoint = %self.config.endpoint,
                status = %status,
                "Classification request rejected"
            );
            return Err(ClassifierError::RequestFailed {
                reason: format!("{status}: {body}"),
            });
        }

        let parsed: ClassifyResponse =
            response
                .json()
                .await
                .map_err(|e| ClassifierError::ResponseParseFailed {
                    reason: e.to_string(),
                })?;

        parsed
            .score_for(BOT_LABEL)
            .ok_or_else(|| ClassifierError::MissingLabel {
                label: BOT_LABEL.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_picks_bot_score_regardless_of_order() {
        let body = r#"{"labels": ["human", "bot"], "scores": [0.8, 0.2]}"#;
        let parsed: ClassifyResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.score_for(BOT_LABEL), Some(0.2));
        assert_eq!(parsed.score_for(HUMAN_LABEL), Some(0.8));
    }

    #[test]
    fn missing_bot_label_yields_none() {
        let body = r#"{"labels": ["spam", "ham"], "scores": [0.6, 0.4]}"#;
        let parsed: ClassifyResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.score_for(BOT_LABEL), None);
    }

    #[test]
    fn request_shape() {
        let request = ClassifyRequest {
            inputs: "user: hi\n",
            parameters: ClassifyParameters {
                candidate_labels: vec![BOT_LABEL, HUMAN_LABEL],
            },
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["inputs"], "user: hi\n");
        assert_eq!(json["parameters"]["candidate_labels"][0], "bot");
    }
}
