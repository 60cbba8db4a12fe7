//! Adapters from the parley-ai clients to the conversation crate's
//! collaborator seams.

use async_trait::async_trait;
use parley_ai::{ChatMessage, LlmBackend, LlmRequest, OpenAiBackend, ZeroShotClient};
use parley_conversation::{
    ClassificationFailed, DialogClassifier, DialogContext, GenerationFailed, ReplyGenerator,
};

/// Reply generator backed by an OpenAI-compatible chat endpoint.
pub struct LlmReplyGenerator {
    backend: OpenAiBackend,
}

impl LlmReplyGenerator {
    /// Wraps a configured backend.
    pub fn new(backend: OpenAiBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ReplyGenerator for LlmReplyGenerator {
    async fn generate(&self, context: &DialogContext) -> Result<String, GenerationFailed> {
        let messages = context
            .entries
            .iter()
            .map(|entry| ChatMessage::new(entry.role.to_string(), entry.text.clone()))
            .collect();

        let request = LlmRequest::new(self.backend.model(), messages);
        let response = self
            .backend
            .complete(&request)
            .await
            .map_err(|e| GenerationFailed {
                reason: e.to_string(),
            })?;

        Ok(response.content)
    }
}

/// Dialog classifier backed by the zero-shot endpoint.
pub struct ZeroShotDialogClassifier {
    client: ZeroShotClient,
}

impl ZeroShotDialogClassifier {
    /// Wraps a configured client.
    pub fn new(client: ZeroShotClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DialogClassifier for ZeroShotDialogClassifier {
    async fn classify(&self, transcript: &str) -> Result<f64, ClassificationFailed> {
        self.client
            .bot_probability(transcript)
            .await
            .map_err(|e| ClassificationFailed {
                reason: e.to_string(),
            })
    }
}
