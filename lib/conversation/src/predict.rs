//! Bot-prediction flow.
//!
//! Persists the triggering message, assembles the dialog's aggregated
//! transcript, asks the classification collaborator for a bot-presence
//! probability, and wraps the result in a validated [`Prediction`].

use crate::context::assemble;
use crate::error::{ClassificationFailed, PredictError};
use crate::message::Message;
use crate::prediction::Prediction;
use crate::store::MessageStore;
use async_trait::async_trait;
use parley_core::{DialogId, MessageId};
use std::sync::Arc;

/// Trait for the classification collaborator.
#[async_trait]
pub trait DialogClassifier: Send + Sync {
    /// Returns the probability that the dialog behind this transcript
    /// contains an automated participant.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator cannot classify the text.
    async fn classify(&self, transcript: &str) -> Result<f64, ClassificationFailed>;
}

/// A message triggering a prediction.
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    /// Caller-supplied message ID.
    pub message_id: MessageId,
    /// The dialog the message belongs to.
    pub dialog_id: DialogId,
    /// The message text.
    pub text: String,
    /// The sender's participant index, echoed into the prediction.
    pub participant_index: i32,
}

/// Orchestrates store-append, transcript assembly, and classification.
pub struct PredictionFlow<S> {
    store: S,
    classifier: Arc<dyn DialogClassifier>,
}

impl<S: MessageStore> PredictionFlow<S> {
    /// Creates a flow with the given classification collaborator.
    pub fn new(store: S, classifier: Arc<dyn DialogClassifier>) -> Self {
        Self { store, classifier }
    }

    /// Persists the triggering message and classifies the dialog.
    ///
    /// # Errors
    ///
    /// Propagates store and classifier failures. An empty dialog after
    /// the insert surfaces as `ContextError::EmptyDialog` (a defensive
    /// check; the insert above makes it unreachable in practice).
    pub async fn handle(&self, request: PredictionRequest) -> Result<Prediction, PredictError> {
        let message = Message::with_id(
            request.message_id,
            request.dialog_id,
            request.text,
            request.participant_index,
        );
        self.store.insert(message).await?;

        let context = assemble(&self.store, request.dialog_id).await?;
        let probability = self.classifier.classify(&context.transcript()).await?;

        let prediction = Prediction::new(
            request.message_id,
            request.dialog_id,
            request.participant_index,
            probability,
        )?;

        tracing::info!(
            dialog_id = %request.dialog_id,
            message_id = %request.message_id,
            is_bot_probability = probability,
            "Prediction flow completed"
        );

        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextError;
    use crate::memory::InMemoryMessageStore;

    struct FixedClassifier(f64);

    #[async_trait]
    impl DialogClassifier for FixedClassifier {
        async fn classify(&self, _transcript: &str) -> Result<f64, ClassificationFailed> {
            Ok(self.0)
        }
    }

    struct RecordingClassifier;

    #[async_trait]
    impl DialogClassifier for RecordingClassifier {
        async fn classify(&self, transcript: &str) -> Result<f64, ClassificationFailed> {
            // Probability encodes the transcript line count, for assertions.
            Ok(transcript.lines().count() as f64 / 100.0)
        }
    }

    fn request(dialog_id: DialogId, text: &str) -> PredictionRequest {
        PredictionRequest {
            message_id: MessageId::new(),
            dialog_id,
            text: text.to_string(),
            participant_index: 0,
        }
    }

    #[tokio::test]
    async fn stores_message_and_returns_prediction() {
        let store = Arc::new(InMemoryMessageStore::new());
        let flow = PredictionFlow::new(Arc::clone(&store), Arc::new(FixedClassifier(0.7)));
        let dialog_id = DialogId::new();
        let req = request(dialog_id, "hello");
        let message_id = req.message_id;

        let prediction = flow.handle(req).await.expect("flow");

        assert_eq!(prediction.message_id, message_id);
        assert_eq!(prediction.dialog_id, dialog_id);
        assert_eq!(prediction.participant_index, 0);
        assert_eq!(prediction.is_bot_probability, 0.7);

        let messages = store.list_by_dialog(dialog_id).await.expect("list");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, message_id);
        assert_eq!(messages[0].text, "hello");
    }

    #[tokio::test]
    async fn classifier_sees_whole_dialog_transcript() {
        let store = Arc::new(InMemoryMessageStore::new());
        let dialog_id = DialogId::new();
        store
            .insert(Message::user(dialog_id, "earlier message"))
            .await
            .expect("insert");

        let flow = PredictionFlow::new(Arc::clone(&store), Arc::new(RecordingClassifier));
        let prediction = flow.handle(request(dialog_id, "new message")).await.expect("flow");

        // Earlier message plus the triggering one.
        assert_eq!(prediction.is_bot_probability, 0.02);
    }

    #[tokio::test]
    async fn duplicate_triggering_id_fails() {
        let store = Arc::new(InMemoryMessageStore::new());
        let dialog_id = DialogId::new();
        let flow = PredictionFlow::new(Arc::clone(&store), Arc::new(FixedClassifier(0.5)));

        let req = request(dialog_id, "first");
        flow.handle(req.clone()).await.expect("flow");

        let err = flow.handle(req).await.expect_err("must reject reused id");
        assert!(matches!(err, PredictError::Store(_)));
    }

    #[tokio::test]
    async fn out_of_range_classifier_output_is_rejected() {
        let store = Arc::new(InMemoryMessageStore::new());
        let flow = PredictionFlow::new(Arc::clone(&store), Arc::new(FixedClassifier(1.5)));

        let err = flow
            .handle(request(DialogId::new(), "hello"))
            .await
            .expect_err("must reject");
        assert!(matches!(err, PredictError::Prediction(_)));
    }

    #[tokio::test]
    async fn empty_dialog_surfaces_as_empty_dialog_error() {
        // Exercise the defensive check directly by asking for a context
        // on a dialog nothing was inserted into.
        let store = InMemoryMessageStore::new();
        let dialog_id = DialogId::new();
        let err = assemble(&store, dialog_id).await.expect_err("must fail");
        assert_eq!(err, ContextError::EmptyDialog { dialog_id });
    }
}
