//! Dialog reply flow.
//!
//! Per incoming user message: persist it, assemble the full history,
//! obtain a reply (from the generation collaborator, or the fixed
//! fallback when none is configured), persist the bot reply, respond.
//! Nothing is rolled back on failure between steps; a failure after the
//! user insert leaves that message durably stored, visible in the log.

use crate::context::{DialogContext, assemble};
use crate::error::{GenerationFailed, ReplyError};
use crate::message::Message;
use crate::store::MessageStore;
use async_trait::async_trait;
use parley_core::{DialogId, MessageId};
use std::sync::Arc;

/// Reply used when no generation collaborator is configured.
///
/// Degraded mode is an expected configuration state, not an error.
pub const FALLBACK_REPLY: &str =
    "Hi! I'm up and running, but no language model has been connected yet.";

/// Trait for the reply-generation collaborator.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generates a reply for the assembled dialog history.
    ///
    /// # Errors
    ///
    /// Returns an error if the collaborator cannot produce a reply.
    async fn generate(&self, context: &DialogContext) -> Result<String, GenerationFailed>;
}

/// An incoming user message for the reply flow.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    /// The dialog the message belongs to.
    pub dialog_id: DialogId,
    /// The user's message text.
    pub text: String,
    /// Pre-assigned message ID; a fresh one is generated when absent.
    pub message_id: Option<MessageId>,
}

/// The terminal result of a completed reply flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyOutcome {
    /// The dialog the reply belongs to.
    pub dialog_id: DialogId,
    /// The reply text that was stored as the bot message.
    pub reply_text: String,
    /// ID the user message was stored under.
    pub user_message_id: MessageId,
    /// ID the bot message was stored under.
    pub bot_message_id: MessageId,
    /// True when the fallback reply was substituted for a generated one.
    pub degraded: bool,
}

/// Orchestrates store-append, context assembly, generation, and the
/// bot-message append for one incoming user message.
pub struct ReplyFlow<S> {
    store: S,
    generator: Option<Arc<dyn ReplyGenerator>>,
}

impl<S: MessageStore> ReplyFlow<S> {
    /// Creates a flow with a configured generation collaborator.
    pub fn new(store: S, generator: Arc<dyn ReplyGenerator>) -> Self {
        Self {
            store,
            generator: Some(generator),
        }
    }

    /// Creates a flow without a generation collaborator.
    ///
    /// Every reply will be the fixed [`FALLBACK_REPLY`].
    pub fn without_generator(store: S) -> Self {
        Self {
            store,
            generator: None,
        }
    }

    /// Handles one incoming user message and produces the bot's reply.
    ///
    /// # Errors
    ///
    /// Propagates store and generation failures to the caller. The user
    /// message stays stored even when a later step fails.
    pub async fn handle(&self, request: ReplyRequest) -> Result<ReplyOutcome, ReplyError> {
        let user_message_id = request.message_id.unwrap_or_else(MessageId::new);
        let user_message = Message::with_id(
            user_message_id,
            request.dialog_id,
            request.text,
            crate::message::PARTICIPANT_USER,
        );
        self.store.insert(user_message).await?;

        let context = assemble(&self.store, request.dialog_id).await?;

        let (reply_text, degraded) = match &self.generator {
            Some(generator) => (generator.generate(&context).await?, false),
            None => {
                tracing::debug!(
                    dialog_id = %request.dialog_id,
                    "No generation collaborator configured, using fallback reply"
                );
                (FALLBACK_REPLY.to_string(), true)
            }
        };

        let bot_message = Message::assistant(request.dialog_id, reply_text.clone());
        let bot_message_id = bot_message.id;
        self.store.insert(bot_message).await?;

        tracing::info!(
            dialog_id = %request.dialog_id,
            user_message_id = %user_message_id,
            bot_message_id = %bot_message_id,
            degraded,
            "Reply flow completed"
        );

        Ok(ReplyOutcome {
            dialog_id: request.dialog_id,
            reply_text,
            user_message_id,
            bot_message_id,
            degraded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMessageStore;
    use crate::message::{PARTICIPANT_ASSISTANT, PARTICIPANT_USER};

    struct EchoGenerator;

    #[async_trait]
    impl ReplyGenerator for EchoGenerator {
        async fn generate(&self, context: &DialogContext) -> Result<String, GenerationFailed> {
            let last = context.entries.last().expect("context is never empty");
            Ok(format!("echo: {}", last.text))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ReplyGenerator for FailingGenerator {
        async fn generate(&self, _context: &DialogContext) -> Result<String, GenerationFailed> {
            Err(GenerationFailed {
                reason: "upstream timeout".to_string(),
            })
        }
    }

    fn request(dialog_id: DialogId, text: &str) -> ReplyRequest {
        ReplyRequest {
            dialog_id,
            text: text.to_string(),
            message_id: None,
        }
    }

    #[tokio::test]
    async fn stores_user_then_bot_message() {
        let store = Arc::new(InMemoryMessageStore::new());
        let flow = ReplyFlow::new(Arc::clone(&store), Arc::new(EchoGenerator));
        let dialog_id = DialogId::new();

        let outcome = flow.handle(request(dialog_id, "hi")).await.expect("flow");

        assert_eq!(outcome.reply_text, "echo: hi");
        assert!(!outcome.degraded);

        let messages = store.list_by_dialog(dialog_id).await.expect("list");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].participant_index, PARTICIPANT_USER);
        assert_eq!(messages[0].id, outcome.user_message_id);
        assert_eq!(messages[1].participant_index, PARTICIPANT_ASSISTANT);
        assert_eq!(messages[1].id, outcome.bot_message_id);
        assert_eq!(messages[1].text, "echo: hi");
    }

    #[tokio::test]
    async fn fallback_reply_without_generator() {
        let store = Arc::new(InMemoryMessageStore::new());
        let flow = ReplyFlow::without_generator(Arc::clone(&store));
        let dialog_id = DialogId::new();

        let outcome = flow.handle(request(dialog_id, "hi")).await.expect("flow");

        assert_eq!(outcome.reply_text, FALLBACK_REPLY);
        assert!(outcome.degraded);

        let messages = store.list_by_dialog(dialog_id).await.expect("list");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn caller_supplied_message_id_is_kept() {
        let store = Arc::new(InMemoryMessageStore::new());
        let flow = ReplyFlow::without_generator(Arc::clone(&store));
        let dialog_id = DialogId::new();
        let message_id = MessageId::new();

        let outcome = flow
            .handle(ReplyRequest {
                dialog_id,
                text: "hello".to_string(),
                message_id: Some(message_id),
            })
            .await
            .expect("flow");

        assert_eq!(outcome.user_message_id, message_id);
        let messages = store.list_by_dialog(dialog_id).await.expect("list");
        assert_eq!(messages[0].id, message_id);
    }

    #[tokio::test]
    async fn generation_failure_leaves_user_message_stored() {
        let store = Arc::new(InMemoryMessageStore::new());
        let flow = ReplyFlow::new(Arc::clone(&store), Arc::new(FailingGenerator));
        let dialog_id = DialogId::new();

        let err = flow
            .handle(request(dialog_id, "hi"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, ReplyError::Generation(_)));

        // No rollback: the user message stays in the log.
        let messages = store.list_by_dialog(dialog_id).await.expect("list");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].participant_index, PARTICIPANT_USER);
    }

    #[tokio::test]
    async fn generator_sees_full_history_including_new_message() {
        struct CountingGenerator;

        #[async_trait]
        impl ReplyGenerator for CountingGenerator {
            async fn generate(&self, context: &DialogContext) -> Result<String, GenerationFailed> {
                Ok(format!("history has {} messages", context.len()))
            }
        }

        let store = Arc::new(InMemoryMessageStore::new());
        let flow = ReplyFlow::new(Arc::clone(&store), Arc::new(CountingGenerator));
        let dialog_id = DialogId::new();

        let first = flow.handle(request(dialog_id, "one")).await.expect("flow");
        assert_eq!(first.reply_text, "history has 1 messages");

        // Second turn sees user, bot, user.
        let second = flow.handle(request(dialog_id, "two")).await.expect("flow");
        assert_eq!(second.reply_text, "history has 3 messages");
    }
}
