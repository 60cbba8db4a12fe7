//! Context assembly for inference collaborators.
//!
//! The assembler turns a dialog's stored history into the shape the
//! downstream inference needs: an ordered (role, text) sequence for reply
//! generation, or one aggregated transcript for classification. Keeping
//! this separate from storage means both collaborators share one query
//! path and one ordering rule.

use crate::error::ContextError;
use crate::message::MessageRole;
use crate::store::MessageStore;
use parley_core::DialogId;
use std::fmt::Write as _;

/// One entry of an assembled context.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    /// Role derived from the message's participant index.
    pub role: MessageRole,
    /// The message text, verbatim.
    pub text: String,
}

/// The assembled, ordered history of one dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogContext {
    /// The dialog this context was assembled from.
    pub dialog_id: DialogId,
    /// Entries in conversation order, oldest first.
    pub entries: Vec<ContextEntry>,
}

impl DialogContext {
    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the context has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the whole history as one text unit for classification.
    ///
    /// One `role: text` line per message, in conversation order.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let _ = writeln!(out, "{}: {}", entry.role, entry.text);
        }
        out
    }
}

/// Assembles the full ordered history of a dialog.
///
/// # Errors
///
/// Returns `ContextError::EmptyDialog` when the dialog has no stored
/// messages, or `ContextError::Store` when reading the history fails.
pub async fn assemble<S: MessageStore + ?Sized>(
    store: &S,
    dialog_id: DialogId,
) -> Result<DialogContext, ContextError> {
    let messages = store.list_by_dialog(dialog_id).await?;
    if messages.is_empty() {
        return Err(ContextError::EmptyDialog { dialog_id });
    }

    let entries = messages
        .into_iter()
        .map(|m| ContextEntry {
            role: m.role(),
            text: m.text,
        })
        .collect();

    Ok(DialogContext { dialog_id, entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMessageStore;
    use crate::message::Message;
    use parley_core::MessageId;

    #[tokio::test]
    async fn assemble_preserves_order_and_roles() {
        let store = InMemoryMessageStore::new();
        let dialog_id = DialogId::new();
        store.insert(Message::user(dialog_id, "hi")).await.expect("insert");
        store
            .insert(Message::assistant(dialog_id, "hello"))
            .await
            .expect("insert");
        store
            .insert(Message::user(dialog_id, "how are you?"))
            .await
            .expect("insert");

        let context = assemble(&store, dialog_id).await.expect("assemble");

        assert_eq!(context.dialog_id, dialog_id);
        assert_eq!(
            context.entries,
            vec![
                ContextEntry {
                    role: MessageRole::User,
                    text: "hi".to_string(),
                },
                ContextEntry {
                    role: MessageRole::Assistant,
                    text: "hello".to_string(),
                },
                ContextEntry {
                    role: MessageRole::User,
                    text: "how are you?".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn assemble_empty_dialog_fails() {
        let store = InMemoryMessageStore::new();
        let dialog_id = DialogId::new();

        let err = assemble(&store, dialog_id).await.expect_err("must fail");
        assert_eq!(err, ContextError::EmptyDialog { dialog_id });
    }

    #[tokio::test]
    async fn opaque_roles_pass_through() {
        let store = InMemoryMessageStore::new();
        let dialog_id = DialogId::new();
        store
            .insert(Message::with_id(MessageId::new(), dialog_id, "moderator note", 2))
            .await
            .expect("insert");

        let context = assemble(&store, dialog_id).await.expect("assemble");
        assert_eq!(context.entries[0].role, MessageRole::Other(2));
    }

    #[tokio::test]
    async fn transcript_renders_one_line_per_message() {
        let store = InMemoryMessageStore::new();
        let dialog_id = DialogId::new();
        store.insert(Message::user(dialog_id, "hi")).await.expect("insert");
        store
            .insert(Message::assistant(dialog_id, "hello"))
            .await
            .expect("insert");

        let context = assemble(&store, dialog_id).await.expect("assemble");
        assert_eq!(context.transcript(), "user: hi\nassistant: hello\n");
    }
}
