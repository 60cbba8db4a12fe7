//! In-memory message store.
//!
//! Reference implementation of [`MessageStore`], used by the flow tests
//! and anywhere a store without PostgreSQL is good enough. Keeps the same
//! append-only discipline as the durable backend: global ID uniqueness,
//! insertion order preserved per dialog.

use crate::error::StoreError;
use crate::message::Message;
use crate::store::MessageStore;
use async_trait::async_trait;
use parley_core::{DialogId, MessageId};
use std::collections::HashSet;
use std::sync::Mutex;

/// An in-memory append-only message log.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    messages: Vec<Message>,
    seen_ids: HashSet<MessageId>,
}

impl InMemoryMessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored messages across all dialogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("store lock poisoned").messages.len()
    }

    /// Returns true if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, message: Message) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if !inner.seen_ids.insert(message.id) {
            return Err(StoreError::DuplicateId { id: message.id });
        }
        inner.messages.push(message);
        Ok(())
    }

    async fn list_by_dialog(&self, dialog_id: DialogId) -> Result<Vec<Message>, StoreError> {
        let inner = self.inner.lock().expect("store lock poisoned");
        Ok(inner
            .messages
            .iter()
            .filter(|m| m.dialog_id == dialog_id)
            .cloned()
            .collect())
    }
}
