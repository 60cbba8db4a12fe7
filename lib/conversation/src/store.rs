//! Message store abstraction.
//!
//! The store is an append-only log: messages are never mutated or deleted
//! once inserted, and insertion order within a dialog is the authoritative
//! conversation order. Backends supply the ordering guarantee (typically a
//! sequence column); the pipeline adds no locking of its own.

use crate::error::StoreError;
use crate::message::Message;
use async_trait::async_trait;
use parley_core::DialogId;
use std::sync::Arc;

/// Trait for message storage backends.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends one message to the log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if a message with the same ID
    /// already exists (an existing row is never overwritten), or
    /// `StoreError::Unavailable` / `StoreError::QueryFailed` if the
    /// backend cannot complete the write.
    async fn insert(&self, message: Message) -> Result<(), StoreError>;

    /// Lists all messages of a dialog, ascending by insertion order.
    ///
    /// An unknown dialog yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot complete the read.
    async fn list_by_dialog(&self, dialog_id: DialogId) -> Result<Vec<Message>, StoreError>;
}

// Flows hold whatever handle is convenient; a shared store is still a store.
#[async_trait]
impl<T: MessageStore + ?Sized> MessageStore for Arc<T> {
    async fn insert(&self, message: Message) -> Result<(), StoreError> {
        (**self).insert(message).await
    }

    async fn list_by_dialog(&self, dialog_id: DialogId) -> Result<Vec<Message>, StoreError> {
        (**self).list_by_dialog(dialog_id).await
    }
}
