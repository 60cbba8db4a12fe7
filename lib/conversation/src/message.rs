//! Message types for dialogs.

use chrono::{DateTime, Utc};
use parley_core::{DialogId, MessageId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Participant index of the human side of a dialog.
pub const PARTICIPANT_USER: i32 = 0;
/// Participant index of the automated respondent.
pub const PARTICIPANT_ASSISTANT: i32 = 1;

/// The role of a message sender, derived from its participant index.
///
/// Indices outside {0, 1} are permitted by the schema and pass through
/// as opaque roles; the pipeline gives them no special meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// User/human message (participant index 0).
    User,
    /// Assistant/bot message (participant index 1).
    Assistant,
    /// Any other participant index, passed through untouched.
    Other(i32),
}

impl MessageRole {
    /// Derives the role from a participant index.
    #[must_use]
    pub fn from_participant_index(index: i32) -> Self {
        match index {
            PARTICIPANT_USER => Self::User,
            PARTICIPANT_ASSISTANT => Self::Assistant,
            other => Self::Other(other),
        }
    }

    /// Returns the participant index for this role.
    #[must_use]
    pub fn participant_index(&self) -> i32 {
        match self {
            Self::User => PARTICIPANT_USER,
            Self::Assistant => PARTICIPANT_ASSISTANT,
            Self::Other(index) => *index,
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Other(index) => write!(f, "participant_{index}"),
        }
    }
}

/// A message in a dialog.
///
/// Messages are immutable once created; the store only ever appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// The dialog this message belongs to.
    pub dialog_id: DialogId,
    /// Message text payload.
    pub text: String,
    /// Role tag: 0 is the human, 1 is the automated respondent.
    pub participant_index: i32,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message with an explicit ID.
    #[must_use]
    pub fn with_id(
        id: MessageId,
        dialog_id: DialogId,
        text: impl Into<String>,
        participant_index: i32,
    ) -> Self {
        Self {
            id,
            dialog_id,
            text: text.into(),
            participant_index,
            created_at: Utc::now(),
        }
    }

    /// Creates a user message with a fresh ID.
    #[must_use]
    pub fn user(dialog_id: DialogId, text: impl Into<String>) -> Self {
        Self::with_id(MessageId::new(), dialog_id, text, PARTICIPANT_USER)
    }

    /// Creates an assistant message with a fresh ID.
    #[must_use]
    pub fn assistant(dialog_id: DialogId, text: impl Into<String>) -> Self {
        Self::with_id(MessageId::new(), dialog_id, text, PARTICIPANT_ASSISTANT)
    }

    /// Returns the role derived from the participant index.
    #[must_use]
    pub fn role(&self) -> MessageRole {
        MessageRole::from_participant_index(self.participant_index)
    }
}
