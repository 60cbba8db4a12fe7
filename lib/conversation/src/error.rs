//! Error types for the conversation crate.
//!
//! Each pipeline stage has its own error enum:
//! - `StoreError`: Message store operations
//! - `ContextError`: Context assembly
//! - `PredictionError`: Prediction value validation
//! - `ReplyError` / `PredictError`: Flow orchestration

use parley_core::{DialogId, MessageId};
use std::fmt;

/// Errors from message store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A message with this ID already exists; the log never overwrites.
    DuplicateId { id: MessageId },
    /// The underlying store is unreachable.
    Unavailable { reason: String },
    /// A query failed for a reason other than availability.
    QueryFailed { reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id } => write!(f, "message id already exists: {id}"),
            Self::Unavailable { reason } => write!(f, "message store unavailable: {reason}"),
            Self::QueryFailed { reason } => write!(f, "message store query failed: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors from context assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The dialog has no stored messages, so there is nothing to assemble.
    EmptyDialog { dialog_id: DialogId },
    /// Reading the history from the store failed.
    Store(StoreError),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDialog { dialog_id } => {
                write!(f, "no messages found for dialog {dialog_id}")
            }
            Self::Store(err) => write!(f, "context assembly failed: {err}"),
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::EmptyDialog { .. } => None,
        }
    }
}

impl From<StoreError> for ContextError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// Errors from prediction value validation.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// The probability lies outside [0.0, 1.0].
    ProbabilityOutOfRange { value: f64 },
}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbabilityOutOfRange { value } => {
                write!(f, "is_bot_probability {value} outside [0.0, 1.0]")
            }
        }
    }
}

impl std::error::Error for PredictionError {}

/// Failure reported by a reply-generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailed {
    /// What went wrong, as reported by the collaborator.
    pub reason: String,
}

impl fmt::Display for GenerationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reply generation failed: {}", self.reason)
    }
}

impl std::error::Error for GenerationFailed {}

/// Errors from the dialog reply flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyError {
    /// Persisting a message failed.
    Store(StoreError),
    /// Assembling the dialog context failed.
    Context(ContextError),
    /// The generation collaborator failed.
    Generation(GenerationFailed),
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "reply flow: {err}"),
            Self::Context(err) => write!(f, "reply flow: {err}"),
            Self::Generation(err) => write!(f, "reply flow: {err}"),
        }
    }
}

impl std::error::Error for ReplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Context(err) => Some(err),
            Self::Generation(err) => Some(err),
        }
    }
}

impl From<StoreError> for ReplyError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ContextError> for ReplyError {
    fn from(err: ContextError) -> Self {
        Self::Context(err)
    }
}

impl From<GenerationFailed> for ReplyError {
    fn from(err: GenerationFailed) -> Self {
        Self::Generation(err)
    }
}

/// Failure reported by a classification collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationFailed {
    /// What went wrong, as reported by the collaborator.
    pub reason: String,
}

impl fmt::Display for ClassificationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog classification failed: {}", self.reason)
    }
}

impl std::error::Error for ClassificationFailed {}

/// Errors from the prediction flow.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Persisting the triggering message failed.
    Store(StoreError),
    /// Assembling the dialog context failed (including the empty-dialog case).
    Context(ContextError),
    /// The classification collaborator failed.
    Classification(ClassificationFailed),
    /// The classifier returned a probability outside [0.0, 1.0].
    Prediction(PredictionError),
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "prediction flow: {err}"),
            Self::Context(err) => write!(f, "prediction flow: {err}"),
            Self::Classification(err) => write!(f, "prediction flow: {err}"),
            Self::Prediction(err) => write!(f, "prediction flow: {err}"),
        }
    }
}

impl std::error::Error for PredictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Context(err) => Some(err),
            Self::Classification(err) => Some(err),
            Self::Prediction(err) => Some(err),
        }
    }
}

impl From<StoreError> for PredictError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ContextError> for PredictError {
    fn from(err: ContextError) -> Self {
        Self::Context(err)
    }
}

impl From<ClassificationFailed> for PredictError {
    fn from(err: ClassificationFailed) -> Self {
        Self::Classification(err)
    }
}

impl From<PredictionError> for PredictError {
    fn from(err: PredictionError) -> Self {
        Self::Prediction(err)
    }
}
