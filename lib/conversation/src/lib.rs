//! Dialog state and context-assembly pipeline for the parley platform.
//!
//! This crate provides:
//!
//! - **Message Store**: Append-only log of messages keyed by dialog
//! - **Context Assembler**: Ordered history turned into inference context
//! - **Prediction**: Validated classification result value object
//! - **Flows**: Reply-generation and bot-prediction orchestration

pub mod context;
pub mod error;
pub mod memory;
pub mod message;
pub mod predict;
pub mod prediction;
pub mod reply;
pub mod store;

pub use context::{ContextEntry, DialogContext, assemble};
pub use error::{
    ClassificationFailed, ContextError, GenerationFailed, PredictError, PredictionError,
    ReplyError, StoreError,
};
pub use memory::InMemoryMessageStore;
pub use message::{Message, MessageRole};
pub use predict::{DialogClassifier, PredictionFlow, PredictionRequest};
pub use prediction::Prediction;
pub use reply::{FALLBACK_REPLY, ReplyFlow, ReplyGenerator, ReplyOutcome, ReplyRequest};
pub use store::MessageStore;
