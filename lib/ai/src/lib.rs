//! Inference collaborators for the parley platform.
//!
//! This crate provides the two external inference clients:
//!
//! - **LLM backend**: chat-completion generation for dialog replies
//! - **Zero-shot classifier**: bot-presence probability for a transcript
//!
//! Both are thin HTTP clients; timeout and retry policy live with the
//! remote services, not here.

pub mod backend;
pub mod classifier;
pub mod error;
pub mod openai;

pub use backend::{ChatMessage, LlmBackend, LlmRequest, LlmResponse};
pub use classifier::{ZeroShotClient, ZeroShotConfig};
pub use error::{ClassifierError, LlmError};
pub use openai::{OpenAiBackend, OpenAiConfig};
