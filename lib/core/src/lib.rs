//! Core domain types and utilities for the parley platform.
//!
//! This crate provides the foundational ID types and error handling
//! shared by the parley conversational-message service.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{DialogId, MessageId, ParseIdError, PredictionId};
