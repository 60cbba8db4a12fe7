//! Error types for the AI crate.

use std::fmt;

/// Errors from LLM backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Request failed to reach the provider or came back non-2xx.
    RequestFailed { reason: String },
    /// Response body did not have the expected shape.
    ResponseParseFailed { reason: String },
    /// The response carried no generated choice.
    EmptyResponse,
    /// Invalid configuration.
    InvalidConfig { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => {
                write!(f, "LLM request failed: {reason}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse LLM response: {reason}")
            }
            Self::EmptyResponse => write!(f, "LLM response contained no choices"),
            Self::InvalidConfig { reason } => {
                write!(f, "invalid LLM configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// Errors from zero-shot classification operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// Request failed to reach the classifier or came back non-2xx.
    RequestFailed { reason: String },
    /// Response body did not have the expected shape.
    ResponseParseFailed { reason: String },
    /// The expected candidate label was missing from the response.
    MissingLabel { label: String },
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => {
                write!(f, "classifier request failed: {reason}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse classifier response: {reason}")
            }
            Self::MissingLabel { label } => {
                write!(f, "classifier response missing label '{label}'")
            }
        }
    }
}

impl std::error::Error for ClassifierError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_error_display() {
        let err = LlmError::RequestFailed {
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn classifier_error_display() {
        let err = ClassifierError::MissingLabel {
            label: "bot".to_string(),
        };
        assert!(err.to_string().contains("bot"));
    }
}
