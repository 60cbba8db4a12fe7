//! Prediction value object.
//!
//! A prediction is transient: it belongs to the request/response cycle
//! that produced it and is never persisted.

use crate::error::PredictionError;
use parley_core::{DialogId, MessageId, PredictionId};
use serde::{Deserialize, Serialize};

/// The result of classifying a dialog for bot participation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Unique identifier for this classification result.
    pub id: PredictionId,
    /// The message that triggered the prediction.
    pub message_id: MessageId,
    /// The dialog the prediction is about.
    pub dialog_id: DialogId,
    /// Participant index echoed from the triggering message.
    pub participant_index: i32,
    /// Confidence that the dialog contains an automated participant.
    pub is_bot_probability: f64,
}

impl Prediction {
    /// Creates a prediction with a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns `PredictionError::ProbabilityOutOfRange` if the probability
    /// lies outside [0.0, 1.0] (NaN included).
    pub fn new(
        message_id: MessageId,
        dialog_id: DialogId,
        participant_index: i32,
        is_bot_probability: f64,
    ) -> Result<Self, PredictionError> {
        if !(0.0..=1.0).contains(&is_bot_probability) {
            return Err(PredictionError::ProbabilityOutOfRange {
                value: is_bot_probability,
            });
        }

        Ok(Self {
            id: PredictionId::new(),
            message_id,
            dialog_id,
            participant_index,
            is_bot_probability,
        })
    }
}
