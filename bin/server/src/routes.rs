//! HTTP routes for the message service.
//!
//! Wire shapes match the service contract: `POST /get_message` for the
//! dialog reply flow, `POST /predict` for bot-presence classification.
//! Malformed UUIDs are rejected by deserialization before the core runs;
//! empty text is rejected here for the same reason.

use crate::state::AppState;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use parley_conversation::{
    ContextError, PredictError, Prediction, PredictionRequest, ReplyError, ReplyRequest,
};
use parley_core::{DialogId, MessageId};
use serde::{Deserialize, Serialize};

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get_message", post(get_message))
        .route("/predict", post(predict))
        .with_state(state)
}

/// Request body for `POST /get_message`.
#[derive(Debug, Deserialize)]
pub struct GetMessageRequest {
    /// The dialog the message belongs to.
    pub dialog_id: DialogId,
    /// The user's latest message text.
    pub last_msg_text: String,
    /// Optional pre-assigned ID for that message.
    #[serde(default)]
    pub last_message_id: Option<MessageId>,
}

/// Response body for `POST /get_message`.
#[derive(Debug, Serialize)]
pub struct GetMessageResponse {
    /// The bot's reply text.
    pub new_msg_text: String,
    /// The dialog the reply belongs to.
    pub dialog_id: DialogId,
}

/// Request body for `POST /predict`.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Caller-supplied message ID.
    pub id: MessageId,
    /// The dialog the message belongs to.
    pub dialog_id: DialogId,
    /// The message text.
    pub text: String,
    /// The sender's participant index.
    pub participant_index: i32,
}

/// Errors surfaced at the request boundary.
#[derive(Debug)]
pub enum ApiError {
    /// Input rejected before the core logic ran.
    Validation { detail: String },
    /// The dialog has nothing to evaluate.
    NotFound { detail: String },
    /// The persistence collaborator failed.
    Persistence { detail: String },
    /// An inference collaborator failed.
    Inference { detail: String },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Inference { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn detail(&self) -> &str {
        match self {
            Self::Validation { detail }
            | Self::NotFound { detail }
            | Self::Persistence { detail }
            | Self::Inference { detail } => detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "detail": self.detail() }));
        (status, body).into_response()
    }
}

impl From<ReplyError> for ApiError {
    fn from(err: ReplyError) -> Self {
        tracing::error!(error = %err, "Reply flow failed");
        match err {
            ReplyError::Store(e) => Self::Persistence {
                detail: e.to_string(),
            },
            ReplyError::Context(ContextError::EmptyDialog { .. }) => Self::NotFound {
                detail: "No messages found for this dialog_id".to_string(),
            },
            ReplyError::Context(e) => Self::Persistence {
                detail: e.to_string(),
            },
            ReplyError::Generation(e) => Self::Inference {
                detail: e.to_string(),
            },
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        tracing::error!(error = %err, "Prediction flow failed");
        match err {
            PredictError::Store(e) => Self::Persistence {
                detail: e.to_string(),
            },
            PredictError::Context(ContextError::EmptyDialog { .. }) => Self::NotFound {
                detail: "No messages found for this dialog_id".to_string(),
            },
            PredictError::Context(e) => Self::Persistence {
                detail: e.to_string(),
            },
            PredictError::Classification(e) => Self::Inference {
                detail: e.to_string(),
            },
            PredictError::Prediction(e) => Self::Inference {
                detail: e.to_string(),
            },
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation {
            detail: format!("{field} must not be empty"),
        });
    }
    Ok(())
}

/// Stores the user's message and replies with generated (or fallback)
/// bot text.
async fn get_message(
    State(state): State<AppState>,
    Json(body): Json<GetMessageRequest>,
) -> Result<Json<GetMessageResponse>, ApiError> {
    require_non_empty("last_msg_text", &body.last_msg_text)?;

    let outcome = state
        .reply_flow
        .handle(ReplyRequest {
            dialog_id: body.dialog_id,
            text: body.last_msg_text,
            message_id: body.last_message_id,
        })
        .await?;

    Ok(Json(GetMessageResponse {
        new_msg_text: outcome.reply_text,
        dialog_id: outcome.dialog_id,
    }))
}

/// Stores the incoming message and returns the probability that a bot
/// participates in the dialog.
async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<Prediction>, ApiError> {
    require_non_empty("text", &body.text)?;

    let prediction = state
        .prediction_flow
        .handle(PredictionRequest {
            message_id: body.id,
            dialog_id: body.dialog_id,
            text: body.text,
            participant_index: body.participant_index,
        })
        .await?;

    Ok(Json(prediction))
}
