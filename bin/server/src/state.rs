//! Shared application state.

use crate::db::PgMessageStore;
use parley_conversation::{PredictionFlow, ReplyFlow};
use std::sync::Arc;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// The dialog reply flow.
    pub reply_flow: Arc<ReplyFlow<PgMessageStore>>,
    /// The bot-prediction flow.
    pub prediction_flow: Arc<PredictionFlow<PgMessageStore>>,
}
