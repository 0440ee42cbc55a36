//! Session history HTTP handler.
//!
//! Endpoint:
//! - GET /sessions/{id}/messages?limit=N - Recent turns of a session, oldest first

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use nifty_types::turn::{DEFAULT_HISTORY_LIMIT, Turn};

use crate::http::error::AppError;
use crate::state::AppState;

/// Largest window a client may ask for.
pub const MAX_MESSAGE_LIMIT: usize = 1000;

/// Query parameters for message listing.
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    #[serde(default = "default_message_limit")]
    pub limit: usize,
}

fn default_message_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Response body of the history endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionMessages {
    pub session_id: String,
    pub messages: Vec<Turn>,
}

/// GET /sessions/{id}/messages - Get the recent window of a session.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    query: Result<Query<MessageListQuery>, QueryRejection>,
) -> Result<Json<SessionMessages>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let limit = query.limit.min(MAX_MESSAGE_LIMIT);

    let messages = state.chat_service.history(&session_id, limit).await?;

    Ok(Json(SessionMessages {
        session_id,
        messages,
    }))
}
