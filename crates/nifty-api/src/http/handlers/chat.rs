//! Chat HTTP handler.
//!
//! Endpoint:
//! - POST /chat - Handle one user message and return the agent reply
//!
//! The body is parsed by hand from a JSON value so that a missing or
//! non-string `message` is reported as a 400 with a `detail`, the same as a
//! blank one.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

/// A validated chat request.
#[derive(Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

impl ChatRequest {
    /// Extract the request fields from a decoded JSON body.
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let message = match body.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(_) => return Err(AppError::Validation("message must be a string".into())),
            None => return Err(AppError::Validation("message is required".into())),
        };

        let session_id = match body.get("session_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id.clone()),
            Some(_) => {
                return Err(AppError::Validation(
                    "session_id must be a string or null".into(),
                ));
            }
        };

        Ok(Self {
            session_id,
            message,
        })
    }
}

/// Response body of `POST /chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
}

/// Header echoing the id that tags this request's log lines.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// POST /chat - Send a message and receive the agent reply.
///
/// Everything logged while handling the message, down to the store and the
/// provider, carries the `request_id` of the surrounding span.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<([(HeaderName, String); 1], Json<ChatResponse>), AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let request = ChatRequest::from_value(&body)?;

    let request_id = Uuid::now_v7();
    let span = tracing::info_span!(
        "chat_request",
        %request_id,
        has_session = request.session_id.is_some()
    );

    let reply = state
        .chat_service
        .handle_message(request.session_id.as_deref(), &request.message)
        .instrument(span)
        .await?;

    Ok((
        [(REQUEST_ID_HEADER, request_id.to_string())],
        Json(ChatResponse {
            response: reply.reply,
            session_id: reply.session_id,
        }),
    ))
}
