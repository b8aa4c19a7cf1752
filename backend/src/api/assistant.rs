//! Assistant API endpoints
//!
//! Handles HTTP requests for the chat widget: visibility, conversation
//! listing, message submission and clearing.

use crate::api::SharedAssistant;
use crate::assistant::{AssistantSnapshot, Message, ProviderStatus};
use crate::error::AppError;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Request to send a message
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Message text typed by the student
    pub text: String,
}

/// Reply to a submitted message
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// The assistant message produced for this turn
    pub message: Message,
    /// Provider status after the turn
    pub status: ProviderStatus,
}

/// Query parameters for listing messages
#[derive(Debug, Deserialize, Default)]
pub struct MessagesQuery {
    /// Only return the last `limit` messages
    pub limit: Option<usize>,
}

/// GET /api/assistant - Current widget state
pub async fn get_assistant(State(assistant): State<SharedAssistant>) -> Json<AssistantSnapshot> {
    Json(assistant.snapshot().await)
}

/// POST /api/assistant/open - Show the widget
pub async fn open_assistant(State(assistant): State<SharedAssistant>) -> Json<AssistantSnapshot> {
    assistant.open().await;
    Json(assistant.snapshot().await)
}

/// POST /api/assistant/close - Hide the widget
pub async fn close_assistant(State(assistant): State<SharedAssistant>) -> Json<AssistantSnapshot> {
    assistant.close().await;
    Json(assistant.snapshot().await)
}

/// GET /api/assistant/messages - Recent messages, oldest first
pub async fn list_messages(
    State(assistant): State<SharedAssistant>,
    Query(query): Query<MessagesQuery>,
) -> Json<Vec<Message>> {
    let messages = match query.limit {
        Some(limit) => assistant.recent(limit).await,
        None => assistant.snapshot().await.messages,
    };
    Json(messages)
}

/// POST /api/assistant/messages - Submit a message and wait for the reply
///
/// A client that disconnects mid-reply does not cancel the turn; the reply
/// still lands in the conversation.
pub async fn submit_message(
    State(assistant): State<SharedAssistant>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    info!(text_len = request.text.len(), "Assistant message received");

    let message = assistant.submit(&request.text).await?;

    Ok(Json(SubmitResponse {
        message,
        status: assistant.status().await,
    }))
}

/// DELETE /api/assistant/messages - Clear the conversation
pub async fn clear_messages(State(assistant): State<SharedAssistant>) -> StatusCode {
    assistant.clear().await;
    StatusCode::NO_CONTENT
}
