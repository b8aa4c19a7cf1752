//! API module
//!
//! Contains HTTP request handlers and the router for the assistant server

pub mod assistant;

use crate::assistant::{AssistantController, ProviderStatus};
use crate::websocket;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Controller shared by every handler
pub type SharedAssistant = Arc<AssistantController>;

/// Health check body
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the server answers
    pub status: String,
    /// Crate version
    pub version: String,
    /// Provider lifecycle state
    pub provider_status: ProviderStatus,
}

/// GET /api/health
pub async fn health_check(State(assistant): State<SharedAssistant>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider_status: assistant.status().await,
    })
}

/// Build the application routes (middleware is layered on by the caller)
pub fn router(controller: SharedAssistant) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/assistant", get(assistant::get_assistant))
        .route("/api/assistant/open", post(assistant::open_assistant))
        .route("/api/assistant/close", post(assistant::close_assistant))
        .route(
            "/api/assistant/messages",
            get(assistant::list_messages)
                .post(assistant::submit_message)
                .delete(assistant::clear_messages),
        )
        // WebSocket for real-time updates
        .route("/ws", get(websocket::websocket_handler))
        .with_state(controller)
}
