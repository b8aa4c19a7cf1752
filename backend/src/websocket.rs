//! WebSocket handlers for real-time updates
//!
//! Streams assistant events (new messages, status, visibility, pending) to
//! connected clients. Supports ping/pong for connection keepalive.

use crate::api::SharedAssistant;
use crate::assistant::{AssistantController, AssistantEvent, AssistantSnapshot};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

/// Frames sent from the server to the client
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Full widget state, sent on connect and after the client lagged behind
    Snapshot {
        /// Current widget state
        snapshot: AssistantSnapshot,
    },
    /// Incremental change
    Event {
        /// The change
        event: AssistantEvent,
    },
    /// Pong message responding to ping
    Pong,
}

/// Frames accepted from the client
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Ping message for connection keepalive
    Ping,
}

/// WebSocket upgrade handler
///
/// Sends the current snapshot, then every assistant event as it happens.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(assistant): State<SharedAssistant>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, assistant))
}

fn encode(frame: &ServerFrame) -> Option<Message> {
    match serde_json::to_string(frame) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            error!("Failed to encode WebSocket frame: {}", e);
            None
        }
    }
}

/// Full-state frame sent on connect
async fn snapshot_frame(assistant: &AssistantController) -> ServerFrame {
    ServerFrame::Snapshot {
        snapshot: assistant.snapshot().await,
    }
}

/// Next frame for a subscriber, `None` once the event channel is closed
///
/// A subscriber that fell behind gets a fresh snapshot in place of the
/// events it missed.
async fn next_frame(
    assistant: &AssistantController,
    events: &mut broadcast::Receiver<AssistantEvent>,
) -> Option<ServerFrame> {
    match events.recv().await {
        Ok(event) => Some(ServerFrame::Event { event }),
        Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "WebSocket client lagged, resending snapshot");
            Some(snapshot_frame(assistant).await)
        }
        Err(RecvError::Closed) => None,
    }
}

// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, assistant: SharedAssistant) {
    let (mut sender, mut receiver) = socket.split();

    info!("WebSocket client connected");

    // Subscribe before taking the snapshot so no event falls in between
    let mut events = assistant.subscribe();
    let initial = snapshot_frame(&assistant).await;
    if let Some(msg) = encode(&initial) {
        if let Err(e) = sender.send(msg).await {
            error!("Failed to send initial state: {}", e);
            return;
        }
    }

    // Use a channel to send messages from several tasks to the sender
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Message>();

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(msg).await {
                error!("Failed to send message: {}", e);
                break;
            }
        }
    });

    // Forward assistant events
    let event_tx = tx.clone();
    let event_assistant = assistant.clone();
    let mut event_task = tokio::spawn(async move {
        while let Some(frame) = next_frame(&event_assistant, &mut events).await {
            if let Some(msg) = encode(&frame) {
                if event_tx.send(msg).is_err() {
                    break;
                }
            }
        }
    });

    // Task to send periodic pings
    let ping_tx = tx.clone();
    let mut ping_task = tokio::spawn(async move {
        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(30)).await;
            if ping_tx.send(Message::Ping(vec![])).is_err() {
                break;
            }
        }
    });

    // Receive messages
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientFrame>(&text) {
                    Ok(ClientFrame::Ping) => {
                        if let Some(pong) = encode(&ServerFrame::Pong) {
                            if tx.send(pong).is_err() {
                                break;
                            }
                        }
                    }
                    Err(_) => {
                        warn!("Received unhandled WebSocket message: {}", text);
                    }
                },
                Ok(Message::Close(_)) => {
                    info!("WebSocket client disconnected");
                    break;
                }
                Ok(Message::Pong(_)) => {
                    // Client responded to ping
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for any task to complete
    tokio::select! {
        _ = &mut send_task => {
            event_task.abort();
            ping_task.abort();
            recv_task.abort();
        }
        _ = &mut event_task => {
            send_task.abort();
            ping_task.abort();
            recv_task.abort();
        }
        _ = &mut ping_task => {
            send_task.abort();
            event_task.abort();
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
            event_task.abort();
            ping_task.abort();
        }
    }

    info!("WebSocket connection closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{ProviderStatus, EVENT_CHANNEL_CAPACITY};
    use crate::config::AssistantConfig;

    async fn degraded_assistant() -> AssistantController {
        let assistant = AssistantController::from_config(&AssistantConfig::default());
        assistant.initialize().await;
        assistant
    }

    #[test]
    fn test_server_frame_encoding() {
        let frame = ServerFrame::Event {
            event: AssistantEvent::VisibilityChanged { visible: true },
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["event"]["type"], "visibility_changed");
        assert_eq!(json["event"]["visible"], true);

        let frame = ServerFrame::Snapshot {
            snapshot: AssistantSnapshot {
                visible: false,
                pending: false,
                status: ProviderStatus::Degraded,
                messages: vec![],
            },
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["snapshot"]["status"], "degraded");
    }

    #[test]
    fn test_client_ping_parses() {
        let frame: ClientFrame = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Ping));
    }

    #[tokio::test]
    async fn test_connect_frame_is_snapshot() {
        let assistant = degraded_assistant().await;
        assistant.open().await;

        match snapshot_frame(&assistant).await {
            ServerFrame::Snapshot { snapshot } => {
                assert!(snapshot.visible);
                assert_eq!(snapshot.status, ProviderStatus::Degraded);
                assert!(snapshot.messages.is_empty());
            }
            other => panic!("expected snapshot, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_events_forwarded_as_event_frames() {
        let assistant = degraded_assistant().await;
        let mut events = assistant.subscribe();

        assistant.open().await;

        match next_frame(&assistant, &mut events).await {
            Some(ServerFrame::Event { event }) => {
                assert_eq!(event, AssistantEvent::VisibilityChanged { visible: true });
            }
            other => panic!("expected event frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_lagged_subscriber_gets_snapshot() {
        let assistant = degraded_assistant().await;
        let mut events = assistant.subscribe();

        for _ in 0..EVENT_CHANNEL_CAPACITY + 5 {
            assistant.toggle().await;
        }

        match next_frame(&assistant, &mut events).await {
            Some(ServerFrame::Snapshot { snapshot }) => {
                assert_eq!(snapshot.visible, assistant.is_open().await);
            }
            other => panic!("expected snapshot after lag, got {:?}", other),
        }
    }
}
