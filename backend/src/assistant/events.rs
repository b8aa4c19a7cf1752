//! Assistant events
//!
//! State changes broadcast to observers (WebSocket clients, the desktop shell).

use super::message::Message;
use super::status::ProviderStatus;
use serde::{Deserialize, Serialize};

/// Capacity of the event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A change in the assistant session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantEvent {
    /// A message was appended to the conversation
    MessageAppended {
        /// The appended message
        message: Message,
    },
    /// The provider status changed
    StatusChanged {
        /// New status
        status: ProviderStatus,
    },
    /// The widget was opened or closed
    VisibilityChanged {
        /// Whether the widget is now visible
        visible: bool,
    },
    /// A reply started or finished
    PendingChanged {
        /// Whether a reply is now in flight
        pending: bool,
    },
    /// The conversation was emptied
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(AssistantEvent::StatusChanged {
            status: ProviderStatus::Ready,
        })
        .unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["status"], "ready");

        let json = serde_json::to_value(AssistantEvent::Cleared).unwrap();
        assert_eq!(json["type"], "cleared");
    }
}
