//! Conversation state
//!
//! Ordered, in-memory log of the messages exchanged in one session.

use super::message::Message;

/// Ordered record of a single chat session
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the end of the log
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Last `n` messages, oldest first (fewer if the log is shorter)
    pub fn recent(&self, n: usize) -> Vec<Message> {
        let start = self.messages.len().saturating_sub(n);
        self.messages[start..].to_vec()
    }

    /// Drop every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// All messages in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
