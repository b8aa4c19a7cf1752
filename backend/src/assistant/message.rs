//! Chat message model
//!
//! Defines the immutable message record exchanged inside an assistant session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the student
    User,
    /// Reply produced by the assistant (provider, refusal or fallback)
    Assistant,
}

impl Sender {
    /// Convert the sender to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// A single message in the conversation
///
/// Fields are private so a message cannot change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    text: String,
    sender: Sender,
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with a fresh id and the current time
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            sent_at: Utc::now(),
        }
    }

    /// Shorthand for a student message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Shorthand for an assistant reply
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Unique identifier of the message
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Message body
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sender of the message
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// When the message was created
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}
