// Widget UI state
// Holds the draft input and transient notices; the conversation itself
// lives in the assistant controller

use skillsense_backend::assistant::{AssistantError, AssistantSnapshot, Message, ProviderStatus};

/// User intents collected while rendering a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    /// Open or close the chat window
    Toggle,
    /// Close the chat window (title-bar X)
    Close,
    /// Send the current draft
    Send,
    /// Clear the conversation
    Clear,
}

/// Local state of the chat widget
#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    /// Text currently typed in the input box
    pub draft: String,
    /// Short notice shown under the input (rejections)
    pub notice: Option<String>,
}

impl WidgetState {
    /// Create an empty widget state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the input should accept a submission right now
    ///
    /// False while the draft is blank, a reply is pending, or the provider
    /// is still initializing.
    pub fn can_send(&self, snapshot: &AssistantSnapshot) -> bool {
        !self.draft.trim().is_empty()
            && !snapshot.pending
            && snapshot.status != ProviderStatus::Uninitialized
    }

    /// Whether the input box itself is enabled
    pub fn input_enabled(&self, snapshot: &AssistantSnapshot) -> bool {
        !snapshot.pending && snapshot.status != ProviderStatus::Uninitialized
    }

    /// Take the draft for sending, leaving the input empty
    pub fn take_draft(&mut self) -> Option<String> {
        if self.draft.trim().is_empty() {
            return None;
        }
        self.notice = None;
        Some(std::mem::take(&mut self.draft))
    }

    /// Record the outcome of a submission
    pub fn record_result(&mut self, result: Result<Message, AssistantError>) {
        match result {
            Ok(_) => self.notice = None,
            Err(e) => self.notice = Some(e.to_string()),
        }
    }
}
