//! Response provider abstraction
//!
//! The controller talks to the external text-generation service only through
//! [`ResponseProvider`]. Prompt assembly lives here so every provider sees
//! the same preamble and history rendering.

use super::error::ProviderError;
use super::message::{Message, Sender};
use async_trait::async_trait;

/// Instructional preamble placed at the top of every prompt
pub const PROMPT_PREAMBLE: &str = "You are SkillSense, an AI career counselor for college students in India. \
Give practical, encouraging and specific guidance on careers, skills, resumes, interviews and placements. \
Keep answers short (under 150 words), use simple language, and suggest free resources where possible. \
If a question is unrelated to careers or learning, politely steer the student back.";

/// Fixed reply used when the provider blocks a prompt on content grounds
pub const REFUSAL_MESSAGE: &str = "I can't help with that request. I'm here for questions about careers, skills, \
resumes and interviews - feel free to ask me about any of those.";

/// Common interface for text-generation backends
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    /// Generate a reply for a fully assembled prompt
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Cheap connectivity and credential check run once at initialization
    async fn probe(&self) -> Result<(), ProviderError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Assemble the prompt from the preamble, the history window and the new query
///
/// `history` is expected oldest first and already cut to the window size.
pub fn build_prompt(history: &[Message], query: &str) -> String {
    let mut prompt = String::with_capacity(PROMPT_PREAMBLE.len() + query.len() + 64);
    prompt.push_str(PROMPT_PREAMBLE);
    prompt.push_str("\n\n");

    if !history.is_empty() {
        prompt.push_str("Conversation so far:\n");
        for message in history {
            let speaker = match message.sender() {
                Sender::User => "Student",
                Sender::Assistant => "Counselor",
            };
            prompt.push_str(speaker);
            prompt.push_str(": ");
            prompt.push_str(message.text());
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str("Student: ");
    prompt.push_str(query);
    prompt.push_str("\nCounselor:");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_history() {
        let prompt = build_prompt(&[], "How to improve resume?");
        assert!(prompt.starts_with(PROMPT_PREAMBLE));
        assert!(!prompt.contains("Conversation so far"));
        assert!(prompt.ends_with("Student: How to improve resume?\nCounselor:"));
    }

    #[test]
    fn test_prompt_renders_history_in_order() {
        let history = vec![
            Message::user("I like data"),
            Message::assistant("Try SQL and Python"),
        ];
        let prompt = build_prompt(&history, "Which course first?");
        let student = prompt.find("Student: I like data").unwrap();
        let counselor = prompt.find("Counselor: Try SQL and Python").unwrap();
        let query = prompt.find("Student: Which course first?").unwrap();
        assert!(student < counselor);
        assert!(counselor < query);
    }
}
