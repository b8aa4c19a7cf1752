//! Conversational assistant
//!
//! The career-guidance chat widget's core: conversation state, the response
//! provider boundary (with the Gemini adapter), the fallback responder, and
//! the controller that ties them together.

pub mod controller;
pub mod conversation;
pub mod error;
pub mod events;
pub mod fallback;
pub mod gemini;
pub mod gemini_types;
pub mod message;
pub mod provider;
pub mod status;

pub use controller::{AssistantController, AssistantSnapshot};
pub use conversation::ConversationState;
pub use error::{AssistantError, ProviderError, ProviderErrorKind};
pub use events::{AssistantEvent, EVENT_CHANNEL_CAPACITY};
pub use fallback::{FallbackResponder, FALLBACK_RESPONSES};
pub use gemini::GeminiProvider;
pub use message::{Message, Sender};
pub use provider::{build_prompt, ResponseProvider, PROMPT_PREAMBLE, REFUSAL_MESSAGE};
pub use status::ProviderStatus;
