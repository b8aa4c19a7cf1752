//! Gemini API wire types
//!
//! Structs that mirror the Gemini `generateContent` JSON format.
//! The API speaks camelCase on the wire.

use crate::config::{ModelParameters, SafetyRule};
use serde::{Deserialize, Serialize};

/// Request structure for Gemini API
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GeminiApiRequest {
    /// List of content items to send
    pub contents: Vec<RequestContent>,
    /// Sampling configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// Content-category thresholds
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetyRule>,
}

/// Content structure for requests
#[derive(Serialize, Debug)]
pub struct RequestContent {
    /// Author role ("user")
    pub role: String,
    /// List of content parts
    pub parts: Vec<RequestPart>,
}

/// A single part for requests (typically text)
#[derive(Serialize, Debug)]
pub struct RequestPart {
    /// The text content
    pub text: String,
}

/// Generation configuration for requests
#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[allow(missing_docs)]
    pub temperature: f32,
    #[allow(missing_docs)]
    pub top_p: f32,
    #[allow(missing_docs)]
    pub top_k: u32,
    #[allow(missing_docs)]
    pub max_output_tokens: u32,
}

impl From<ModelParameters> for GenerationConfig {
    fn from(p: ModelParameters) -> Self {
        Self {
            temperature: p.temperature,
            top_p: p.top_p,
            top_k: p.top_k,
            max_output_tokens: p.max_output_tokens,
        }
    }
}

impl GeminiApiRequest {
    /// Single-turn text request
    pub fn from_prompt(
        prompt: &str,
        parameters: ModelParameters,
        safety_rules: &[SafetyRule],
    ) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(parameters.into()),
            safety_settings: safety_rules.to_vec(),
        }
    }
}

/// Top-level Gemini API response
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GeminiApiResponse {
    /// List of candidate responses from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Optional feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A single candidate response from the model
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of this candidate; absent when generation was blocked
    #[serde(default)]
    pub content: Option<Content>,
    /// Why the model stopped generating (if applicable)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content structure containing parts of the response
#[derive(Deserialize, Debug)]
pub struct Content {
    /// List of content parts (typically one text part)
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single part of content (typically text)
#[derive(Deserialize, Debug)]
pub struct Part {
    /// The text content of this part
    #[serde(default)]
    pub text: String,
}

/// Feedback about the prompt (e.g., if it was blocked)
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked (if applicable)
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Deserialize, Debug)]
pub struct GeminiErrorEnvelope {
    #[allow(missing_docs)]
    pub error: GeminiErrorBody,
}

/// Structured error payload
#[derive(Deserialize, Debug)]
pub struct GeminiErrorBody {
    /// Canonical status name, e.g. `INVALID_ARGUMENT`
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable message, logged only
    #[serde(default)]
    pub message: Option<String>,
    /// Typed detail records
    #[serde(default)]
    pub details: Vec<GeminiErrorDetail>,
}

/// One typed error detail (only `reason` is used)
#[derive(Deserialize, Debug)]
pub struct GeminiErrorDetail {
    /// Machine-readable reason, e.g. `API_KEY_INVALID`
    #[serde(default)]
    pub reason: Option<String>,
}

impl GeminiErrorEnvelope {
    /// Whether any detail carries the given reason code
    pub fn has_reason(&self, reason: &str) -> bool {
        self.error
            .details
            .iter()
            .any(|d| d.reason.as_deref() == Some(reason))
    }
}
