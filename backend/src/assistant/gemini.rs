//! Gemini response provider
//!
//! Direct HTTP client for the Gemini `generateContent` API. Every failure is
//! classified from the HTTP status and the structured JSON body, never from
//! message text.

use super::error::ProviderError;
use super::gemini_types::{GeminiApiRequest, GeminiApiResponse, GeminiErrorEnvelope};
use super::provider::ResponseProvider;
use crate::config::{AssistantConfig, Credential, ModelParameters, SafetyRule};
use async_trait::async_trait;
use reqwest::StatusCode;

/// Header carrying the API key (keeps the key out of URLs and logs)
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Error-detail reason Gemini uses for a rejected key
const REASON_API_KEY_INVALID: &str = "API_KEY_INVALID";

/// Finish reasons that mean the reply was withheld on content grounds
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Gemini-backed [`ResponseProvider`]
pub struct GeminiProvider {
    client: reqwest::Client,
    credential: Credential,
    model: String,
    base_url: String,
    parameters: ModelParameters,
    safety_rules: Vec<SafetyRule>,
}

impl GeminiProvider {
    /// Build a provider from configuration
    ///
    /// Returns `InvalidCredential` when no key is configured.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, ProviderError> {
        let credential = config
            .credential
            .clone()
            .ok_or_else(|| ProviderError::invalid_credential("No API key configured"))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                ProviderError::unavailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            credential,
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            parameters: config.parameters,
            safety_rules: config.safety_rules.clone(),
        })
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl ResponseProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if self.credential.is_empty() {
            return Err(ProviderError::invalid_credential("API key is empty"));
        }

        let url = format!("{}:generateContent", self.model_url());
        let request_body =
            GeminiApiRequest::from_prompt(prompt, self.parameters, &self.safety_rules);

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.credential.expose())
            .json(&request_body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(classify_error_status(status, &body));
        }

        let text = extract_text(&body)?;
        tracing::debug!(
            response_len = text.len(),
            "Successfully received response from Gemini API"
        );
        Ok(text)
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        if self.credential.is_empty() {
            return Err(ProviderError::invalid_credential("API key is empty"));
        }

        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, self.credential.expose())
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_error_status(status, &body))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Map a reqwest failure (connect, timeout, body read) to `Unavailable`
fn classify_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::unavailable(format!("Gemini API request timed out: {}", e))
    } else {
        ProviderError::unavailable(format!("Failed to reach Gemini API: {}", e))
    }
}

/// Classify a non-2xx response
pub fn classify_error_status(status: StatusCode, body: &str) -> ProviderError {
    let envelope = serde_json::from_str::<GeminiErrorEnvelope>(body).ok();
    let upstream_status = envelope
        .as_ref()
        .and_then(|e| e.error.status.clone())
        .unwrap_or_default();

    tracing::error!(
        status_code = status.as_u16(),
        upstream_status = %upstream_status,
        "Gemini API returned error status"
    );

    let key_rejected = envelope
        .as_ref()
        .is_some_and(|e| e.has_reason(REASON_API_KEY_INVALID));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::invalid_credential(
            format!("Gemini API rejected the credential (HTTP {})", status.as_u16()),
        ),
        StatusCode::BAD_REQUEST if key_rejected => {
            ProviderError::invalid_credential("Gemini API reported an invalid API key")
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::unavailable(format!(
            "Gemini API rate limit exceeded (HTTP {})",
            status.as_u16()
        )),
        _ => ProviderError::unavailable(format!(
            "Gemini API returned error status {} {}",
            status.as_u16(),
            upstream_status
        )),
    }
}

/// Pull the reply text out of a successful response body
pub fn extract_text(body: &str) -> Result<String, ProviderError> {
    let parsed: GeminiApiResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::unavailable(format!(
            "Failed to parse JSON response from Gemini API: {}",
            e
        ))
    })?;

    if let Some(reason) = parsed
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ProviderError::content_policy(format!(
            "Gemini API blocked the prompt: {}",
            reason
        )));
    }

    let candidate = parsed
        .candidates
        .first()
        .ok_or_else(|| ProviderError::unavailable("Gemini API response contains no candidates"))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if BLOCKING_FINISH_REASONS.contains(&reason) {
            return Err(ProviderError::content_policy(format!(
                "Gemini API withheld the reply: {}",
                reason
            )));
        }
    }

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .map(|p| p.text.as_str())
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(ProviderError::unavailable("Gemini API response text is empty"));
    }
    Ok(text.to_string())
}
