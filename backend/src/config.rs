//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Loaded once at startup; the assistant never
//! re-reads it within a session.

use serde::Serialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Assistant/provider configuration
    pub assistant: AssistantConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Opaque provider secret
///
/// `Debug` is redacted so the key never reaches the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret, for building the upstream request only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length of the secret, for diagnostics
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Sampling parameters forwarded to the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelParameters {
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Nucleus sampling mass (0.0 - 1.0)
    pub top_p: f32,
    /// Top-k sampling cutoff
    pub top_k: u32,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

/// Content category a safety rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[allow(missing_docs)]
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[allow(missing_docs)]
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[allow(missing_docs)]
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[allow(missing_docs)]
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Probability threshold at which content is blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockThreshold {
    #[allow(missing_docs)]
    BlockNone,
    #[allow(missing_docs)]
    BlockOnlyHigh,
    #[allow(missing_docs)]
    BlockMediumAndAbove,
    #[allow(missing_docs)]
    BlockLowAndAbove,
}

/// One content-category threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetyRule {
    /// Category the rule covers
    pub category: HarmCategory,
    /// Blocking threshold for the category
    pub threshold: BlockThreshold,
}

/// Default safety rules: medium-and-above for every category
pub fn default_safety_rules() -> Vec<SafetyRule> {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .into_iter()
    .map(|category| SafetyRule {
        category,
        threshold: BlockThreshold::BlockMediumAndAbove,
    })
    .collect()
}

/// Assistant and provider configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Provider secret; `None` puts the session in degraded mode at startup
    pub credential: Option<Credential>,
    /// Gemini model name
    pub model: String,
    /// Gemini API base URL
    pub api_base_url: String,
    /// Sampling parameters
    pub parameters: ModelParameters,
    /// Content-category thresholds
    pub safety_rules: Vec<SafetyRule>,
    /// Ceiling for every upstream call
    pub request_timeout: Duration,
    /// Number of recent messages embedded in each prompt
    pub history_window: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            credential: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            parameters: ModelParameters::default(),
            safety_rules: default_safety_rules(),
            request_timeout: Duration::from_secs(15),
            history_window: 8,
        }
    }
}

/// Configuration validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending setting
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl AssistantConfig {
    /// Load assistant settings through a key lookup
    ///
    /// Unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            credential: lookup("GEMINI_API_KEY")
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .map(Credential::new),
            model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.model),
            api_base_url: lookup("GEMINI_API_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.api_base_url),
            parameters: ModelParameters {
                temperature: parse_var(&lookup, "ASSISTANT_TEMPERATURE")
                    .unwrap_or(defaults.parameters.temperature),
                top_p: parse_var(&lookup, "ASSISTANT_TOP_P").unwrap_or(defaults.parameters.top_p),
                top_k: parse_var(&lookup, "ASSISTANT_TOP_K").unwrap_or(defaults.parameters.top_k),
                max_output_tokens: parse_var(&lookup, "ASSISTANT_MAX_OUTPUT_TOKENS")
                    .unwrap_or(defaults.parameters.max_output_tokens),
            },
            safety_rules: defaults.safety_rules,
            request_timeout: parse_var(&lookup, "ASSISTANT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            history_window: parse_var(&lookup, "ASSISTANT_HISTORY_WINDOW")
                .unwrap_or(defaults.history_window),
        }
    }

    /// Check ranges of every tunable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid("ASSISTANT_TIMEOUT_SECS", "must be > 0"));
        }
        if self.history_window == 0 {
            return Err(ConfigError::invalid("ASSISTANT_HISTORY_WINDOW", "must be > 0"));
        }
        let p = &self.parameters;
        if !(0.0..=2.0).contains(&p.temperature) {
            return Err(ConfigError::invalid(
                "ASSISTANT_TEMPERATURE",
                format!("{} is outside 0.0-2.0", p.temperature),
            ));
        }
        if !(0.0..=1.0).contains(&p.top_p) {
            return Err(ConfigError::invalid(
                "ASSISTANT_TOP_P",
                format!("{} is outside 0.0-1.0", p.top_p),
            ));
        }
        if p.top_k == 0 {
            return Err(ConfigError::invalid("ASSISTANT_TOP_K", "must be > 0"));
        }
        if p.max_output_tokens == 0 {
            return Err(ConfigError::invalid("ASSISTANT_MAX_OUTPUT_TOKENS", "must be > 0"));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            server: ServerConfig {
                port: lookup("PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            assistant: AssistantConfig::from_lookup(&lookup),
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
