//! Assistant error types
//!
//! Local rejections raised by the controller and classified failures raised
//! by the response provider.

use thiserror::Error;

/// Reasons a submission is rejected before any message is created
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantError {
    /// The input was empty or whitespace only
    #[error("Message cannot be empty")]
    EmptyInput,

    /// Another submission is still waiting for its reply
    #[error("A reply is still pending")]
    ConcurrentSubmitRejected,

    /// The provider has not finished initializing
    #[error("Assistant is still initializing")]
    NotReady,

    /// The runtime shut down before the turn finished
    #[error("The reply was interrupted")]
    Interrupted,
}

/// Classification of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Credential missing, rejected or revoked - terminal for the session
    InvalidCredential,
    /// The prompt or the reply was blocked by the provider's content rules
    ContentPolicyRejection,
    /// Network failure, timeout, quota or malformed response
    Unavailable,
}

impl ProviderErrorKind {
    /// Whether this failure moves the session to degraded mode
    pub fn degrades_session(&self) -> bool {
        matches!(self, Self::InvalidCredential | Self::Unavailable)
    }
}

/// Provider error with classification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    /// Failure class used by the controller's recovery policy
    pub kind: ProviderErrorKind,
    /// Human-readable detail, for logs only
    pub message: String,
}

impl ProviderError {
    /// Create an error of the given kind
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Credential rejected
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidCredential, message)
    }

    /// Content blocked
    pub fn content_policy(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::ContentPolicyRejection, message)
    }

    /// Provider unreachable or misbehaving
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }
}
