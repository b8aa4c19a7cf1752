//! Provider status lifecycle

use serde::{Deserialize, Serialize};

/// Lifecycle state of the connection to the text-generation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    /// Initialization has not finished yet; submissions are rejected
    #[default]
    Uninitialized,
    /// Configured and reachable
    Ready,
    /// Unusable for the rest of the session; every turn uses the fallback
    Degraded,
}

impl ProviderStatus {
    /// Display name for the status badge
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderStatus::Uninitialized => "Connecting",
            ProviderStatus::Ready => "Online",
            ProviderStatus::Degraded => "Offline mode",
        }
    }

    /// Result of a successful configuration and connectivity probe
    ///
    /// Only `Uninitialized` moves to `Ready`; nothing recovers from `Degraded`.
    pub fn on_ready(self) -> Self {
        match self {
            ProviderStatus::Uninitialized => ProviderStatus::Ready,
            other => other,
        }
    }

    /// Result of any initialization or call failure
    pub fn on_failure(self) -> Self {
        ProviderStatus::Degraded
    }
}
