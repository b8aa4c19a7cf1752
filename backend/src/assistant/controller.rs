//! Assistant widget controller
//!
//! Mediates between user input and reply generation for a single session:
//! validates submissions, enforces one in-flight reply at a time, dispatches
//! to the provider or the fallback responder, and keeps the conversation and
//! widget visibility.

use super::conversation::ConversationState;
use super::error::{AssistantError, ProviderError, ProviderErrorKind};
use super::events::{AssistantEvent, EVENT_CHANNEL_CAPACITY};
use super::fallback::FallbackResponder;
use super::gemini::GeminiProvider;
use super::message::Message;
use super::provider::{build_prompt, ResponseProvider, REFUSAL_MESSAGE};
use super::status::ProviderStatus;
use crate::config::AssistantConfig;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// Read model of the widget, as shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct AssistantSnapshot {
    /// Whether the widget is open
    pub visible: bool,
    /// Whether a reply is in flight
    pub pending: bool,
    /// Provider lifecycle state
    pub status: ProviderStatus,
    /// Full conversation, oldest first
    pub messages: Vec<Message>,
}

/// Mutable session data guarded by one lock
#[derive(Debug, Default)]
struct Session {
    conversation: ConversationState,
    status: ProviderStatus,
    visible: bool,
    /// Bumped on every clear so replies to cleared turns are dropped
    generation: u64,
}

/// Orchestrates a single assistant session
pub struct AssistantController {
    provider: Option<Arc<dyn ResponseProvider>>,
    fallback: FallbackResponder,
    session: RwLock<Session>,
    pending: AtomicBool,
    events: broadcast::Sender<AssistantEvent>,
    request_timeout: Duration,
    history_window: usize,
}

/// Releases the pending flag when a turn ends, however it ends
struct PendingGuard {
    controller: Arc<AssistantController>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.controller.pending.store(false, Ordering::Release);
        self.controller
            .emit(AssistantEvent::PendingChanged { pending: false });
    }
}

impl AssistantController {
    /// Create a controller in the `Uninitialized` state
    ///
    /// `provider` is `None` when no credential is configured; [`initialize`]
    /// then moves straight to `Degraded`.
    ///
    /// [`initialize`]: AssistantController::initialize
    pub fn new(provider: Option<Arc<dyn ResponseProvider>>) -> Self {
        let defaults = AssistantConfig::default();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            provider,
            fallback: FallbackResponder::new(),
            session: RwLock::new(Session::default()),
            pending: AtomicBool::new(false),
            events,
            request_timeout: defaults.request_timeout,
            history_window: defaults.history_window,
        }
    }

    /// Build a controller backed by Gemini from configuration
    pub fn from_config(config: &AssistantConfig) -> Self {
        let provider: Option<Arc<dyn ResponseProvider>> = match GeminiProvider::from_config(config) {
            Ok(provider) => Some(Arc::new(provider)),
            Err(e) => {
                warn!(
                    error = %e,
                    "Gemini provider not configured, assistant will use fallback replies"
                );
                None
            }
        };
        Self::new(provider)
            .with_timeout(config.request_timeout)
            .with_history_window(config.history_window)
    }

    /// Override the ceiling applied to every provider call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override how many recent messages go into each prompt
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    /// Replace the fallback responder
    pub fn with_fallback(mut self, fallback: FallbackResponder) -> Self {
        self.fallback = fallback;
        self
    }

    /// Resolve the initial provider status
    ///
    /// Runs the connectivity probe once. Later calls return the current
    /// status without probing again.
    pub async fn initialize(&self) -> ProviderStatus {
        if self.status().await != ProviderStatus::Uninitialized {
            return self.status().await;
        }

        let Some(provider) = &self.provider else {
            warn!("No provider credential configured, assistant starts degraded");
            self.set_status(ProviderStatus::Uninitialized.on_failure())
                .await;
            return ProviderStatus::Degraded;
        };

        let probe = match tokio::time::timeout(self.request_timeout, provider.probe()).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::unavailable("Connectivity probe timed out")),
        };

        let status = match probe {
            Ok(()) => {
                info!(provider = %provider.name(), "Assistant provider ready");
                ProviderStatus::Uninitialized.on_ready()
            }
            Err(e) => {
                warn!(
                    provider = %provider.name(),
                    kind = ?e.kind,
                    error = %e,
                    "Assistant provider probe failed, falling back"
                );
                ProviderStatus::Uninitialized.on_failure()
            }
        };
        self.set_status(status).await;
        status
    }

    /// Show the widget
    pub async fn open(&self) {
        self.set_visible(true).await;
    }

    /// Hide the widget (does not cancel an in-flight reply)
    pub async fn close(&self) {
        self.set_visible(false).await;
    }

    /// Flip visibility and return the new value
    pub async fn toggle(&self) -> bool {
        let visible = !self.session.read().await.visible;
        self.set_visible(visible).await;
        visible
    }

    /// Send a student message and wait for the assistant reply
    ///
    /// On success both messages have been appended (unless the conversation
    /// was cleared meanwhile) and the assistant message is returned. The turn
    /// runs on its own task: dropping this future does not cancel it, and
    /// the reply is still appended.
    pub async fn submit(self: &Arc<Self>, text: &str) -> Result<Message, AssistantError> {
        let query = text.trim();
        if query.is_empty() {
            return Err(AssistantError::EmptyInput);
        }
        if self.status().await == ProviderStatus::Uninitialized {
            return Err(AssistantError::NotReady);
        }
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Rejecting submission while a reply is pending");
            return Err(AssistantError::ConcurrentSubmitRejected);
        }
        let guard = PendingGuard {
            controller: Arc::clone(self),
        };
        self.emit(AssistantEvent::PendingChanged { pending: true });

        let turn = tokio::spawn(Self::run_turn(guard, query.to_string()));
        match turn.await {
            Ok(message) => Ok(message),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!(error = %e, "Assistant turn was cancelled");
                Err(AssistantError::Interrupted)
            }
        }
    }

    /// Append the user message, produce the reply and append it
    ///
    /// `guard` is released only after the reply is appended or discarded.
    async fn run_turn(guard: PendingGuard, query: String) -> Message {
        let controller = &guard.controller;

        let (history, generation, status) = {
            let mut session = controller.session.write().await;
            let history = session.conversation.recent(controller.history_window);
            let user_message = Message::user(query.as_str());
            session.conversation.append(user_message.clone());
            controller.emit(AssistantEvent::MessageAppended {
                message: user_message,
            });
            (history, session.generation, session.status)
        };

        let reply = controller.respond(&history, &query, status).await;
        let assistant_message = Message::assistant(reply);

        let mut session = controller.session.write().await;
        if session.generation == generation {
            session.conversation.append(assistant_message.clone());
            controller.emit(AssistantEvent::MessageAppended {
                message: assistant_message.clone(),
            });
        } else {
            debug!("Conversation cleared while reply was pending, discarding reply");
        }

        assistant_message
    }

    /// Empty the conversation; the provider status is untouched
    pub async fn clear(&self) {
        let mut session = self.session.write().await;
        session.conversation.clear();
        session.generation = session.generation.wrapping_add(1);
        self.emit(AssistantEvent::Cleared);
    }

    /// Current provider status
    pub async fn status(&self) -> ProviderStatus {
        self.session.read().await.status
    }

    /// Whether the widget is open
    pub async fn is_open(&self) -> bool {
        self.session.read().await.visible
    }

    /// Whether a reply is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Last `n` messages, oldest first
    pub async fn recent(&self, n: usize) -> Vec<Message> {
        self.session.read().await.conversation.recent(n)
    }

    /// Number of messages in the conversation
    pub async fn message_count(&self) -> usize {
        self.session.read().await.conversation.len()
    }

    /// Consistent view of the whole widget
    pub async fn snapshot(&self) -> AssistantSnapshot {
        let session = self.session.read().await;
        AssistantSnapshot {
            visible: session.visible,
            pending: self.is_pending(),
            status: session.status,
            messages: session.conversation.messages().to_vec(),
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<AssistantEvent> {
        self.events.subscribe()
    }

    /// The fallback responder in use
    pub fn fallback(&self) -> &FallbackResponder {
        &self.fallback
    }

    /// Produce the reply text for one turn. Never fails.
    async fn respond(&self, history: &[Message], query: &str, status: ProviderStatus) -> String {
        let provider = match (&self.provider, status) {
            (Some(provider), ProviderStatus::Ready) => provider,
            _ => return self.fallback.next_response().to_string(),
        };

        let prompt = build_prompt(history, query);
        let call = tokio::time::timeout(self.request_timeout, provider.generate(&prompt));
        let outcome = match call.await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::unavailable(format!(
                "Provider call exceeded {}s",
                self.request_timeout.as_secs()
            ))),
        };

        match outcome {
            Ok(text) => text,
            Err(e) if e.kind == ProviderErrorKind::ContentPolicyRejection => {
                warn!(error = %e, "Provider rejected the prompt on content grounds");
                REFUSAL_MESSAGE.to_string()
            }
            Err(e) => {
                warn!(
                    provider = %provider.name(),
                    kind = ?e.kind,
                    error = %e,
                    "Provider call failed, degrading session"
                );
                self.set_status(status.on_failure()).await;
                self.fallback.next_response().to_string()
            }
        }
    }

    async fn set_status(&self, status: ProviderStatus) {
        let mut session = self.session.write().await;
        if session.status != status {
            info!(from = ?session.status, to = ?status, "Provider status changed");
            session.status = status;
            self.emit(AssistantEvent::StatusChanged { status });
        }
    }

    async fn set_visible(&self, visible: bool) {
        let mut session = self.session.write().await;
        if session.visible != visible {
            session.visible = visible;
            self.emit(AssistantEvent::VisibilityChanged { visible });
        }
    }

    fn emit(&self, event: AssistantEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl ResponseProvider for EchoProvider {
        async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
            Ok(format!("echo {}", prompt.len()))
        }

        async fn probe(&self) -> Result<(), ProviderError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn echo_controller() -> Arc<AssistantController> {
        let provider = Arc::new(EchoProvider) as Arc<dyn ResponseProvider>;
        Arc::new(AssistantController::new(Some(provider)))
    }

    #[tokio::test]
    async fn test_submit_before_initialize_is_rejected() {
        let controller = echo_controller();
        assert_eq!(
            controller.submit("hello").await,
            Err(AssistantError::NotReady)
        );
        assert_eq!(controller.message_count().await, 0);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let controller = echo_controller();
        assert_eq!(controller.initialize().await, ProviderStatus::Ready);
        assert_eq!(controller.initialize().await, ProviderStatus::Ready);
    }

    #[tokio::test]
    async fn test_open_close_do_not_touch_conversation() {
        let controller = echo_controller();
        controller.initialize().await;
        controller.submit("hi").await.unwrap();

        controller.open().await;
        assert!(controller.is_open().await);
        controller.close().await;
        assert!(!controller.is_open().await);
        assert!(controller.toggle().await);
        assert_eq!(controller.message_count().await, 2);
    }

    #[tokio::test]
    async fn test_pending_released_after_submit() {
        let controller = echo_controller();
        controller.initialize().await;
        controller.submit("hi").await.unwrap();
        assert!(!controller.is_pending());
        assert!(!controller.snapshot().await.pending);
    }

    #[tokio::test]
    async fn test_events_emitted_for_turn() {
        let controller = echo_controller();
        controller.initialize().await;
        let mut events = controller.subscribe();

        controller.submit("hi").await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = events.try_recv() {
            kinds.push(match event {
                AssistantEvent::PendingChanged { pending } => format!("pending:{}", pending),
                AssistantEvent::MessageAppended { message } => {
                    format!("message:{}", message.sender().as_str())
                }
                other => format!("{:?}", other),
            });
        }
        assert_eq!(
            kinds,
            vec![
                "pending:true",
                "message:user",
                "message:assistant",
                "pending:false"
            ]
        );
    }
}
