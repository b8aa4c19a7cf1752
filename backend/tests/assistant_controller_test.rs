//! Integration tests for the assistant controller
//!
//! These tests drive a full session against scripted providers:
//! 1. Successful turns and conversation growth
//! 2. Local rejections (empty input, concurrent submit, not ready)
//! 3. Degradation and fallback for the rest of the session
//! 4. Content-policy refusals that keep the session ready

use async_trait::async_trait;
use skillsense_backend::assistant::{
    AssistantController, AssistantError, ProviderError, ProviderStatus, ResponseProvider, Sender,
    REFUSAL_MESSAGE,
};
use skillsense_backend::config::AssistantConfig;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Provider that replays queued outcomes and records every prompt
struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
    probe_result: Result<(), ProviderError>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    fn new(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            probe_result: Ok(()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
            delay: None,
        }
    }

    fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string()); 16])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ResponseProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("default reply".to_string()))
    }

    async fn probe(&self) -> Result<(), ProviderError> {
        self.probe_result.clone()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn controller_with(provider: Arc<ScriptedProvider>) -> AssistantController {
    AssistantController::new(Some(provider as Arc<dyn ResponseProvider>))
}

async fn ready_controller(provider: Arc<ScriptedProvider>) -> Arc<AssistantController> {
    let controller = Arc::new(controller_with(provider));
    assert_eq!(controller.initialize().await, ProviderStatus::Ready);
    controller
}

#[tokio::test]
async fn test_submit_appends_user_then_assistant() {
    let provider = Arc::new(ScriptedProvider::replying("Add metrics to every project bullet."));
    let controller = ready_controller(provider.clone()).await;

    let reply = controller.submit("How to improve resume?").await.unwrap();

    assert_eq!(reply.text(), "Add metrics to every project bullet.");
    let messages = controller.recent(10).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender(), Sender::User);
    assert_eq!(messages[0].text(), "How to improve resume?");
    assert_eq!(messages[1].sender(), Sender::Assistant);
    assert!(!controller.is_pending());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_each_turn_grows_conversation_by_two() {
    let provider = Arc::new(ScriptedProvider::replying("ok"));
    let controller = ready_controller(provider).await;

    for (i, text) in ["first", "second", "third"].iter().enumerate() {
        controller.submit(text).await.unwrap();
        assert_eq!(controller.message_count().await, (i + 1) * 2);
        assert!(!controller.is_pending());
    }
}

#[tokio::test]
async fn test_empty_and_whitespace_input_rejected() {
    let provider = Arc::new(ScriptedProvider::replying("ok"));
    let controller = ready_controller(provider.clone()).await;

    for text in ["", "   ", "\n\t  "] {
        assert_eq!(controller.submit(text).await, Err(AssistantError::EmptyInput));
    }
    assert_eq!(controller.message_count().await, 0);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_missing_credential_degrades_and_falls_back() {
    let controller = Arc::new(AssistantController::from_config(&AssistantConfig::default()));
    assert_eq!(controller.initialize().await, ProviderStatus::Degraded);

    let reply = controller.submit("How to improve resume?").await.unwrap();

    assert!(controller.fallback().contains(reply.text()));
    assert_eq!(controller.message_count().await, 2);
    assert_eq!(controller.status().await, ProviderStatus::Degraded);
}

#[tokio::test]
async fn test_failed_probe_degrades() {
    let provider = Arc::new(ScriptedProvider {
        probe_result: Err(ProviderError::invalid_credential("bad key")),
        ..ScriptedProvider::replying("never used")
    });
    let controller = Arc::new(controller_with(provider.clone()));
    assert_eq!(controller.initialize().await, ProviderStatus::Degraded);

    let reply = controller.submit("hello").await.unwrap();
    assert!(controller.fallback().contains(reply.text()));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_unavailable_degrades_for_rest_of_session() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok("first answer".to_string()),
        Err(ProviderError::unavailable("quota exceeded")),
        Ok("never served".to_string()),
    ]));
    let controller = ready_controller(provider.clone()).await;

    assert_eq!(controller.submit("one").await.unwrap().text(), "first answer");

    let second = controller.submit("two").await.unwrap();
    assert!(controller.fallback().contains(second.text()));
    assert_eq!(controller.status().await, ProviderStatus::Degraded);
    assert_eq!(provider.calls(), 2);

    for text in ["three", "four", "five"] {
        let reply = controller.submit(text).await.unwrap();
        assert!(controller.fallback().contains(reply.text()));
    }
    assert_eq!(provider.calls(), 2, "no provider call once degraded");
    assert_eq!(controller.message_count().await, 10);
}

#[tokio::test]
async fn test_invalid_credential_degrades() {
    let provider = Arc::new(ScriptedProvider::new(vec![Err(
        ProviderError::invalid_credential("revoked"),
    )]));
    let controller = ready_controller(provider.clone()).await;

    let reply = controller.submit("hi").await.unwrap();
    assert!(controller.fallback().contains(reply.text()));
    assert_eq!(controller.status().await, ProviderStatus::Degraded);

    controller.submit("again").await.unwrap();
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_fallback_replies_rotate() {
    let controller = Arc::new(AssistantController::from_config(&AssistantConfig::default()));
    controller.initialize().await;

    let first = controller.submit("a").await.unwrap();
    let second = controller.submit("b").await.unwrap();
    let responses = controller.fallback().responses();
    assert_eq!(first.text(), responses[0]);
    assert_eq!(second.text(), responses[1]);
}

#[tokio::test]
async fn test_content_policy_rejection_keeps_status() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Err(ProviderError::content_policy("blocked: SAFETY")),
        Ok("back to careers".to_string()),
    ]));
    let controller = ready_controller(provider.clone()).await;

    let reply = controller.submit("X").await.unwrap();
    assert_eq!(reply.text(), REFUSAL_MESSAGE);
    assert_eq!(controller.status().await, ProviderStatus::Ready);
    assert_eq!(controller.message_count().await, 2);

    let next = controller.submit("What about data science?").await.unwrap();
    assert_eq!(next.text(), "back to careers");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_submit_rejected() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(ScriptedProvider {
        gate: Some(gate.clone()),
        ..ScriptedProvider::replying("slow answer")
    });
    let controller = ready_controller(provider.clone()).await;

    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit("first").await })
    };
    while !controller.is_pending() || provider.calls() == 0 {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        controller.submit("second").await,
        Err(AssistantError::ConcurrentSubmitRejected)
    );

    gate.notify_one();
    let reply = first.await.unwrap().unwrap();
    assert_eq!(reply.text(), "slow answer");

    let messages = controller.recent(10).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text(), "first");
    assert!(!controller.is_pending());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_slow_provider_times_out_as_unavailable() {
    let provider = Arc::new(ScriptedProvider {
        delay: Some(Duration::from_millis(500)),
        ..ScriptedProvider::replying("too late")
    });
    let controller = controller_with(provider.clone()).with_timeout(Duration::from_millis(50));
    let controller = Arc::new(controller);
    controller.initialize().await;

    let reply = controller.submit("hello").await.unwrap();
    assert!(controller.fallback().contains(reply.text()));
    assert_eq!(controller.status().await, ProviderStatus::Degraded);
}

#[tokio::test]
async fn test_prompt_embeds_windowed_history() {
    let provider = Arc::new(ScriptedProvider::replying("noted"));
    let controller = Arc::new(controller_with(provider.clone()).with_history_window(2));
    controller.initialize().await;

    controller.submit("older question").await.unwrap();
    controller.submit("recent question").await.unwrap();
    controller.submit("newest question").await.unwrap();

    let prompt = provider.last_prompt();
    assert!(prompt.contains("Student: recent question"));
    assert!(prompt.contains("Counselor: noted"));
    assert!(!prompt.contains("older question"));
    assert!(prompt.contains("Student: newest question"));
}

#[tokio::test]
async fn test_clear_empties_but_keeps_status() {
    let provider = Arc::new(ScriptedProvider::replying("ok"));
    let controller = ready_controller(provider).await;
    controller.submit("hi").await.unwrap();

    controller.clear().await;

    for n in [0, 1, 8, 50] {
        assert!(controller.recent(n).await.is_empty());
    }
    assert_eq!(controller.status().await, ProviderStatus::Ready);
}

#[tokio::test]
async fn test_close_does_not_cancel_pending_reply() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(ScriptedProvider {
        gate: Some(gate.clone()),
        ..ScriptedProvider::replying("arrived while closed")
    });
    let controller = ready_controller(provider.clone()).await;
    controller.open().await;

    let turn = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit("question").await })
    };
    while provider.calls() == 0 {
        tokio::task::yield_now().await;
    }
    controller.close().await;
    gate.notify_one();
    turn.await.unwrap().unwrap();

    controller.open().await;
    let snapshot = controller.snapshot().await;
    assert!(snapshot.visible);
    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.messages[1].text(), "arrived while closed");
}

#[tokio::test]
async fn test_clear_during_pending_discards_stale_reply() {
    let gate = Arc::new(Notify::new());
    let provider = Arc::new(ScriptedProvider {
        gate: Some(gate.clone()),
        ..ScriptedProvider::replying("stale")
    });
    let controller = ready_controller(provider.clone()).await;

    let turn = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit("question").await })
    };
    while provider.calls() == 0 {
        tokio::task::yield_now().await;
    }
    controller.clear().await;
    gate.notify_one();
    turn.await.unwrap().unwrap();

    assert_eq!(controller.message_count().await, 0);
    assert!(!controller.is_pending());
}

#[tokio::test]
async fn test_dropped_submit_still_completes_turn() {
    let provider = Arc::new(ScriptedProvider {
        delay: Some(Duration::from_millis(200)),
        ..ScriptedProvider::replying("late answer")
    });
    let controller = ready_controller(provider.clone()).await;

    let dropped = tokio::time::timeout(Duration::from_millis(20), controller.submit("first")).await;
    assert!(dropped.is_err());
    assert!(controller.is_pending());

    while controller.is_pending() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    controller.submit("second").await.unwrap();

    let senders: Vec<Sender> = controller
        .recent(10)
        .await
        .iter()
        .map(|m| m.sender())
        .collect();
    assert_eq!(
        senders,
        vec![Sender::User, Sender::Assistant, Sender::User, Sender::Assistant]
    );
    let messages = controller.recent(10).await;
    assert_eq!(messages[0].text(), "first");
    assert_eq!(messages[1].text(), "late answer");
    assert_eq!(provider.calls(), 2);
}
