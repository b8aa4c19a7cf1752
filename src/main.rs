// SkillSense GUI - Main Entry Point
// Desktop host for the "Ask SkillSense" career-guidance chat widget

mod state;
mod ui;

use std::sync::mpsc;
use std::sync::Arc;

use eframe::egui;
use skillsense_backend::assistant::{AssistantController, AssistantError, Message};
use skillsense_backend::config::AssistantConfig;
use state::{WidgetAction, WidgetState};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use ui::render_app_layout;

type SubmitResult = Result<Message, AssistantError>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AssistantConfig::from_lookup(|key| std::env::var(key).ok());
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let assistant = Arc::new(AssistantController::from_config(&config));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SkillSense")
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([640.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SkillSense",
        options,
        Box::new(move |cc| {
            let app = SkillSenseApp::new(runtime, assistant);
            app.start(&cc.egui_ctx);
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}

/// Main application struct
/// Owns the async runtime that drives the assistant controller
struct SkillSenseApp {
    /// Local widget state (draft, notices)
    state: WidgetState,
    runtime: Runtime,
    assistant: Arc<AssistantController>,
    results_tx: mpsc::Sender<SubmitResult>,
    results_rx: mpsc::Receiver<SubmitResult>,
}

impl SkillSenseApp {
    fn new(runtime: Runtime, assistant: Arc<AssistantController>) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            state: WidgetState::new(),
            runtime,
            assistant,
            results_tx,
            results_rx,
        }
    }

    /// Probe the provider in the background and repaint on every event
    fn start(&self, ctx: &egui::Context) {
        let assistant = self.assistant.clone();
        let repaint = ctx.clone();
        self.runtime.spawn(async move {
            let status = assistant.initialize().await;
            info!(status = ?status, "Assistant initialized");
            repaint.request_repaint();
        });

        let mut events = self.assistant.subscribe();
        let repaint = ctx.clone();
        self.runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(_) => repaint.request_repaint(),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "GUI event listener lagged");
                        repaint.request_repaint();
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    fn apply(&mut self, action: WidgetAction, ctx: &egui::Context) {
        match action {
            WidgetAction::Toggle => {
                self.runtime.block_on(self.assistant.toggle());
            }
            WidgetAction::Close => self.runtime.block_on(self.assistant.close()),
            WidgetAction::Clear => {
                self.state.notice = None;
                self.runtime.block_on(self.assistant.clear());
            }
            WidgetAction::Send => {
                let Some(text) = self.state.take_draft() else {
                    return;
                };
                let assistant = self.assistant.clone();
                let tx = self.results_tx.clone();
                let repaint = ctx.clone();
                self.runtime.spawn(async move {
                    let result = assistant.submit(&text).await;
                    // Receiver only goes away with the app itself
                    let _ = tx.send(result);
                    repaint.request_repaint();
                });
            }
        }
    }
}

impl eframe::App for SkillSenseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(result) = self.results_rx.try_recv() {
            self.state.record_result(result);
        }

        let snapshot = self.runtime.block_on(self.assistant.snapshot());
        let actions = render_app_layout(ctx, &snapshot, &mut self.state);

        for action in actions {
            self.apply(action, ctx);
        }
    }
}
