// Main application layout
// Landing panel, floating launcher and the "Ask SkillSense" chat window

use eframe::egui;
use skillsense_backend::assistant::AssistantSnapshot;

use crate::state::{WidgetAction, WidgetState};
use crate::ui::components::{message_bubble, send_button, status_badge, typing_indicator};

/// Render the full application for one frame
/// Returns the actions the user triggered; the caller applies them
pub fn render_app_layout(
    ctx: &egui::Context,
    snapshot: &AssistantSnapshot,
    state: &mut WidgetState,
) -> Vec<WidgetAction> {
    let mut actions = Vec::new();

    render_menu_bar(ctx);
    render_landing(ctx);
    render_launcher(ctx, snapshot, &mut actions);

    if snapshot.visible {
        render_chat_window(ctx, snapshot, state, &mut actions);
    }

    actions
}

fn render_menu_bar(ctx: &egui::Context) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    ctx.style_mut(|style| {
                        style.visuals.dark_mode = dark_mode;
                    });
                }
            });
        });
    });
}

/// Static landing content behind the widget
fn render_landing(ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.heading(egui::RichText::new("SkillSense").size(32.0).strong());
            ui.add_space(8.0);
            ui.label(
                "Career guidance for students: skills, resumes, interviews and learning paths.",
            );
            ui.add_space(24.0);
        });

        ui.columns(3, |columns| {
            landing_card(
                &mut columns[0],
                "Explore careers",
                "Find roles that match your interests and strengths.",
            );
            landing_card(
                &mut columns[1],
                "Build skills",
                "Plan projects and courses that employers look for.",
            );
            landing_card(
                &mut columns[2],
                "Get hired",
                "Sharpen your resume and prepare for interviews.",
            );
        });

        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("Questions? Open \"Ask SkillSense\" in the corner.").weak(),
            );
        });
    });
}

fn landing_card(ui: &mut egui::Ui, title: &str, body: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_height(80.0);
        ui.label(egui::RichText::new(title).strong());
        ui.add_space(4.0);
        ui.label(body);
    });
}

/// Floating toggle button anchored to the bottom-right corner
fn render_launcher(
    ctx: &egui::Context,
    snapshot: &AssistantSnapshot,
    actions: &mut Vec<WidgetAction>,
) {
    egui::Area::new(egui::Id::new("assistant_launcher"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .show(ctx, |ui| {
            let label = if snapshot.visible {
                "✕ Close"
            } else {
                "💬 Ask SkillSense"
            };
            if ui.button(egui::RichText::new(label).strong()).clicked() {
                actions.push(WidgetAction::Toggle);
            }
        });
}

fn render_chat_window(
    ctx: &egui::Context,
    snapshot: &AssistantSnapshot,
    state: &mut WidgetState,
    actions: &mut Vec<WidgetAction>,
) {
    let mut open = true;

    egui::Window::new("Ask SkillSense")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_size([360.0, 480.0])
        .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -56.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                status_badge(ui, snapshot.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let can_clear = !snapshot.messages.is_empty();
                    if ui.add_enabled(can_clear, egui::Button::new("Clear")).clicked() {
                        actions.push(WidgetAction::Clear);
                    }
                });
            });
            ui.separator();

            render_messages(ui, snapshot);

            ui.separator();
            render_input(ui, snapshot, state, actions);
        });

    if !open {
        actions.push(WidgetAction::Close);
    }
}

fn render_messages(ui: &mut egui::Ui, snapshot: &AssistantSnapshot) {
    // Leave room for the input row below the history
    let height = (ui.available_height() - 64.0).max(120.0);

    egui::ScrollArea::vertical()
        .id_source("assistant_messages")
        .auto_shrink([false; 2])
        .max_height(height)
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if snapshot.messages.is_empty() {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(
                        "Hi! Ask me about career paths, resumes, interviews or skills.",
                    )
                    .weak(),
                );
            }

            for message in &snapshot.messages {
                ui.add_space(4.0);
                message_bubble(ui, message);
            }

            if snapshot.pending {
                ui.add_space(4.0);
                typing_indicator(ui);
            }
        });
}

fn render_input(
    ui: &mut egui::Ui,
    snapshot: &AssistantSnapshot,
    state: &mut WidgetState,
    actions: &mut Vec<WidgetAction>,
) {
    let input_enabled = state.input_enabled(snapshot);

    ui.horizontal(|ui| {
        let width = ui.available_width() - 64.0;
        let input = ui.add_enabled(
            input_enabled,
            egui::TextEdit::singleline(&mut state.draft)
                .hint_text("Type your question...")
                .desired_width(width),
        );
        let enter_pressed = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let can_send = state.can_send(snapshot);
        if send_button(ui, can_send).clicked() || (enter_pressed && can_send) {
            actions.push(WidgetAction::Send);
            input.request_focus();
        }
    });

    if let Some(notice) = &state.notice {
        ui.colored_label(egui::Color32::from_rgb(220, 0, 0), notice);
    }
}
