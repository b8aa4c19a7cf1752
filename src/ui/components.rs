// Reusable UI components
// Status badge and message bubbles for the chat window

use eframe::egui;
use skillsense_backend::assistant::{Message, ProviderStatus, Sender};

const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);
const ASSISTANT_BUBBLE: egui::Color32 = egui::Color32::from_rgb(55, 65, 81);

/// Render the provider status as colored text
/// Colors: Connecting (gray), Online (green), Offline mode (yellow)
pub fn status_badge(ui: &mut egui::Ui, status: ProviderStatus) {
    let color = match status {
        ProviderStatus::Uninitialized => egui::Color32::GRAY,
        ProviderStatus::Ready => egui::Color32::from_rgb(0, 200, 0),
        ProviderStatus::Degraded => egui::Color32::from_rgb(220, 180, 0),
    };

    ui.colored_label(color, format!("● {}", status.display_name()));
}

/// Render one message as a bubble, user messages right-aligned
pub fn message_bubble(ui: &mut egui::Ui, message: &Message) {
    let (layout, fill) = match message.sender() {
        Sender::User => (egui::Layout::right_to_left(egui::Align::TOP), USER_BUBBLE),
        Sender::Assistant => (egui::Layout::left_to_right(egui::Align::TOP), ASSISTANT_BUBBLE),
    };
    let max_width = ui.available_width() * 0.8;

    ui.with_layout(layout, |ui| {
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(8.0))
            .inner_margin(egui::Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(message.text()).color(egui::Color32::WHITE));
                    ui.label(
                        egui::RichText::new(message.sent_at().format("%H:%M").to_string())
                            .size(10.0)
                            .color(egui::Color32::LIGHT_GRAY),
                    );
                });
            });
    });
}

/// Placeholder bubble shown while a reply is pending
pub fn typing_indicator(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(egui::RichText::new("SkillSense is typing...").italics());
    });
}

/// Render the primary send button
pub fn send_button(ui: &mut egui::Ui, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(egui::RichText::new("Send").strong()))
}
