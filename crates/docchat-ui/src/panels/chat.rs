//! Chat panel: displays the active conversation and the question input.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};

use docchat_types::message::{DeliveryStatus, Message, Role};

use crate::state::{UiIntent, UiState};
use crate::theme::*;

/// Render the chat panel. Returns an intent when the user sends or retries.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<UiIntent> {
    let mut intent = None;
    let title = state
        .active_session()
        .map(|s| s.display_title().to_string())
        .unwrap_or_default();

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new(&title).color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.is_busy() { WARNING } else { SUCCESS };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                    });
                });

                ui.separator();

                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if state.messages.is_empty() {
                            ui.label(
                                RichText::new("Ask anything about your document.")
                                    .color(TEXT_SECONDARY)
                                    .italics(),
                            );
                        }
                        for message in &state.messages {
                            if let Some(retry) = render_message(ui, message, state.sending) {
                                intent = Some(retry);
                            }
                            ui.add_space(4.0);
                        }
                        if state.sending {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label(RichText::new("Thinking...").color(TEXT_SECONDARY).small());
                            });
                        }
                    });

                ui.add_space(8.0);

                // Input area
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text("Ask a question...")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));
                    let response = ui.add(input);

                    let send_enabled = state.can_send();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if (enter && send_enabled) || send_btn.clicked() {
                        let text = state.input_text.trim().to_string();
                        state.input_text.clear();
                        intent = Some(UiIntent::Send(text));
                        response.request_focus();
                    }
                });
            });
        });

    intent
}

fn render_message(ui: &mut egui::Ui, message: &Message, sending: bool) -> Option<UiIntent> {
    let mut intent = None;
    let (label, label_color, bg) = match (message.role, message.status) {
        (_, DeliveryStatus::Failed) => ("You · not sent", ERROR, ERROR_BG),
        (Role::User, DeliveryStatus::Pending) => ("You · sending", TEXT_SECONDARY, USER_BUBBLE),
        (Role::User, _) => ("You", ACCENT, USER_BUBBLE),
        (Role::Assistant, _) => ("Assistant", SUCCESS, BG_SECONDARY),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(label).color(label_color).strong().small());
            ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
            if let Some(correlation) = message.correlation_id().filter(|_| message.is_failed()) {
                if ui.add_enabled(!sending, egui::Button::new("Retry")).clicked() {
                    intent = Some(UiIntent::Retry(correlation));
                }
            }
        });

    intent
}
