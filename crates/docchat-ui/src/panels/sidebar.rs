//! Sidebar: session directory with new/select/delete controls.

use egui::{self, RichText, ScrollArea, Vec2};

use crate::state::{UiIntent, UiState};
use crate::theme::*;

/// Render the session list. Returns the intent the user expressed, if any.
pub fn sidebar_panel(ui: &mut egui::Ui, state: &UiState) -> Option<UiIntent> {
    let mut intent = None;

    egui::Frame::default()
        .fill(BG_SIDEBAR)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            let new_chat = egui::Button::new(RichText::new("+ New Chat").color(TEXT_PRIMARY))
                .fill(ACCENT)
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(ui.available_width(), 32.0));
            if ui.add(new_chat).clicked() {
                intent = Some(UiIntent::NewChat);
            }

            ui.add_space(8.0);
            ui.label(RichText::new("Recent").color(TEXT_SECONDARY).small());
            ui.separator();

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if state.sessions.is_empty() {
                        ui.label(RichText::new("No conversations yet").color(TEXT_SECONDARY).italics());
                    }
                    for session in &state.sessions {
                        let selected = state.active.as_deref() == Some(session.id.as_str());
                        ui.horizontal(|ui| {
                            let icon = if session.has_document() { "📄" } else { "💬" };
                            let label = RichText::new(format!("{} {}", icon, session.display_title()))
                                .color(if selected { TEXT_PRIMARY } else { TEXT_SECONDARY });
                            let row = ui
                                .selectable_label(selected, label)
                                .on_hover_text(session.created_at.format("%Y-%m-%d %H:%M").to_string());
                            if row.clicked() && !selected {
                                intent = Some(UiIntent::Select(session.id.clone()));
                            }
                            if ui
                                .small_button(RichText::new("🗑").color(ERROR))
                                .on_hover_text("Delete conversation")
                                .clicked()
                            {
                                intent = Some(UiIntent::Delete(session.id.clone()));
                            }
                        });
                    }
                });
        });

    intent
}
