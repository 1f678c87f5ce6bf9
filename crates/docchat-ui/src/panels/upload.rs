//! Upload gate: shown while the active session has no document.

use egui::{self, RichText};

use docchat_types::document::{DocumentKind, UploadFile};

use crate::state::{UiIntent, UiState};
use crate::theme::*;

/// Render the gate. Returns `Upload` when a file was dropped onto the page.
pub fn upload_panel(ui: &mut egui::Ui, state: &UiState, accepted: &[DocumentKind]) -> Option<UiIntent> {
    let dropped = if state.uploading.is_none() {
        take_dropped_file(ui.ctx())
    } else {
        None
    };
    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.heading(RichText::new("Upload a document to start").color(TEXT_PRIMARY).strong());
                ui.add_space(8.0);

                match &state.uploading {
                    Some(file_name) => {
                        ui.spinner();
                        ui.label(
                            RichText::new(format!("Processing {}...", file_name)).color(WARNING),
                        );
                        ui.label(
                            RichText::new("Large documents can take a few minutes.")
                                .color(TEXT_SECONDARY)
                                .small(),
                        );
                    }
                    None => {
                        let color = if hovering { ACCENT } else { TEXT_SECONDARY };
                        egui::Frame::default()
                            .stroke(egui::Stroke::new(1.5, color))
                            .corner_radius(PANEL_ROUNDING)
                            .inner_margin(24.0)
                            .show(ui, |ui| {
                                ui.label(RichText::new("Drop a file here").color(color));
                                let labels: Vec<&str> = accepted.iter().map(|k| k.label()).collect();
                                ui.label(
                                    RichText::new(format!("Supported: {}", labels.join(", ")))
                                        .color(TEXT_SECONDARY)
                                        .small(),
                                );
                            });
                    }
                }
            });
        });

    dropped.map(UiIntent::Upload)
}

/// First dropped file that carries its bytes (always the case on the web).
fn take_dropped_file(ctx: &egui::Context) -> Option<UploadFile> {
    let files = ctx.input(|i| i.raw.dropped_files.clone());
    if files.len() > 1 {
        log::warn!("{} files dropped, uploading only the first", files.len());
    }
    files.into_iter().find_map(|file| {
        let bytes = file.bytes?;
        let media_type = Some(file.mime).filter(|m| !m.is_empty());
        Some(UploadFile::new(file.name, media_type, bytes.to_vec()))
    })
}
