//! Main egui application. Composes the panels and dispatches user intent
//! to the selection controller.

use std::future::Future;
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

use docchat_core::event_bus::EventBus;
use docchat_core::gate::GateState;
use docchat_core::ports::SessionApiPort;
use docchat_core::selection::SelectionController;
use docchat_platform::browser;
use docchat_platform::HttpSessionApi;
use docchat_types::{config::ClientConfig, event::ClientEvent, route::Route, Result};
use docchat_ui::panels::{chat, sidebar, upload};
use docchat_ui::state::{UiIntent, UiState};
use docchat_ui::theme;

/// The main application state
pub struct DocChatApp {
    ui_state: UiState,
    config: ClientConfig,
    event_bus: EventBus,
    controller: Rc<SelectionController>,
    /// Route last applied to the controller
    route: Route,
    ctx: egui::Context,
    first_frame: bool,
}

impl DocChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ClientConfig) -> Self {
        let event_bus = EventBus::new();
        let api: Rc<dyn SessionApiPort> = Rc::new(HttpSessionApi::new(&config));
        log::info!("Session API at {}", api.api_base());
        let controller = Rc::new(SelectionController::assemble(
            api.clone(),
            &config,
            event_bus.clone(),
        ));

        let app = Self {
            ui_state: UiState::new(),
            config,
            event_bus,
            controller,
            route: browser::current_route(),
            ctx: cc.egui_ctx.clone(),
            first_frame: true,
        };

        app.spawn("Health check", async move { api.health().await });
        let controller = app.controller.clone();
        let route = app.route.clone();
        app.spawn("Initial load", async move {
            controller.open(&route).await.map(|_| ())
        });

        app
    }

    /// Run a core operation; failures are logged and surfaced to the UI.
    fn spawn(&self, label: &'static str, op: impl Future<Output = Result<()>> + 'static) {
        let event_bus = self.event_bus.clone();
        let ctx = self.ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = op.await {
                log::error!("{} failed: {}", label, e);
                event_bus.emit(ClientEvent::Error {
                    message: e.to_string(),
                });
            }
            ctx.request_repaint();
        });
    }

    fn dispatch(&mut self, intent: UiIntent) {
        let controller = self.controller.clone();
        match intent {
            UiIntent::NewChat => self.spawn("New chat", async move {
                controller.start_new_conversation().await.map(|_| ())
            }),
            UiIntent::Select(session_id) => {
                self.follow(Route::chat(&session_id));
                self.spawn("Select", async move {
                    controller.select(&session_id).await.map(|_| ())
                });
            }
            UiIntent::Delete(session_id) => self.spawn("Delete", async move {
                controller.delete_session(&session_id).await.map(|_| ())
            }),
            UiIntent::Send(text) => self.spawn("Send", async move {
                controller.send(&text).await.map(|_| ())
            }),
            UiIntent::Retry(correlation) => self.spawn("Retry", async move {
                controller.retry(correlation).await.map(|_| ())
            }),
            UiIntent::Upload(file) => self.spawn("Upload", async move {
                controller.upload(file).await.map(|_| ())
            }),
        }
    }

    /// Reflect `route` in the address bar.
    fn follow(&mut self, route: Route) {
        if let Err(e) = browser::push_route(&route) {
            log::warn!("Could not update location: {}", e);
        }
        self.route = route;
    }

    /// Back/forward navigation changes the location without telling us.
    fn sync_with_location(&mut self) {
        let location = browser::current_route();
        if location != self.route {
            log::debug!("Location changed to {}", location.path());
            self.route = location.clone();
            let controller = self.controller.clone();
            self.spawn("Navigate", async move {
                controller.navigate(&location).await.map(|_| ())
            });
        }
    }
}

impl eframe::App for DocChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        if self.event_bus.has_pending() {
            let events = self.event_bus.drain();
            for event in &events {
                if let ClientEvent::Navigate { route } = event {
                    self.follow(route.clone());
                }
            }
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        self.sync_with_location();

        if self.ui_state.is_busy() {
            ctx.request_repaint();
        }

        let mut intent = None;

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("DocChat")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(&self.config.api_base)
                        .color(theme::TEXT_SECONDARY)
                        .small(),
                );
            });
        });

        // ── Error banner ─────────────────────────────────────
        if let Some(error) = self.ui_state.error.clone() {
            TopBottomPanel::bottom("error_banner").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&error).color(theme::ERROR));
                    if ui.small_button("Dismiss").clicked() {
                        self.ui_state.dismiss_error();
                    }
                });
            });
        }

        // ── Session directory ────────────────────────────────
        SidePanel::left("sessions")
            .min_width(220.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                if let Some(i) = sidebar::sidebar_panel(ui, &self.ui_state) {
                    intent = Some(i);
                }
            });

        // ── Main content ─────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            let has_selection = self.ui_state.active.is_some();
            let shown = match (has_selection, self.ui_state.gate_state()) {
                (false, _) => entry_view(ui),
                (true, Some(GateState::Ready)) => chat::chat_panel(ui, &mut self.ui_state),
                (true, Some(GateState::AwaitingUpload)) => {
                    upload::upload_panel(ui, &self.ui_state, &self.config.accepted_documents)
                }
                (true, None) => {
                    ui.centered_and_justified(|ui| ui.spinner());
                    None
                }
            };
            if shown.is_some() {
                intent = shown;
            }
        });

        if let Some(intent) = intent {
            self.dispatch(intent);
        }
    }
}

/// Nothing selected: invite the user to start.
fn entry_view(ui: &mut egui::Ui) -> Option<UiIntent> {
    let mut intent = None;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading(RichText::new("Chat with your documents").color(theme::TEXT_PRIMARY));
        ui.label(
            RichText::new("Upload a PDF, Word, Excel or CSV file and ask questions about it.")
                .color(theme::TEXT_SECONDARY),
        );
        ui.add_space(12.0);
        if ui.button("Start a new chat").clicked() {
            intent = Some(UiIntent::NewChat);
        }
    });
    intent
}
