//! DocChat App: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the HTTP adapter and the core components and hands them to
//! the egui UI.

mod app;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use docchat_types::config::ClientConfig;

const CANVAS_ID: &str = "docchat_canvas";
const API_BASE_ATTRIBUTE: &str = "data-api-base";

/// WASM entry point, called from index.html
#[wasm_bindgen(start)]
pub async fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("DocChat WASM starting...");

    if let Err(e) = start() {
        log::error!("DocChat failed to start: {:?}", e);
    }
}

fn start() -> Result<(), JsValue> {
    let document = web_sys::window()
        .ok_or("no window")?
        .document()
        .ok_or("no document")?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or("no canvas element with id 'docchat_canvas'")?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    let config = client_config(canvas.get_attribute(API_BASE_ATTRIBUTE));
    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(app::DocChatApp::new(cc, config)))),
            )
            .await;
        if let Err(e) = started {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
    Ok(())
}

/// Defaults, with the API base optionally overridden from the canvas.
fn client_config(api_base: Option<String>) -> ClientConfig {
    let defaults = ClientConfig::default();
    let Some(api_base) = api_base.filter(|b| !b.trim().is_empty()) else {
        return defaults;
    };
    let config = defaults.clone().with_api_base(api_base);
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("Ignoring {}: {}", API_BASE_ATTRIBUTE, e);
            defaults
        }
    }
}
