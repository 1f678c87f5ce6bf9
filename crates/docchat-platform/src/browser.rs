//! Address-bar routing through the History API.

use wasm_bindgen::JsValue;

use docchat_types::{ClientError, Result, route::Route};

/// Route of the page's current path; `Entry` if the location is unreadable.
pub fn current_route() -> Route {
    gloo_utils::window()
        .location()
        .pathname()
        .map(|path| Route::parse(&path))
        .unwrap_or(Route::Entry)
}

/// Push `route` onto the history stack unless it is already current.
pub fn push_route(route: &Route) -> Result<()> {
    if current_route() == *route {
        return Ok(());
    }
    let history = gloo_utils::window().history().map_err(js_error)?;
    history
        .push_state_with_url(&JsValue::NULL, "", Some(&route.path()))
        .map_err(js_error)?;
    log::debug!("Navigated to {}", route.path());
    Ok(())
}

fn js_error(e: JsValue) -> ClientError {
    ClientError::Transport(format!("history unavailable: {:?}", e))
}
