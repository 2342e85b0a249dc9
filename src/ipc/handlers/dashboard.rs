use crate::ipc::helpers::{respond, screen_not_active};
use crate::ipc::types::{AppState, Request};
use crate::shell::{Route, Screen};

use super::view;

fn handle_dashboard_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    if !matches!(state.shell.screen(), Screen::Dashboard) {
        return screen_not_active(Route::Dashboard.as_str()).response(&req.id);
    }
    respond(&req.id, Ok(view::dashboard_view(state)))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.open" => Some(handle_dashboard_open(state, req)),
        _ => None,
    }
}
