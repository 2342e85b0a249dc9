use serde_json::json;

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{optional_str, required_str, respond, today};
use crate::ipc::types::{AppState, Request};

use super::view;

fn nav_navigate(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let route = required_str(params, "route")?;
    let route = state.shell.navigate(&route, &state.fixtures, &today())?;
    Ok(json!({
        "route": route.as_str(),
        "view": view::screen_view(state)?
    }))
}

fn nav_current(state: &AppState) -> serde_json::Value {
    json!({
        "route": state.shell.route().as_str(),
        "loggedIn": state.shell.logged_in()
    })
}

fn auth_login(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let email = optional_str(params, "email")?.unwrap_or_default();
    let password = optional_str(params, "password")?.unwrap_or_default();
    if let Err(e) = state.shell.login(&email, &password, &state.fixtures, &today()) {
        tracing::info!("login rejected: missing fields");
        return Err(e.into());
    }
    tracing::info!("logged in");
    Ok(json!({
        "route": state.shell.route().as_str(),
        "view": view::screen_view(state)?
    }))
}

fn auth_logout(state: &mut AppState) -> serde_json::Value {
    state.shell.logout(&state.fixtures, &today());
    nav_current(state)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "nav.navigate" => Some(respond(&req.id, nav_navigate(state, &req.params))),
        "nav.current" => Some(respond(&req.id, Ok(nav_current(state)))),
        "auth.login" => Some(respond(&req.id, auth_login(state, &req.params))),
        "auth.logout" => Some(respond(&req.id, Ok(auth_logout(state)))),
        _ => None,
    }
}
