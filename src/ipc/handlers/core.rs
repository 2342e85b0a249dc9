use crate::config::Fixtures;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "route": state.shell.route().as_str(),
            "loggedIn": state.shell.logged_in(),
            "fixturesPath": state.fixtures_path.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_config_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    match Fixtures::load(&path) {
        Ok(fixtures) => {
            tracing::info!(path = %path.display(), "fixtures loaded");
            let summary = json!({
                "fixturesPath": path.to_string_lossy(),
                "classes": fixtures.classes.len(),
                "students": fixtures.roster.len(),
                "reportClasses": fixtures.class_book.len()
            });
            state.fixtures = fixtures;
            state.fixtures_path = Some(path);
            ok(&req.id, summary)
        }
        Err(e) => {
            tracing::warn!(error = %e, "fixture load failed");
            err(&req.id, "config_load_failed", e.to_string(), None)
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "config.load" => Some(handle_config_load(state, req)),
        _ => None,
    }
}
