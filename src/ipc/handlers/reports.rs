use serde_json::json;

use crate::calc::{self, ReportScope};
use crate::chart;
use crate::export;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    optional_f64, optional_str, required_i64, respond, screen_not_active, today_date,
};
use crate::ipc::types::{AppState, Request};
use crate::shell::{ReportsScreen, Route, Screen};

use super::view;

fn reports_screen(state: &mut AppState) -> Result<&mut ReportsScreen, HandlerErr> {
    match state.shell.screen_mut() {
        Screen::Reports(screen) => Ok(screen),
        _ => Err(screen_not_active(Route::Reports.as_str())),
    }
}

/// An explicit `scope` param wins over the screen's selected scope.
fn resolve_scope(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<ReportScope, HandlerErr> {
    let requested = optional_str(params, "scope")?;
    let screen = reports_screen(state)?;
    Ok(match requested {
        Some(s) => ReportScope::parse(Some(&s)),
        None => screen.scope.clone(),
    })
}

fn reports_open(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let scope = resolve_scope(state, params)?;
    let result = view::report_view(&state.fixtures, &scope)?;
    reports_screen(state)?.scope = scope;
    Ok(result)
}

fn reports_set_scope(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let Some(raw) = optional_str(params, "scope")? else {
        return Err(HandlerErr::bad_params("missing scope"));
    };
    let result = reports_open(state, params)?;
    tracing::debug!(scope = %raw.trim(), "report scope selected");
    Ok(result)
}

fn reports_low_attendance(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let scope = resolve_scope(state, params)?;
    let alerts = calc::low_attendance_alerts(&state.fixtures.class_book, &scope)?;
    Ok(json!({
        "scope": scope.label(),
        "threshold": calc::LOW_ATTENDANCE_THRESHOLD,
        "alerts": alerts
    }))
}

fn reports_student_summary(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let scope = resolve_scope(state, params)?;
    let rows = calc::student_summary(&state.fixtures.class_book, &scope)?;
    Ok(json!({
        "scope": scope.label(),
        "rows": rows
    }))
}

fn reports_classes_needed(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let total = required_i64(params, "totalClasses")?;
    let present = required_i64(params, "presentClasses")?;
    let needed = calc::classes_needed(total, present)?;
    Ok(json!({
        "totalClasses": total,
        "presentClasses": present,
        "classesNeeded": needed
    }))
}

fn reports_charts(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let scope = resolve_scope(state, params)?;
    let width = optional_f64(params, "width")?.unwrap_or(chart::DEFAULT_LINE_CHART_WIDTH);
    if width <= 40.0 {
        return Err(HandlerErr::bad_params("width must be greater than 40"));
    }
    if let ReportScope::Class(name) = &scope {
        calc::find_class(&state.fixtures.class_book, name)?;
    }
    let trend = calc::monthly_trend(&state.fixtures.trend, &scope);
    let distribution = calc::attendance_distribution(&state.fixtures.distribution, &scope);
    Ok(json!({
        "scope": scope.label(),
        "trend": chart::line_chart(&trend, width),
        "distribution": {
            "slices": chart::pie_slices(&distribution),
            "legend": distribution
        }
    }))
}

fn reports_export(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let scope = resolve_scope(state, params)?;
    match export::share_report(
        state.share.as_mut(),
        &state.fixtures.class_book,
        &scope,
        today_date(),
    ) {
        Ok(payload) => {
            tracing::info!(scope = scope.label(), rows = payload.rows, "report exported");
            Ok(json!(payload))
        }
        Err(e) => {
            tracing::error!(error = ?e, scope = scope.label(), "export error");
            Err(e.into())
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.open" => Some(respond(&req.id, reports_open(state, &req.params))),
        "reports.setScope" => Some(respond(&req.id, reports_set_scope(state, &req.params))),
        "reports.lowAttendance" => {
            Some(respond(&req.id, reports_low_attendance(state, &req.params)))
        }
        "reports.studentSummary" => {
            Some(respond(&req.id, reports_student_summary(state, &req.params)))
        }
        "reports.classesNeeded" => Some(respond(&req.id, reports_classes_needed(&req.params))),
        "reports.charts" => Some(respond(&req.id, reports_charts(state, &req.params))),
        "reports.export" => Some(respond(&req.id, reports_export(state, &req.params))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Fixtures;
    use crate::export::{ShareError, ShareText};
    use crate::ipc::handle_request;

    struct FailingShare;

    impl ShareText for FailingShare {
        fn share_text(&mut self, _content: &str, _title: &str) -> Result<(), ShareError> {
            Err(ShareError::Rejected("no share target".to_string()))
        }
    }

    fn req(id: &str, method: &str, params: serde_json::Value) -> Request {
        Request {
            id: id.to_string(),
            method: method.to_string(),
            params,
        }
    }

    fn open_reports(state: &mut AppState) {
        let r = handle_request(
            state,
            req("1", "auth.login", json!({ "email": "staff@school.test", "password": "pw" })),
        );
        assert_eq!(r["ok"], json!(true), "{r}");
        let r = handle_request(
            state,
            req("2", "nav.navigate", json!({ "route": "ReportsAnalytics" })),
        );
        assert_eq!(r["ok"], json!(true), "{r}");
    }

    #[test]
    fn share_failure_is_reported_and_screen_state_survives() {
        let mut state = AppState::with_share(Fixtures::default(), None, Box::new(FailingShare));
        open_reports(&mut state);
        let _ = handle_request(
            &mut state,
            req("3", "reports.setScope", json!({ "scope": "Class 9A" })),
        );

        let r = handle_request(&mut state, req("4", "reports.export", json!({})));
        assert_eq!(r["ok"], json!(false));
        assert_eq!(r["error"]["code"], json!("export_failed"));
        assert_eq!(r["error"]["message"], json!("Failed to export report"));

        let r = handle_request(&mut state, req("5", "reports.open", json!({})));
        assert_eq!(r["result"]["selectedScope"], json!("Class 9A"));
    }

    #[test]
    fn reports_need_the_reports_screen() {
        let mut state = AppState::new(Fixtures::default(), None);
        let r = handle_request(&mut state, req("1", "reports.open", json!({})));
        assert_eq!(r["error"]["code"], json!("screen_not_active"));

        let r = handle_request(
            &mut state,
            req("2", "reports.classesNeeded", json!({ "totalClasses": 100, "presentClasses": 68 })),
        );
        assert_eq!(r["result"]["classesNeeded"], json!(7));
    }

    #[test]
    fn charts_reject_unknown_class_and_narrow_width() {
        let mut state = AppState::new(Fixtures::default(), None);
        open_reports(&mut state);
        let r = handle_request(
            &mut state,
            req("3", "reports.charts", json!({ "scope": "Class 1Z" })),
        );
        assert_eq!(r["error"]["code"], json!("not_found"));
        let r = handle_request(&mut state, req("4", "reports.charts", json!({ "width": 10 })));
        assert_eq!(r["error"]["code"], json!("bad_params"));
        let r = handle_request(&mut state, req("5", "reports.charts", json!({})));
        assert_eq!(r["result"]["distribution"]["slices"].as_array().map(|a| a.len()), Some(6));
    }
}
