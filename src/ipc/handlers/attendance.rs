use serde_json::json;

use crate::config::Fixtures;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{required_str, required_student_id, respond, screen_not_active};
use crate::ipc::types::{AppState, Request};
use crate::session::{AttendanceSession, MarkStatus};
use crate::shell::{Route, Screen};

use super::view;

fn session_mut(state: &mut AppState) -> Result<(&mut AttendanceSession, &Fixtures), HandlerErr> {
    match state.shell.screen_mut() {
        Screen::MarkAttendance(session) => Ok((session, &state.fixtures)),
        _ => Err(screen_not_active(Route::MarkAttendance.as_str())),
    }
}

fn parse_status(params: &serde_json::Value) -> Result<MarkStatus, HandlerErr> {
    let raw = required_str(params, "status")?;
    MarkStatus::parse(&raw).ok_or_else(|| {
        HandlerErr::bad_params("status must be present or absent")
            .with_details(json!({ "status": raw }))
    })
}

fn attendance_open(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let (session, fixtures) = session_mut(state)?;
    Ok(view::session_view(session, fixtures))
}

fn attendance_set_date(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = required_str(params, "date")?;
    let (session, fixtures) = session_mut(state)?;
    session.set_date(&date)?;
    tracing::debug!(date = session.date(), "session date set");
    Ok(view::session_view(session, fixtures))
}

fn attendance_set_class_filter(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let class_name = required_str(params, "className")?;
    let (session, fixtures) = session_mut(state)?;
    session.set_class_filter(&class_name);
    Ok(view::session_view(session, fixtures))
}

fn attendance_set_status(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = required_student_id(params, "studentId")?;
    let status = parse_status(params)?;
    let (session, _) = session_mut(state)?;
    let applied = session.set_status(student_id, status)?;
    if applied {
        tracing::debug!(student_id, status = status.as_str(), "attendance marked");
    } else {
        tracing::debug!(student_id, "attendance mark ignored: student not in session");
    }
    Ok(json!({
        "applied": applied,
        "studentId": student_id,
        "status": session.status_of(student_id),
        "counts": session.counts()
    }))
}

fn attendance_mark_all(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let status = parse_status(params)?;
    let (session, _) = session_mut(state)?;
    let marked = session.mark_all(status)?;
    tracing::debug!(
        marked,
        status = status.as_str(),
        class_filter = session.class_filter(),
        "bulk attendance mark"
    );
    Ok(json!({
        "marked": marked,
        "classFilter": session.class_filter(),
        "counts": session.counts()
    }))
}

fn attendance_summary(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let (session, _) = session_mut(state)?;
    Ok(json!({
        "sessionId": session.id().to_string(),
        "date": session.date(),
        "classFilter": session.class_filter(),
        "counts": session.counts()
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.open" => Some(respond(&req.id, attendance_open(state))),
        "attendance.setDate" => Some(respond(&req.id, attendance_set_date(state, &req.params))),
        "attendance.setClassFilter" => Some(respond(
            &req.id,
            attendance_set_class_filter(state, &req.params),
        )),
        "attendance.setStatus" => Some(respond(&req.id, attendance_set_status(state, &req.params))),
        "attendance.markAll" => Some(respond(&req.id, attendance_mark_all(state, &req.params))),
        "attendance.summary" => Some(respond(&req.id, attendance_summary(state))),
        _ => None,
    }
}
