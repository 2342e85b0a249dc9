use serde_json::json;

use crate::config::Fixtures;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    optional_str, optional_u32, required_str, required_student_id, respond, screen_not_active,
};
use crate::ipc::types::{AppState, Request};
use crate::roster::{NewStudent, StudentPatch};
use crate::shell::{Route, Screen, StudentsScreen};

use super::view;

fn students_screen(state: &mut AppState) -> Result<(&mut StudentsScreen, &Fixtures), HandlerErr> {
    match state.shell.screen_mut() {
        Screen::Students(screen) => Ok((screen, &state.fixtures)),
        _ => Err(screen_not_active(Route::Students.as_str())),
    }
}

fn students_classes(state: &AppState) -> serde_json::Value {
    json!({ "classes": view::class_chips(&state.fixtures) })
}

fn students_list(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let query = optional_str(params, "query")?;
    let class_filter = optional_str(params, "classFilter")?;
    let (screen, fixtures) = students_screen(state)?;
    if let Some(q) = query {
        screen.query = q;
    }
    if let Some(c) = class_filter {
        screen.class_filter = c;
    }
    Ok(view::students_view(screen, fixtures))
}

fn students_create(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let new = NewStudent {
        name: required_str(params, "name")?,
        roll_no: optional_str(params, "rollNo")?.unwrap_or_default(),
        class_name: required_str(params, "class")?,
        attendance_percent: optional_u32(params, "attendancePercent")?,
    };
    let (screen, _) = students_screen(state)?;
    let student = screen.roster.add(new)?;
    tracing::debug!(id = student.id, class = %student.class_name, "student added");
    Ok(json!({ "student": view::student_row(student) }))
}

fn students_update(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let id = required_student_id(params, "id")?;
    let patch = StudentPatch {
        name: optional_str(params, "name")?,
        roll_no: optional_str(params, "rollNo")?,
        class_name: optional_str(params, "class")?,
        attendance_percent: optional_u32(params, "attendancePercent")?,
    };
    let (screen, _) = students_screen(state)?;
    let student = screen.roster.update(id, patch)?;
    tracing::debug!(id, "student updated");
    Ok(json!({ "student": view::student_row(student) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.classes" => Some(respond(&req.id, Ok(students_classes(state)))),
        "students.list" => Some(respond(&req.id, students_list(state, &req.params))),
        "students.create" => Some(respond(&req.id, students_create(state, &req.params))),
        "students.update" => Some(respond(&req.id, students_update(state, &req.params))),
        _ => None,
    }
}
