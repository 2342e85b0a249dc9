use serde_json::json;

use crate::calc::{self, ReportScope};
use crate::config::Fixtures;
use crate::ipc::error::HandlerErr;
use crate::ipc::types::AppState;
use crate::roster::{Student, ALL_CLASSES};
use crate::session::AttendanceSession;
use crate::shell::{Screen, StudentsScreen};

pub const APP_NAME: &str = "AttendEase";
pub const TAGLINE: &str = "Smart Attendance Management";

/// Class chips with the "no filter" entry first.
pub fn class_chips(fixtures: &Fixtures) -> Vec<String> {
    std::iter::once(ALL_CLASSES.to_string())
        .chain(fixtures.classes.iter().cloned())
        .collect()
}

pub fn student_row(s: &Student) -> serde_json::Value {
    let band: calc::BandView = calc::attendance_band(s.attendance_percent as f64).into();
    json!({
        "id": s.id,
        "name": s.name,
        "rollNo": s.roll_no,
        "class": s.class_name,
        "attendancePercent": s.attendance_percent,
        "band": band
    })
}

pub fn students_view(screen: &StudentsScreen, fixtures: &Fixtures) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = screen
        .roster
        .filter(&screen.query, &screen.class_filter)
        .into_iter()
        .map(student_row)
        .collect();
    json!({
        "query": screen.query,
        "classFilter": screen.class_filter,
        "classes": class_chips(fixtures),
        "total": screen.roster.len(),
        "students": rows
    })
}

pub fn session_view(session: &AttendanceSession, fixtures: &Fixtures) -> serde_json::Value {
    let rows: Vec<_> = session.visible().collect();
    json!({
        "sessionId": session.id().to_string(),
        "date": session.date(),
        "classFilter": session.class_filter(),
        "classes": class_chips(fixtures),
        "rows": rows,
        "counts": session.counts()
    })
}

pub fn dashboard_view(state: &AppState) -> serde_json::Value {
    let counts = state.shell.last_session().map(|c| c.total);
    json!({
        "stats": {
            "totalStudents": state.fixtures.roster.len(),
            "presentToday": counts.map(|c| c.present).unwrap_or(0),
            "absentToday": counts.map(|c| c.absent).unwrap_or(0),
            "totalClasses": state.fixtures.classes.len()
        },
        "recentActivity": state.fixtures.recent_activity
    })
}

pub fn report_view(
    fixtures: &Fixtures,
    scope: &ReportScope,
) -> Result<serde_json::Value, HandlerErr> {
    let model = calc::build_report(
        &fixtures.class_book,
        &fixtures.trend,
        &fixtures.distribution,
        scope,
    )?;
    let scopes: Vec<String> = std::iter::once("all".to_string())
        .chain(fixtures.class_book.iter().map(|c| c.name.clone()))
        .collect();
    Ok(json!({
        "selectedScope": scope.label(),
        "scopes": scopes,
        "report": model
    }))
}

pub fn screen_view(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(match state.shell.screen() {
        Screen::Splash => json!({ "appName": APP_NAME, "tagline": TAGLINE }),
        Screen::Login => json!({ "appName": APP_NAME }),
        Screen::Dashboard => dashboard_view(state),
        Screen::Students(screen) => students_view(screen, &state.fixtures),
        Screen::MarkAttendance(session) => session_view(session, &state.fixtures),
        Screen::Reports(screen) => report_view(&state.fixtures, &screen.scope)?,
    })
}
