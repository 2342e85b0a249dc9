mod test_support;

use serde_json::json;
use test_support::{open_screen, request_err, request_ok, spawn_sidecar};

#[test]
fn login_requires_both_fields_and_lands_on_dashboard() {
    let mut sc = spawn_sidecar();

    let code = request_err(
        &mut sc,
        "1",
        "auth.login",
        json!({ "email": "staff@school.test", "password": "" }),
    );
    assert_eq!(code, "bad_params");
    let code = request_err(&mut sc, "2", "auth.login", json!({ "password": "x" }));
    assert_eq!(code, "bad_params");

    let current = request_ok(&mut sc, "3", "nav.current", json!({}));
    assert_eq!(current["loggedIn"], json!(false));

    let login = request_ok(
        &mut sc,
        "4",
        "auth.login",
        json!({ "email": "staff@school.test", "password": "secret" }),
    );
    assert_eq!(login["route"], json!("DashboardScreen"));
    assert_eq!(login["view"]["stats"]["totalStudents"], json!(6));
    assert_eq!(login["view"]["stats"]["totalClasses"], json!(6));
    assert_eq!(login["view"]["stats"]["presentToday"], json!(0));
    assert_eq!(
        login["view"]["recentActivity"].as_array().map(|a| a.len()),
        Some(4)
    );
}

#[test]
fn app_screens_are_gated_until_login() {
    let mut sc = spawn_sidecar();

    let view = open_screen(&mut sc, "SplashScreen");
    assert_eq!(view["appName"], json!("AttendEase"));
    let code = request_err(&mut sc, "1", "nav.navigate", json!({ "route": "StudentsScreen" }));
    assert_eq!(code, "not_logged_in");
    let code = request_err(&mut sc, "2", "nav.navigate", json!({ "route": "Settings" }));
    assert_eq!(code, "unknown_route");
    let _ = open_screen(&mut sc, "LoginScreen");

    let _ = request_ok(
        &mut sc,
        "3",
        "auth.login",
        json!({ "email": "a@b.c", "password": "d" }),
    );
    let _ = open_screen(&mut sc, "StudentsScreen");

    let out = request_ok(&mut sc, "4", "auth.logout", json!({}));
    assert_eq!(out["route"], json!("LoginScreen"));
    let code = request_err(&mut sc, "5", "nav.navigate", json!({ "route": "ReportsAnalytics" }));
    assert_eq!(code, "not_logged_in");
}

#[test]
fn screen_methods_need_their_screen_mounted() {
    let mut sc = spawn_sidecar();
    let _ = request_ok(
        &mut sc,
        "1",
        "auth.login",
        json!({ "email": "a@b.c", "password": "d" }),
    );
    for (i, method) in ["students.list", "attendance.open", "reports.open"]
        .into_iter()
        .enumerate()
    {
        let code = request_err(&mut sc, &format!("s{}", i), method, json!({}));
        assert_eq!(code, "screen_not_active", "{}", method);
    }
    let _ = open_screen(&mut sc, "StudentsScreen");
    let code = request_err(&mut sc, "d", "dashboard.open", json!({}));
    assert_eq!(code, "screen_not_active");
}
