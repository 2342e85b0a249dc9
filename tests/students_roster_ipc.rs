mod test_support;

use serde_json::json;
use test_support::{login, open_screen, request_err, request_ok, spawn_sidecar};

fn names(result: &serde_json::Value) -> Vec<String> {
    result["students"]
        .as_array()
        .expect("students")
        .iter()
        .map(|s| s["name"].as_str().expect("name").to_string())
        .collect()
}

#[test]
fn list_filters_by_query_and_class_in_roster_order() {
    let mut sc = spawn_sidecar();
    login(&mut sc);
    let view = open_screen(&mut sc, "StudentsScreen");
    assert_eq!(names(&view).len(), 6);
    assert_eq!(view["classes"][0], json!("All"));

    let by_name = request_ok(&mut sc, "1", "students.list", json!({ "query": "JOHN" }));
    assert_eq!(names(&by_name), vec!["John Doe", "Mike Johnson"]);

    let by_roll = request_ok(&mut sc, "2", "students.list", json!({ "query": "005" }));
    assert_eq!(names(&by_roll), vec!["David Brown"]);

    let by_class = request_ok(
        &mut sc,
        "3",
        "students.list",
        json!({ "query": "", "classFilter": "10A" }),
    );
    assert_eq!(names(&by_class), vec!["John Doe", "Jane Smith", "Emily Davis"]);

    // The filter sticks until changed.
    let still = request_ok(&mut sc, "4", "students.list", json!({ "query": "a" }));
    assert_eq!(names(&still), vec!["Jane Smith", "Emily Davis"]);

    let all = request_ok(
        &mut sc,
        "5",
        "students.list",
        json!({ "query": "", "classFilter": "All Classes" }),
    );
    assert_eq!(all["students"].as_array().map(|a| a.len()), Some(6));
}

#[test]
fn rows_carry_attendance_band() {
    let mut sc = spawn_sidecar();
    login(&mut sc);
    let view = open_screen(&mut sc, "StudentsScreen");
    let rows = view["students"].as_array().expect("rows");
    let band = |name: &str| {
        rows.iter()
            .find(|r| r["name"] == json!(name))
            .map(|r| r["band"]["label"].clone())
            .expect("row")
    };
    assert_eq!(band("Sarah Wilson"), json!("Excellent"));
    assert_eq!(band("Mike Johnson"), json!("Good"));
    assert_eq!(band("David Brown"), json!("Poor"));
    assert_eq!(rows[4]["band"]["color"], json!("red"));
}

#[test]
fn create_and_update_live_until_screen_remounts() {
    let mut sc = spawn_sidecar();
    login(&mut sc);
    let _ = open_screen(&mut sc, "StudentsScreen");

    let created = request_ok(
        &mut sc,
        "1",
        "students.create",
        json!({ "name": "Ava Green", "rollNo": "007", "class": "8A", "attendancePercent": 91 }),
    );
    assert_eq!(created["student"]["id"], json!(7));
    assert_eq!(created["student"]["band"]["label"], json!("Excellent"));

    let updated = request_ok(
        &mut sc,
        "2",
        "students.update",
        json!({ "id": 7, "attendancePercent": 70 }),
    );
    assert_eq!(updated["student"]["name"], json!("Ava Green"));
    assert_eq!(updated["student"]["attendancePercent"], json!(70));

    let listed = request_ok(&mut sc, "3", "students.list", json!({ "classFilter": "8A" }));
    assert_eq!(listed["students"].as_array().map(|a| a.len()), Some(1));

    assert_eq!(
        request_err(&mut sc, "4", "students.update", json!({ "id": 70, "name": "X" })),
        "not_found"
    );
    assert_eq!(
        request_err(&mut sc, "5", "students.create", json!({ "name": " ", "class": "8A" })),
        "bad_params"
    );
    assert_eq!(
        request_err(
            &mut sc,
            "6",
            "students.create",
            json!({ "name": "Y", "class": "8A", "attendancePercent": 140 })
        ),
        "bad_params"
    );

    let _ = open_screen(&mut sc, "DashboardScreen");
    let view = open_screen(&mut sc, "StudentsScreen");
    assert_eq!(view["total"], json!(6));
    assert_eq!(view["classFilter"], json!("All"));
}
