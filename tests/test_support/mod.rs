#![allow(dead_code)]

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub struct Sidecar {
    pub child: Child,
    pub stdin: ChildStdin,
    pub reader: BufReader<ChildStdout>,
}

impl Drop for Sidecar {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_with(fixtures: Option<&Path>) -> Sidecar {
    let exe = env!("CARGO_BIN_EXE_attendanced");
    let mut cmd = Command::new(exe);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .env_remove("ATTENDANCED_FIXTURES");
    if let Some(p) = fixtures {
        cmd.env("ATTENDANCED_FIXTURES", p);
    }
    let mut child = cmd.spawn().expect("spawn attendanced");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    Sidecar {
        child,
        stdin,
        reader: BufReader::new(stdout),
    }
}

pub fn spawn_sidecar() -> Sidecar {
    spawn_with(None)
}

pub fn spawn_sidecar_with_fixtures(path: &Path) -> Sidecar {
    spawn_with(Some(path))
}

pub fn send_line(sc: &mut Sidecar, line: &str) -> serde_json::Value {
    writeln!(sc.stdin, "{}", line).expect("write request");
    sc.stdin.flush().expect("flush request");
    let mut out = String::new();
    sc.reader.read_line(&mut out).expect("read response line");
    assert!(!out.trim().is_empty(), "empty response for {}", line);
    serde_json::from_str(out.trim()).expect("parse response json")
}

pub fn request(
    sc: &mut Sidecar,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    let value = send_line(sc, &payload.to_string());
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn request_ok(
    sc: &mut Sidecar,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(sc, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().expect("result")
}

/// Returns the error code.
pub fn request_err(sc: &mut Sidecar, id: &str, method: &str, params: serde_json::Value) -> String {
    let value = request(sc, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .expect("error code")
        .to_string()
}

pub fn login(sc: &mut Sidecar) {
    let _ = request_ok(
        sc,
        "login",
        "auth.login",
        json!({ "email": "staff@school.test", "password": "secret" }),
    );
}

pub fn open_screen(sc: &mut Sidecar, route: &str) -> serde_json::Value {
    let result = request_ok(sc, "nav", "nav.navigate", json!({ "route": route }));
    assert_eq!(result.get("route").and_then(|v| v.as_str()), Some(route));
    result.get("view").cloned().expect("view")
}
