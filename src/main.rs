mod calc;
mod chart;
mod config;
mod export;
mod ipc;
mod roster;
mod session;
mod shell;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Env var holding the log filter; logs go to stderr since stdout carries responses.
const LOG_ENV: &str = "ATTENDANCED_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let fixtures = config::Fixtures::from_env()?;
    let fixtures_path = std::env::var_os(config::FIXTURES_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        students = fixtures.roster.len(),
        classes = fixtures.class_book.len(),
        "attendanced ready"
    );
    let mut state = ipc::AppState::new(fixtures, fixtures_path);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                writeln!(stdout, "{}", resp)?;
                stdout.flush()?;
                continue;
            }
        };

        tracing::debug!(id = %req.id, method = %req.method, "request");
        let resp = ipc::handle_request(&mut state, req);
        writeln!(stdout, "{}", resp)?;
        stdout.flush()?;
    }
    Ok(())
}
