//! ReelShelf RPC server: the JSON API over stdin/stdout for scripting.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "action":"addVideo", "params":{"url":"...","title":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"...", "status":400}

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use serde_json::{json, Value};

use reelshelf::api_handler::{dispatch, parse_request};
use reelshelf::app::{App, AppState};
use reelshelf::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

fn write_line(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn run() -> Result<(), String> {
    let settings = SettingsEngine::from_env().load().map_err(|e| e.to_string())?;
    let app = App::new(settings).map_err(|e| e.to_string())?;
    let state = AppState::new(app).map_err(|e| e.to_string())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_line(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))
        .map_err(|e| e.to_string())?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let err = json!({"id": null, "error": format!("parse error: {}", e), "status": 400});
                write_line(&mut out, &err).map_err(|e| e.to_string())?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let action = req.get("action").and_then(Value::as_str);
        let params = req.get("params").cloned().unwrap_or(Value::Null);

        let result = match parse_request(action, &params) {
            Ok(request) => runtime.block_on(dispatch(&state, request)),
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err.to_string(), "status": err.status_code()}),
        };
        write_line(&mut out, &response).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    reelshelf::init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "reelshelf-rpc exited with an error");
            ExitCode::FAILURE
        }
    }
}
