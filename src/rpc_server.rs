//! Linkcatalog RPC Server: JSON-RPC over stdin/stdout for a UI front-end.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"import.run", "params":{"batch":{...}}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr so stdout carries protocol messages only.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Mutex;

use linkcatalog::app::{init_logging, App};
use linkcatalog::rpc_handler::handle_method;
use linkcatalog::services::settings_engine::SettingsEngineTrait;

use serde_json::{json, Value};
use tracing::{error, warn};

fn respond(out: &mut impl Write, response: &Value) -> io::Result<()> {
    writeln!(out, "{}", response)?;
    out.flush()
}

fn main() -> ExitCode {
    let settings_engine = match App::load_default_settings() {
        Ok(engine) => engine,
        Err(e) => {
            init_logging("info");
            error!(error = %e, "failed to load linkcatalog settings");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings_engine.get_settings().logging.filter);

    let app = match App::open(settings_engine) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "failed to initialize linkcatalog");
            return ExitCode::FAILURE;
        }
    };
    let app = Mutex::new(app);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let ready = json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")});
    if respond(&mut out, &ready).is_err() {
        return ExitCode::FAILURE;
    }

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                let params = req.get("params").cloned().unwrap_or(json!({}));
                match handle_method(&app, method, &params) {
                    Ok(val) => json!({"id": id, "result": val}),
                    Err(err) => {
                        warn!(method, error = %err, "rpc call failed");
                        json!({"id": id, "error": err})
                    }
                }
            }
            Err(e) => json!({"id": null, "error": format!("parse error: {}", e)}),
        };

        if respond(&mut out, &response).is_err() {
            break;
        }
    }
    ExitCode::SUCCESS
}
