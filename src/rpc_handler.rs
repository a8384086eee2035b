//! RPC method handler for the Linkcatalog JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches a method call to the engine and its
//! collaborators via the `App` struct.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::catalog_store::{CatalogStore, CatalogStoreTrait};
use crate::managers::import_log_manager::{ImportLogManager, ImportLogManagerTrait};
use crate::services::batch_codec;
use crate::services::settings_engine::SettingsEngineTrait;

/// Default number of history entries returned by `import.history`.
const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Import ───
        "import.run" => {
            let batch_val = params.get("batch").cloned().ok_or("missing batch")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let limit = a.settings_engine.get_settings().import.max_operations;
            let batch = batch_codec::decode_value(batch_val, limit).map_err(|e| e.to_string())?;
            let run = a.run_import(batch).map_err(|e| e.to_string())?;
            serde_json::to_value(&run).map_err(|e| e.to_string())
        }
        "import.preview" => {
            let batch_val = params.get("batch").cloned().ok_or("missing batch")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let limit = a.settings_engine.get_settings().import.max_operations;
            let batch = batch_codec::decode_value(batch_val, limit).map_err(|e| e.to_string())?;
            serde_json::to_value(batch_codec::preview(&batch)).map_err(|e| e.to_string())
        }
        "import.history" => {
            let limit = params
                .get("limit")
                .and_then(|v| v.as_i64())
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_HISTORY_LIMIT);
            let a = app.lock().map_err(|e| e.to_string())?;
            let entries = ImportLogManager::new(a.db.connection())
                .list_recent(limit)
                .map_err(|e| e.to_string())?;
            Ok(json!({"items": entries}))
        }

        // ─── Catalog ───
        "catalog.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let names = CatalogStore::new(a.db.connection())
                .list_category_names()
                .map_err(|e| e.to_string())?;
            Ok(json!({"items": names}))
        }
        "catalog.get" => {
            let name = params.get("name").and_then(|v| v.as_str()).ok_or("missing name")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let tree = CatalogStore::new(a.db.connection())
                .load_category(name)
                .map_err(|e| e.to_string())?;
            serde_json::to_value(&tree).map_err(|e| e.to_string())
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
