//! Linkcatalog command line.
//!
//! ```text
//! linkcatalog import <batch.json>   run a batch against the stored catalog
//! linkcatalog preview <batch.json>  count the operations of a batch
//! linkcatalog list                  list root categories
//! ```

use std::fs;
use std::process::ExitCode;

use linkcatalog::app::{init_logging, App};
use linkcatalog::managers::catalog_store::{CatalogStore, CatalogStoreTrait};
use linkcatalog::services::batch_codec;
use linkcatalog::services::settings_engine::SettingsEngineTrait;
use linkcatalog::types::errors::AppError;

const USAGE: &str = "usage: linkcatalog <import|preview> <batch.json> | linkcatalog list";

fn read_batch_file(path: &str) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| AppError::Io(format!("{}: {}", path, e)))
}

fn cmd_import(app: &App, path: &str) -> Result<bool, AppError> {
    let batch = app.decode_batch(&read_batch_file(path)?)?;
    let run = app.run_import(batch)?;
    let result = &run.result;

    println!(
        "{} operations: {} succeeded, {} failed, {} skipped ({} ms)",
        result.total_operations,
        result.successful,
        result.failed,
        result.skipped,
        result.import_duration.as_millis()
    );
    for outcome in result.failed_outcomes() {
        println!(
            "  FAILED {} {} [{}]: {}",
            outcome.operation, outcome.target, outcome.identifier, outcome.message
        );
    }
    if !result.categories_modified.is_empty() {
        let names: Vec<&str> = result.categories_modified.iter().map(String::as_str).collect();
        println!("modified: {}", names.join(", "));
    }
    Ok(result.success)
}

fn cmd_preview(app: &App, path: &str) -> Result<bool, AppError> {
    let batch = app.decode_batch(&read_batch_file(path)?)?;
    let p = batch_codec::preview(&batch);
    println!("{} (format {})", p.description, p.version);
    println!(
        "{} operations: {} add, {} update, {} delete ({} category, {} link)",
        p.total, p.adds, p.updates, p.deletes, p.category_targets, p.link_targets
    );
    Ok(true)
}

fn cmd_list(app: &App) -> Result<bool, AppError> {
    let store = CatalogStore::new(app.db.connection());
    for name in store.list_category_names()? {
        println!("{}", name);
    }
    Ok(true)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let settings_engine = match App::load_default_settings() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("linkcatalog: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings_engine.get_settings().logging.filter);

    let app = match App::open(settings_engine) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("linkcatalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["import", path] => cmd_import(&app, path),
        ["preview", path] => cmd_preview(&app, path),
        ["list"] => cmd_list(&app),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("linkcatalog: {}", e);
            ExitCode::FAILURE
        }
    }
}
