mod catalog;
mod config;
mod embeddings;
mod logging;
mod messaging;
mod paths;
mod protocol;

use std::io::{stdin, stdout};
use std::path::PathBuf;

use anyhow::{bail, Context};
use serde_json::Value;

use crate::catalog::store::ItemStore;
use crate::catalog::Catalog;
use crate::embeddings::EmbeddingSettings;
use crate::protocol::{AddItemResult, ListItemsResult, ResponseErr, ResponseOk, SearchItemsResult};

/// Everything the host keeps between requests. The catalog exists once `init` succeeds.
#[derive(Default)]
struct HostState {
    catalog: Option<Catalog>,
}

fn main() {
    if let Err(e) = real_main() {
        // Keep stderr noisy for user bug reports; logs also go to file.
        eprintln!("[things-catalog] fatal error: {e:?}");
        log::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    let _logger = logging::init_logging()?;

    log::info!("=== Things catalog host started ===");
    log::info!("Waiting for requests on stdin...");

    let mut state = HostState::default();
    let mut in_stream = stdin().lock();
    let mut out_stream = stdout().lock();

    let mut message_count: u64 = 0;
    loop {
        let req = match messaging::read_message(&mut in_stream) {
            Ok(Some(r)) => r,
            Ok(None) => {
                log::info!("No more messages after {} messages, exiting", message_count);
                break;
            }
            Err(e) => {
                log::error!("Error reading message: {:?}", e);
                break;
            }
        };

        message_count += 1;
        log::info!("Processing message #{}: {} (id: {})", message_count, req.method, req.id);

        let resp = match handle_request(&mut state, &req.method, &req.params) {
            Ok(result) => serde_json::to_value(ResponseOk { id: req.id, result })?,
            Err(e) => {
                log::error!("Handler error: {:?}", e);
                serde_json::to_value(ResponseErr {
                    id: req.id,
                    error: format!("{e:#}"),
                })?
            }
        };

        if let Err(e) = messaging::write_json(&mut out_stream, &resp) {
            log::error!("Error sending response: {:?}", e);
            break;
        }
    }

    log::info!("=== Things catalog host stopped ===");
    Ok(())
}

fn handle_request(state: &mut HostState, method: &str, params: &Value) -> anyhow::Result<Value> {
    match method {
        "hello" => handle_hello(state, params),
        "init" => handle_init(state, params),
        "addItem" => handle_add_item(state, params),
        "searchItems" => handle_search_items(state, params),
        "listItems" => handle_list_items(state),
        "stats" => handle_stats(state),
        _ => bail!("Unknown method: {method}"),
    }
}

fn require_catalog(state: &HostState) -> anyhow::Result<&Catalog> {
    state.catalog.as_ref().context("Catalog not initialized. Call 'init' first.")
}

fn handle_hello(state: &HostState, params: &Value) -> anyhow::Result<Value> {
    let client = params.get("client").and_then(|v| v.as_str()).unwrap_or("unknown");
    log::info!("Hello from client {}, responding with host version {}", client, config::HOST_VERSION);

    Ok(serde_json::json!({
        "type": "hello-response",
        "hostVersion": config::HOST_VERSION,
        "initialized": state.catalog.is_some(),
        "client": client
    }))
}

fn handle_init(state: &mut HostState, params: &Value) -> anyhow::Result<Value> {
    if state.catalog.is_some() {
        bail!("Catalog already initialized; the embedding provider is fixed for this session");
    }

    // dataDir override (for testing): use the provided path directly.
    let data_dir = match params.get("dataDir").and_then(|v| v.as_str()) {
        Some(p) => {
            let p = PathBuf::from(p);
            log::info!("Using explicit dataDir: {}", p.display());
            paths::ensure_dir(&p)?;
            p
        }
        None => paths::default_data_dir()?,
    };
    let db_file = params
        .get("dbFile")
        .and_then(|v| v.as_str())
        .unwrap_or(config::sqlite::DEFAULT_DB_FILE_NAME);

    let settings: EmbeddingSettings = match params.get("embedding") {
        Some(v) if !v.is_null() => serde_json::from_value(v.clone()).context("invalid embedding settings")?,
        _ => EmbeddingSettings::default(),
    };

    let store = ItemStore::open(&data_dir.join(db_file))?;
    let embedder = embeddings::build_embedder(&settings).context("failed to set up embedding provider")?;
    let catalog = Catalog::new(store, embedder);

    let items = catalog.count()?;
    let result = serde_json::json!({
        "ok": true,
        "dbPath": catalog.store().db_path().to_string_lossy(),
        "items": items,
        "provider": catalog.embedder().describe(),
        "dims": catalog.embedder().dims()
    });
    log::info!("Catalog initialized: {} items, provider {}", items, catalog.embedder().describe());

    state.catalog = Some(catalog);
    Ok(result)
}

fn handle_add_item(state: &HostState, params: &Value) -> anyhow::Result<Value> {
    let catalog = require_catalog(state)?;
    // A missing description is reported like an empty one: as a failed add, not a protocol error.
    let description = params.get("description").and_then(|v| v.as_str()).unwrap_or("");
    let result = AddItemResult::from(catalog.add(description));
    Ok(serde_json::to_value(result)?)
}

fn handle_search_items(state: &HostState, params: &Value) -> anyhow::Result<Value> {
    let catalog = require_catalog(state)?;
    let query = params.get("query").and_then(|v| v.as_str()).unwrap_or("");
    let limit = match params.get("limit") {
        None | Some(Value::Null) => config::catalog::SEARCH_DEFAULT_LIMIT,
        Some(v) => v.as_i64().with_context(|| format!("limit must be an integer, got {v}"))?,
    };
    let result = SearchItemsResult::new(query, catalog.search(query, limit));
    Ok(serde_json::to_value(result)?)
}

fn handle_list_items(state: &HostState) -> anyhow::Result<Value> {
    let catalog = require_catalog(state)?;
    let result = ListItemsResult::from(catalog.list_all());
    Ok(serde_json::to_value(result)?)
}

fn handle_stats(state: &HostState) -> anyhow::Result<Value> {
    let catalog = require_catalog(state)?;
    let items = catalog.count()?;
    let db_bytes = std::fs::metadata(catalog.store().db_path())
        .map(|m| m.len())
        .unwrap_or(0);
    Ok(serde_json::json!({
        "ok": true,
        "items": items,
        "dbBytes": db_bytes,
        "provider": catalog.embedder().describe(),
        "dims": catalog.embedder().dims()
    }))
}
