// store.rs — Durable item records in a single SQLite file.
//
// Schema is compatible with catalogs written by earlier versions of the tool:
//   items(id INTEGER PRIMARY KEY AUTOINCREMENT, description TEXT NOT NULL,
//         embedding TEXT, created_at TEXT NOT NULL, updated_at TEXT NOT NULL)
// Embeddings are stored as JSON number arrays.
//
// Every operation opens its own connection and drops it before returning, so no
// connection or transaction outlives a call, including on error paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use rusqlite::{params, Connection, TransactionBehavior};
use serde::Serialize;

use crate::{config, paths};

/// A full row as read by `scan_all`. The embedding stays encoded; decoding is the caller's job
/// so one corrupt row can be skipped without failing the scan.
#[derive(Debug, Clone)]
pub struct StoredItem {
    pub id: i64,
    pub description: String,
    pub embedding: Option<String>,
    pub created_at: String,
}

/// A row without its embedding, as returned by `list_recent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub id: i64,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ItemStore {
    db_path: PathBuf,
}

impl ItemStore {
    /// Open the store at `db_path`, creating the file and schema if absent.
    /// Existing data is never touched, so calling this repeatedly is safe.
    pub fn open(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            paths::ensure_dir(parent)?;
        }

        log::info!("Initializing item store");
        log::info!("  DB Path: {}", db_path.display());

        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        let conn = store.connect()?;
        init_schema(&conn)?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |r| r.get(0))?;
        log::info!("Item store ready: {} items recorded", count);

        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> anyhow::Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("open db {}", self.db_path.display()))?;
        conn.busy_timeout(Duration::from_millis(config::sqlite::PRAGMA_BUSY_TIMEOUT_MS as u64))?;
        Ok(conn)
    }

    /// Append a record and return its id. The row is committed before this returns.
    pub fn insert(&self, description: &str, embedding: &[f32]) -> anyhow::Result<i64> {
        let encoded = encode_embedding(embedding)?;
        let now = now_iso();

        let mut conn = self.connect()?;
        // IMMEDIATE takes the write lock up front; concurrent writers wait on busy_timeout.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            r#"
            INSERT INTO items (description, embedding, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
            params![description, encoded, now],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit().context("commit item insert")?;

        log::debug!("Inserted item {} ({} dims)", id, embedding.len());
        Ok(id)
    }

    /// Every record with its encoded embedding, in insertion (id) order.
    pub fn scan_all(&self) -> anyhow::Result<Vec<StoredItem>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, description, embedding, created_at FROM items ORDER BY id ASC")?;
        let rows = stmt.query_map([], |r| {
            Ok(StoredItem {
                id: r.get(0)?,
                description: r.get(1)?,
                embedding: r.get(2)?,
                created_at: r.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Records without embeddings, most recent first. Equal timestamps fall back to id.
    pub fn list_recent(&self) -> anyhow::Result<Vec<ItemSummary>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, description, created_at FROM items ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(ItemSummary {
                id: r.get(0)?,
                description: r.get(1)?,
                created_at: r.get(2)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn count(&self) -> anyhow::Result<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM items", [], |r| r.get(0))?)
    }
}

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    // IMPORTANT:
    // SQLite PRAGMA statements do NOT reliably accept parameters, so we must interpolate.
    // journal_mode is persisted in the file; the rest only affect this connection.
    conn.execute_batch(&format!(
        "\
PRAGMA journal_mode = WAL;\n\
PRAGMA synchronous = NORMAL;\n\
PRAGMA cache_size = {cache_size};\n\
",
        cache_size = config::sqlite::PRAGMA_CACHE_SIZE_KIB_NEG,
    ))?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            embedding TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS items_created_at ON items (created_at);
        "#,
    )?;
    Ok(())
}

/// JSON array encoding. serde_json prints the shortest repr that parses back to the same f32.
pub fn encode_embedding(embedding: &[f32]) -> anyhow::Result<String> {
    serde_json::to_string(embedding).context("encode embedding")
}

pub fn decode_embedding(raw: &str) -> Result<Vec<f32>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Local ISO-8601 timestamp with microseconds, e.g. 2026-10-16T09:30:12.004211.
/// Fixed width, so lexical order equals chronological order.
fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
