// service.rs — The catalog: add, semantic search and listing over the item store.
//
// Search is a brute-force scan: embed the query once, decode and score every stored
// vector, stable-sort by similarity, truncate. Fine for a personal inventory.

use serde::Serialize;

use crate::catalog::similarity::cosine_similarity;
use crate::catalog::store::{decode_embedding, ItemStore, ItemSummary};
use crate::catalog::CatalogError;
use crate::config;
use crate::embeddings::text_prep::prepare_item_text;
use crate::embeddings::Embedder;

/// Built once at startup and passed by reference; safe to share across threads.
pub struct Catalog {
    store: ItemStore,
    embedder: Box<dyn Embedder>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedItem {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredItem {
    pub id: i64,
    pub description: String,
    pub similarity: f64,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub items: Vec<ScoredItem>,
    /// The store held no records at all, as opposed to nothing scoring.
    pub store_empty: bool,
    /// Records left out of ranking (corrupt or incompatible embeddings).
    pub skipped: usize,
}

impl Catalog {
    pub fn new(store: ItemStore, embedder: Box<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// Embed and persist a new item. Nothing is written if the embedding is unavailable.
    pub fn add(&self, description: &str) -> Result<AddedItem, CatalogError> {
        if description.trim().is_empty() {
            return Err(CatalogError::InvalidInput("description must not be empty".to_string()));
        }

        let embedding = self.embedder.embed(&prepare_item_text(description));
        if embedding.is_empty() {
            log::warn!("Rejecting add, no embedding for: {}", preview(description));
            return Err(CatalogError::EmbeddingUnavailable);
        }

        let id = self.store.insert(description, &embedding)?;
        log::info!("Added item {}: {}", id, preview(description));

        Ok(AddedItem {
            id,
            description: description.to_string(),
        })
    }

    /// Rank every stored item against `query` and return the best `limit`.
    pub fn search(&self, query: &str, limit: i64) -> Result<SearchOutcome, CatalogError> {
        if limit < 1 {
            return Err(CatalogError::InvalidLimit(limit));
        }
        if query.trim().is_empty() {
            return Err(CatalogError::InvalidInput("query must not be empty".to_string()));
        }

        let query_embedding = self.embedder.embed(&prepare_item_text(query));
        if query_embedding.is_empty() {
            log::warn!("Search aborted, no embedding for query: {}", preview(query));
            return Err(CatalogError::EmbeddingUnavailable);
        }

        let rows = self.store.scan_all()?;
        if rows.is_empty() {
            log::info!("Search on empty catalog: {}", preview(query));
            return Ok(SearchOutcome {
                items: Vec::new(),
                store_empty: true,
                skipped: 0,
            });
        }

        let total = rows.len();
        let mut skipped = 0usize;
        let mut scored: Vec<ScoredItem> = Vec::with_capacity(total);

        for row in rows {
            let Some(raw) = row.embedding.as_deref().filter(|s| !s.trim().is_empty()) else {
                continue;
            };

            let embedding = match decode_embedding(raw) {
                Ok(v) => v,
                Err(e) => {
                    let err = CatalogError::MalformedStoredEmbedding {
                        id: row.id,
                        reason: e.to_string(),
                    };
                    log::warn!("Skipping item during ranking: {}", err);
                    skipped += 1;
                    continue;
                }
            };
            // Rows from failed embeddings in older catalogs hold "[]".
            if embedding.is_empty() {
                continue;
            }

            match cosine_similarity(&query_embedding, &embedding) {
                Ok(similarity) => scored.push(ScoredItem {
                    id: row.id,
                    description: row.description,
                    similarity,
                    created_at: row.created_at,
                }),
                Err(e) => {
                    log::warn!("Skipping item {} during ranking: {}", row.id, e);
                    skipped += 1;
                }
            }
        }

        // Stable sort: exact ties keep scan (id ascending) order.
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        let ranked = scored.len();
        scored.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        log::info!(
            "Search \"{}\": {} of {} items ranked, {} skipped, returning {}",
            preview(query),
            ranked,
            total,
            skipped,
            scored.len()
        );

        Ok(SearchOutcome {
            items: scored,
            store_empty: false,
            skipped,
        })
    }

    /// Every item, most recent first.
    pub fn list_all(&self) -> Result<Vec<ItemSummary>, CatalogError> {
        let items = self.store.list_recent()?;
        log::info!("Listing {} items", items.len());
        Ok(items)
    }

    pub fn count(&self) -> Result<i64, CatalogError> {
        Ok(self.store.count()?)
    }
}

fn preview(s: &str) -> String {
    let max = config::catalog::LOG_PREVIEW_CHARS;
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max).collect();
    format!("{head}…")
}
