use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::service::{AddedItem, ScoredItem, SearchOutcome};
use crate::catalog::store::ItemSummary;
use crate::catalog::CatalogError;

#[derive(Debug, Deserialize)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct ResponseOk<T: Serialize> {
    pub id: String,
    pub result: T,
}

#[derive(Debug, Serialize)]
pub struct ResponseErr {
    pub id: String,
    pub error: String,
}

// Catalog results always carry `success`; failures never become a protocol-level `error`.

#[derive(Debug, Serialize)]
pub struct AddItemResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<AddedItem, CatalogError>> for AddItemResult {
    fn from(r: Result<AddedItem, CatalogError>) -> Self {
        match r {
            Ok(item) => Self {
                success: true,
                message: format!("Added item {}", item.id),
                id: Some(item.id),
                description: Some(item.description),
                error: None,
            },
            Err(e) => Self {
                success: false,
                id: None,
                description: None,
                message: "Failed to add item".to_string(),
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchItemsResult {
    pub success: bool,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ScoredItem>>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchItemsResult {
    pub fn new(query: &str, r: Result<SearchOutcome, CatalogError>) -> Self {
        match r {
            Ok(outcome) => {
                let message = if outcome.store_empty {
                    "No items recorded yet".to_string()
                } else if outcome.skipped > 0 {
                    format!(
                        "Found {} related items ({} items with unusable embeddings skipped)",
                        outcome.items.len(),
                        outcome.skipped
                    )
                } else {
                    format!("Found {} related items", outcome.items.len())
                };
                Self {
                    success: true,
                    query: query.to_string(),
                    items: Some(outcome.items),
                    message,
                    error: None,
                }
            }
            Err(e) => Self {
                success: false,
                query: query.to_string(),
                items: None,
                message: "Search failed".to_string(),
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListItemsResult {
    pub success: bool,
    pub items: Vec<ItemSummary>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<Vec<ItemSummary>, CatalogError>> for ListItemsResult {
    fn from(r: Result<Vec<ItemSummary>, CatalogError>) -> Self {
        match r {
            Ok(items) => Self {
                success: true,
                message: format!("{} items in total", items.len()),
                items,
                error: None,
            },
            Err(e) => Self {
                success: false,
                items: Vec::new(),
                message: "Failed to list items".to_string(),
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_failure_shape() {
        let r = AddItemResult::from(Err(CatalogError::EmbeddingUnavailable));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], false);
        assert!(v.get("id").is_none());
        assert!(v["error"].as_str().unwrap().contains("embedding unavailable"));
    }

    #[test]
    fn test_add_success_shape() {
        let r = AddItemResult::from(Ok(AddedItem {
            id: 7,
            description: "tape measure, garage".to_string(),
        }));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["id"], 7);
        assert_eq!(v["description"], "tape measure, garage");
        assert!(v.get("error").is_none());
    }

    #[test]
    fn test_search_empty_store_message_differs() {
        let empty = SearchItemsResult::new(
            "q",
            Ok(SearchOutcome {
                items: vec![],
                store_empty: true,
                skipped: 0,
            }),
        );
        let none_found = SearchItemsResult::new(
            "q",
            Ok(SearchOutcome {
                items: vec![],
                store_empty: false,
                skipped: 0,
            }),
        );
        assert!(empty.success && none_found.success);
        assert_ne!(empty.message, none_found.message);
        assert_eq!(serde_json::to_value(&empty).unwrap()["items"], serde_json::json!([]));
    }

    #[test]
    fn test_similarity_keeps_full_precision() {
        let sim = 0.123_456_789_012_345_67_f64;
        let r = SearchItemsResult::new(
            "q",
            Ok(SearchOutcome {
                items: vec![ScoredItem {
                    id: 1,
                    description: "d".to_string(),
                    similarity: sim,
                    created_at: "2026-10-16T09:30:12.004211".to_string(),
                }],
                store_empty: false,
                skipped: 0,
            }),
        );
        let text = serde_json::to_string(&r).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["items"][0]["similarity"].as_f64().unwrap().to_bits(), sim.to_bits());
    }

    #[test]
    fn test_search_invalid_limit_shape() {
        let r = SearchItemsResult::new("q", Err(CatalogError::InvalidLimit(0)));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], false);
        assert!(v.get("items").is_none());
        assert!(v["error"].as_str().unwrap().contains("limit"));
    }
}
