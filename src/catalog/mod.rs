// catalog/ — Item records, similarity ranking and the add/search/list service.
//
// Layout:
// - store: SQLite `items` table, one scoped connection per operation
// - similarity: cosine scoring with explicit dimension checks
// - service: `Catalog`, which wires an `Embedder` to the store
// - error: the domain error taxonomy surfaced to callers

pub mod error;
pub mod service;
pub mod similarity;
pub mod store;

pub use error::CatalogError;
pub use service::Catalog;
