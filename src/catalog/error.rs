/// Domain failures of catalog operations.
///
/// `MalformedStoredEmbedding` and `DimensionMismatch` are recovered inside a
/// search (the record is skipped); the rest reach the caller as `success: false`.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid limit {0}: limit must be a positive integer")]
    InvalidLimit(i64),

    #[error("embedding unavailable: the embedding provider returned no vector")]
    EmbeddingUnavailable,

    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("stored embedding for item {id} is malformed: {reason}")]
    MalformedStoredEmbedding { id: i64, reason: String },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
