use thiserror::Error;

/// Persistence-layer operation error.
///
/// Opaque to the engine: it propagates unchanged (never swallowed, never
/// retried in-engine) and surfaces as a 5xx-equivalent at the API boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("append failed: {0}")]
    Append(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}
