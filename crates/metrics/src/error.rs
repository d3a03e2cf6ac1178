use thiserror::Error;

use medgrid_core::DomainError;
use medgrid_store::StoreError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine operation error.
///
/// Two sources, kept distinct so the API boundary can map them cleanly:
/// domain failures (validation, not-found → 4xx-equivalent) and persistence
/// failures (opaque passthrough → 5xx-equivalent). Insufficient outbreak data
/// is *not* an error; see [`crate::outbreak::BaselineOutcome`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::validation(msg))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::not_found(msg))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }
}
