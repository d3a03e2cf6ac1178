use std::sync::Arc;

use crate::error::StoreError;

/// Match predicate for log queries.
///
/// Filters are plain data (constructed by the engine) so that real backends
/// can translate them into native queries instead of scanning.
pub trait RecordFilter<R> {
    fn matches(&self, record: &R) -> bool;
}

/// Append-only record log.
///
/// ## Contract
///
/// - `append` is atomic for a single record; the record is visible to every
///   subsequent `query` before `append` returns (no write-then-stale-read
///   race).
/// - Records are immutable once appended: no update, no delete.
/// - `query` returns all records matching the filter, in no guaranteed order;
///   callers needing an order sort the result themselves.
pub trait AppendLog: Send + Sync {
    type Record: Clone + Send + Sync;
    type Filter: RecordFilter<Self::Record> + Send + Sync;

    /// Append a single record (append-only, atomic).
    fn append(&self, record: Self::Record) -> Result<Self::Record, StoreError>;

    /// Return all records matching the filter.
    fn query(&self, filter: &Self::Filter) -> Result<Vec<Self::Record>, StoreError>;
}

impl<S> AppendLog for Arc<S>
where
    S: AppendLog + ?Sized,
{
    type Record = S::Record;
    type Filter = S::Filter;

    fn append(&self, record: Self::Record) -> Result<Self::Record, StoreError> {
        (**self).append(record)
    }

    fn query(&self, filter: &Self::Filter) -> Result<Vec<Self::Record>, StoreError> {
        (**self).query(filter)
    }
}
