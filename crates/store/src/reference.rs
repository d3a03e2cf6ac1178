use std::sync::Arc;

use crate::error::StoreError;
use crate::log::RecordFilter;

/// Keyed reference records (facilities, provisioned inventory).
///
/// The engine only reads through this trait; ownership of the records sits
/// with out-of-scope registration flows.
pub trait ReferenceStore: Send + Sync {
    type Key: Send + Sync;
    type Record: Clone + Send + Sync;
    type Filter: RecordFilter<Self::Record> + Send + Sync;

    /// Point lookup; `Ok(None)` when the key is unknown.
    fn get(&self, key: &Self::Key) -> Result<Option<Self::Record>, StoreError>;

    /// Return all records matching the filter.
    fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Record>, StoreError>;
}

impl<S> ReferenceStore for Arc<S>
where
    S: ReferenceStore + ?Sized,
{
    type Key = S::Key;
    type Record = S::Record;
    type Filter = S::Filter;

    fn get(&self, key: &Self::Key) -> Result<Option<Self::Record>, StoreError> {
        (**self).get(key)
    }

    fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Record>, StoreError> {
        (**self).list(filter)
    }
}
