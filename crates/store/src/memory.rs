//! In-memory store backends.
//!
//! Intended for tests/dev. Not optimized for performance. A single `RwLock`
//! per collection gives the atomic-append / read-after-write visibility the
//! log contract requires.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::RwLock;

use medgrid_core::FacilityId;
use medgrid_events::{BedEvent, DiseaseReport, UsageEvent};
use medgrid_registry::{Facility, InventoryItem};

use crate::error::StoreError;
use crate::filters::{
    BedEventFilter, FacilityFilter, ItemFilter, ReportFilter, UsageEventFilter,
};
use crate::log::{AppendLog, RecordFilter};
use crate::reference::ReferenceStore;

/// In-memory append-only log.
#[derive(Debug)]
pub struct InMemoryLog<R, F> {
    records: RwLock<Vec<R>>,
    _filter: PhantomData<fn(&F)>,
}

impl<R, F> InMemoryLog<R, F> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            _filter: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R, F> Default for InMemoryLog<R, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, F> AppendLog for InMemoryLog<R, F>
where
    R: Clone + Send + Sync,
    F: RecordFilter<R> + Send + Sync,
{
    type Record = R;
    type Filter = F;

    fn append(&self, record: R) -> Result<R, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        records.push(record.clone());
        Ok(record)
    }

    fn query(&self, filter: &F) -> Result<Vec<R>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}

/// In-memory keyed reference store.
#[derive(Debug)]
pub struct InMemoryRegistry<K, R, F> {
    records: RwLock<HashMap<K, R>>,
    _filter: PhantomData<fn(&F)>,
}

impl<K, R, F> InMemoryRegistry<K, R, F>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            _filter: PhantomData,
        }
    }

    /// Insert or replace a record (seeding helper; registration flows are out
    /// of engine scope).
    pub fn upsert(&self, key: K, record: R) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        records.insert(key, record);
        Ok(())
    }
}

impl<K, R, F> Default for InMemoryRegistry<K, R, F>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, R, F> ReferenceStore for InMemoryRegistry<K, R, F>
where
    K: Eq + Hash + Send + Sync,
    R: Clone + Send + Sync,
    F: RecordFilter<R> + Send + Sync,
{
    type Key = K;
    type Record = R;
    type Filter = F;

    fn get(&self, key: &K) -> Result<Option<R>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(records.get(key).cloned())
    }

    fn list(&self, filter: &F) -> Result<Vec<R>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(records.values().filter(|r| filter.matches(r)).cloned().collect())
    }
}

pub type InMemoryBedLog = InMemoryLog<BedEvent, BedEventFilter>;
pub type InMemoryUsageLog = InMemoryLog<UsageEvent, UsageEventFilter>;
pub type InMemoryReportLog = InMemoryLog<DiseaseReport, ReportFilter>;
pub type InMemoryFacilityRegistry = InMemoryRegistry<FacilityId, Facility, FacilityFilter>;
pub type InMemoryItemRegistry =
    InMemoryRegistry<(FacilityId, String), InventoryItem, ItemFilter>;

impl InMemoryItemRegistry {
    /// Insert an item keyed by `(facility_id, normalized name)` so lookups stay
    /// case-insensitive.
    pub fn upsert_item(&self, item: InventoryItem) -> Result<(), StoreError> {
        self.upsert((item.facility_id, item.normalized_name()), item)
    }
}

impl InMemoryFacilityRegistry {
    pub fn upsert_facility(&self, facility: Facility) -> Result<(), StoreError> {
        self.upsert(facility.id, facility)
    }
}
