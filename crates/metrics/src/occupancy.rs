//! Occupancy ledger: current bed occupancy derived from admission/discharge
//! events.
//!
//! There is no stored occupancy counter anywhere. Every query recomputes from
//! the append-only log, which costs O(events) per call but guarantees the
//! answer is consistent with the latest recorded event; event volume per
//! facility is small relative to query frequency in this domain.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use medgrid_core::FacilityId;
use medgrid_events::{BedEvent, BedEventKind};
use medgrid_registry::Facility;
use medgrid_store::{AppendLog, BedEventFilter, ReferenceStore};

use crate::aggregate::sum_by;
use crate::error::{EngineError, EngineResult};

/// Stateless occupancy computations over an injected bed event log and
/// facility registry.
#[derive(Debug)]
pub struct OccupancyLedger<L, F> {
    events: L,
    facilities: F,
}

impl<L, F> OccupancyLedger<L, F>
where
    L: AppendLog<Record = BedEvent, Filter = BedEventFilter>,
    F: ReferenceStore<Key = FacilityId, Record = Facility>,
{
    pub fn new(events: L, facilities: F) -> Self {
        Self { events, facilities }
    }

    /// Current occupied-bed count for one facility.
    ///
    /// Admission counts minus discharge counts, clamped to zero. The clamp is
    /// deliberate: a ledger in deficit (e.g. from historical data seeding)
    /// must never push `available = total_beds - occupied` negative.
    pub fn current_occupancy(&self, facility_id: FacilityId) -> EngineResult<u64> {
        let events = self.events.query(&BedEventFilter::for_facility(facility_id))?;
        Ok(occupancy_from_events(&events))
    }

    /// Occupancy for many facilities in a single pass over the event log.
    ///
    /// Requested facilities with no events are reported as 0.
    pub fn current_occupancy_batch(
        &self,
        facility_ids: &[FacilityId],
    ) -> EngineResult<HashMap<FacilityId, u64>> {
        let events = self
            .events
            .query(&BedEventFilter::for_facilities(facility_ids.to_vec()))?;

        let by_facility_kind = sum_by(
            &events,
            |e| (e.facility_id, e.kind),
            |e| u64::from(e.count),
        );

        let mut result = HashMap::with_capacity(facility_ids.len());
        for &facility_id in facility_ids {
            let admitted = by_facility_kind
                .get(&(facility_id, BedEventKind::Admission))
                .copied()
                .unwrap_or(0);
            let discharged = by_facility_kind
                .get(&(facility_id, BedEventKind::Discharge))
                .copied()
                .unwrap_or(0);
            result.insert(facility_id, admitted.saturating_sub(discharged));
        }
        Ok(result)
    }

    /// Beds still available at a facility: `total_beds - occupied`, saturating
    /// at zero.
    pub fn available_beds(&self, facility_id: FacilityId) -> EngineResult<u64> {
        let facility = self.ensure_facility(facility_id)?;
        let occupied = self.current_occupancy(facility_id)?;
        Ok(facility.total_beds.saturating_sub(occupied))
    }

    /// Append a new admission/discharge fact.
    ///
    /// `count` must be >= 1 (validation error, never a silent clamp) and the
    /// facility must be registered. Store errors propagate unchanged; retry
    /// policy belongs to the caller.
    pub fn record_event(
        &self,
        facility_id: FacilityId,
        kind: BedEventKind,
        count: u32,
        occurred_at: DateTime<Utc>,
    ) -> EngineResult<BedEvent> {
        self.ensure_facility(facility_id)?;
        let event = BedEvent::record(facility_id, kind, count, occurred_at)?;
        let stored = self.events.append(event)?;
        tracing::debug!(
            facility_id = %facility_id,
            kind = kind.as_str(),
            count,
            "bed event recorded"
        );
        Ok(stored)
    }

    fn ensure_facility(&self, facility_id: FacilityId) -> EngineResult<Facility> {
        self.facilities
            .get(&facility_id)?
            .ok_or_else(|| EngineError::not_found(format!("facility {facility_id}")))
    }
}

fn occupancy_from_events(events: &[BedEvent]) -> u64 {
    let by_kind = sum_by(events, |e| e.kind, |e| u64::from(e.count));
    let admitted = by_kind.get(&BedEventKind::Admission).copied().unwrap_or(0);
    let discharged = by_kind.get(&BedEventKind::Discharge).copied().unwrap_or(0);
    admitted.saturating_sub(discharged)
}
